//! JobQueue -- bounded tokio channel drained by a fixed worker pool.
//!
//! `dispatch` never waits: a full queue is reported as `JobError::QueueFull`.
//! Each job runs under a deadline and is retried with capped exponential
//! backoff. Workers stop when the owning `CancellationToken` is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use chatbox_core::job::{JobDispatcher, JobHandler};
use chatbox_types::config::JobSettings;
use chatbox_types::error::JobError;
use chatbox_types::job::Job;

const BASE_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Worker pool sizing and per-job limits.
#[derive(Debug, Clone, Copy)]
pub struct QueueOptions {
    pub workers: usize,
    pub capacity: usize,
    pub max_execution: Duration,
    /// Retries after the first attempt.
    pub max_retry: u32,
}

impl From<&JobSettings> for QueueOptions {
    fn from(settings: &JobSettings) -> Self {
        Self {
            workers: settings.workers.max(1),
            capacity: settings.queue_capacity.max(1),
            max_execution: Duration::from_secs(settings.max_execution_secs),
            max_retry: settings.max_retry,
        }
    }
}

/// Sending half of the queue. Cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<Job>,
}

/// Handles of the running workers.
pub struct JobWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl JobWorkers {
    /// Wait for every worker to exit (after cancellation).
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "job worker panicked");
            }
        }
    }
}

impl JobQueue {
    fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Spawn `options.workers` workers running `handler` until `cancel` fires.
    pub fn start<H: JobHandler>(
        handler: H,
        options: QueueOptions,
        cancel: CancellationToken,
    ) -> (Self, JobWorkers) {
        let (queue, receiver) = Self::bounded(options.capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);

        let handles = (0..options.workers.max(1))
            .map(|worker| {
                let receiver = receiver.clone();
                let handler = handler.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    worker_loop(worker, receiver, handler, options, cancel).await;
                })
            })
            .collect();

        tracing::info!(
            workers = options.workers,
            capacity = options.capacity,
            "job queue started"
        );
        (queue, JobWorkers { handles })
    }
}

impl JobDispatcher for JobQueue {
    fn dispatch(&self, job: Job) -> Result<(), JobError> {
        let kind = job.queue_id();
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => JobError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => JobError::Closed,
        })?;
        tracing::debug!(kind, "job enqueued");
        Ok(())
    }
}

async fn worker_loop<H: JobHandler>(
    worker: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
    handler: Arc<H>,
    options: QueueOptions,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => None,
            job = async { receiver.lock().await.recv().await } => job,
        };
        let Some(job) = next else {
            break;
        };
        run_job(worker, handler.as_ref(), &job, &options, &cancel).await;
    }
    tracing::debug!(worker, "job worker stopped");
}

async fn run_job<H: JobHandler>(
    worker: usize,
    handler: &H,
    job: &Job,
    options: &QueueOptions,
    cancel: &CancellationToken,
) {
    let kind = job.queue_id();
    for attempt in 0..=options.max_retry {
        let error = match tokio::time::timeout(options.max_execution, handler.handle(job)).await {
            Ok(Ok(())) => {
                tracing::debug!(worker, kind, attempt, "job completed");
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {:?}", options.max_execution),
        };

        if attempt == options.max_retry {
            tracing::error!(worker, kind, attempts = attempt + 1, %error, "job failed, giving up");
            return;
        }

        let delay = backoff(attempt);
        tracing::warn!(worker, kind, attempt, %error, ?delay, "job failed, retrying");
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!(worker, kind, "shutdown during retry backoff, job dropped");
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    BASE_BACKOFF
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}
