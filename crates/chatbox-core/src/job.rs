//! Background job ports.
//!
//! `JobDispatcher` hands work to a queue; `JobHandler` executes it. The
//! tokio-backed queue lives in chatbox-infra.

use chatbox_types::error::JobError;
use chatbox_types::job::Job;

/// Enqueue jobs without waiting for them to run.
pub trait JobDispatcher: Send + Sync {
    fn dispatch(&self, job: Job) -> Result<(), JobError>;
}

/// Execute one job. Errors are retried by the queue.
pub trait JobHandler: Send + Sync + 'static {
    fn handle(&self, job: &Job) -> impl std::future::Future<Output = Result<(), JobError>> + Send;
}

/// Handles jobs by recording them in the log.
#[derive(Debug, Clone, Default)]
pub struct LoggingJobHandler;

impl JobHandler for LoggingJobHandler {
    async fn handle(&self, job: &Job) -> Result<(), JobError> {
        match job {
            Job::AccountRegistered {
                account_id,
                email,
                name,
            } => {
                tracing::info!(%account_id, %email, %name, "account registered");
            }
        }
        Ok(())
    }
}

/// Discards every job, for services wired without a running queue.
#[derive(Debug, Clone, Default)]
pub struct NoopDispatcher;

impl JobDispatcher for NoopDispatcher {
    fn dispatch(&self, job: Job) -> Result<(), JobError> {
        tracing::debug!(kind = job.queue_id(), "job discarded, no queue running");
        Ok(())
    }
}
