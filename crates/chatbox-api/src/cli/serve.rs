//! `chatbox serve`: run the HTTP API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use chatbox_core::job::LoggingJobHandler;
use chatbox_infra::job::queue::{JobQueue, QueueOptions};
use chatbox_infra::llm::create_provider;
use chatbox_types::config::AppConfig;

use crate::http::router::build_router;
use crate::state::AppState;

pub async fn serve(config: &AppConfig, listen: Option<String>) -> anyhow::Result<()> {
    let pool = super::open_database(config).await?;
    let provider = create_provider(&config.provider).context("failed to configure provider")?;

    let cancel = CancellationToken::new();
    let (queue, workers) = JobQueue::start(
        LoggingJobHandler,
        QueueOptions::from(&config.jobs),
        cancel.clone(),
    );

    let state = AppState::new(pool.clone(), config, provider, Arc::new(queue));
    let router = build_router(state);

    let addr = listen.unwrap_or_else(|| config.listen_address.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(address = %addr, "chatbox API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, draining job workers");
    cancel.cancel();
    workers.join().await;
    pool.close().await;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
