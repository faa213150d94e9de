mod cli;
mod telemetry;

use crate::cli::{SinkBackendArg, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use linkmint_core::{IndexSink, LinkStore};
use linkmint_gateway::{App, AppState};
use linkmint_generator::RandomGenerator;
use linkmint_shortener::{AllocatorConfig, AnalyticsAggregator, ClickRecorder, LinkAllocator};
use linkmint_sink::{InMemoryIndexSink, NoopIndexSink, RedisIndexSink};
use linkmint_storage::{InMemoryLinkStore, MySqlLinkStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    let store_timeout = Duration::from_millis(config.store_timeout_ms);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        sink_backend = %config.sink,
        code_length = config.code_length,
        max_attempts = config.max_attempts,
        "starting linkmint"
    );

    let store = build_store(&config, store_timeout).await?;
    let sink = build_sink(&config).await?;
    let generator = build_generator(config.code_length)?;

    let allocator = LinkAllocator::new(
        store,
        Arc::clone(&sink),
        Arc::new(generator),
        AllocatorConfig::builder()
            .max_attempts(config.max_attempts)
            .store_timeout(store_timeout)
            .build(),
    );
    let state = AppState::new(
        Arc::new(allocator),
        Arc::new(AnalyticsAggregator::new(Arc::clone(&sink), store_timeout)),
        ClickRecorder::new(sink, store_timeout),
        config.public_base_url,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("linkmint stopped");
    Ok(())
}

fn build_generator(code_length: usize) -> anyhow::Result<RandomGenerator> {
    RandomGenerator::new(code_length)
        .with_context(|| format!("invalid --code-length {code_length}"))
}

async fn build_store(config: &CLI, timeout: Duration) -> anyhow::Result<Arc<dyn LinkStore>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryLinkStore::new())),
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(dsn, timeout).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}

async fn build_sink(config: &CLI) -> anyhow::Result<Arc<dyn IndexSink>> {
    match config.sink {
        SinkBackendArg::None => Ok(Arc::new(NoopIndexSink)),
        SinkBackendArg::InMemory => Ok(Arc::new(InMemoryIndexSink::new())),
        SinkBackendArg::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis url is required when sink backend is redis")?;
            let sink = RedisIndexSink::connect(url, config.redis_key_prefix.clone()).await?;
            Ok(Arc::new(sink))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
