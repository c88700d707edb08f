//! ENCOSIS HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, observability, storage and the HTTP router, then
//! serves until Ctrl-C.
//!
//! # Notes
//! The `build_state` helper keeps wiring testable and minimizes main setup logic.
use anyhow::Context;
use encosis::app::{AppState, build_router};
use encosis::store::{CatalogStore, memory::InMemoryStore, mysql::MySqlStore};
use encosis::{config, observability};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::EncosisConfig::from_env_or_yaml().context("encosis config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: config::EncosisConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("encosis");
    let state = build_state(&config).await?;
    let metrics_listener = TcpListener::bind(config.metrics_bind)
        .await
        .with_context(|| format!("bind metrics {}", config.metrics_bind))?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        metrics_listener,
    ));

    let store = state.store.clone();
    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(
        %addr,
        storage = store.backend_name(),
        duplicate_enrollments = ?config.duplicate_enrollments,
        delete_policy = ?config.delete_policy,
        "encosis listening"
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    store.close().await;
    tracing::info!("encosis stopped");
    Ok(())
}

async fn build_state(config: &config::EncosisConfig) -> anyhow::Result<AppState> {
    let store_config = config.store_config();
    let store: Arc<dyn CatalogStore> = match config.storage {
        config::StorageBackend::Memory => Arc::new(InMemoryStore::new(store_config)),
        config::StorageBackend::Mysql => Arc::new(
            MySqlStore::connect(&config.mysql, store_config)
                .await
                .with_context(|| {
                    format!(
                        "connect to mysql at {}:{}",
                        config.mysql.host, config.mysql.port
                    )
                })?,
        ),
    };
    Ok(AppState::new(store))
}
