use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, InsightBackend};
use crate::handlers;
use crate::services::ai_client::LlmInsightService;
use crate::services::insight_client::{HttpInsightService, InsightService};
use crate::state::AppState;
use crate::store::{SnapshotStore, TransactionStore};

/// Build the application state and Axum router from a [`Config`].
///
/// Loads the ledger snapshot, picks the insight backend and assembles the
/// middleware stack.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let store: Arc<dyn TransactionStore> = Arc::new(SnapshotStore::load(&config.snapshot_path)?);

    let insights: Arc<dyn InsightService> = match &config.insight_backend {
        InsightBackend::Remote(url) => {
            tracing::info!("Using remote insight backend at {}", url);
            Arc::new(HttpInsightService::new(url, config.request_timeout)?)
        }
        InsightBackend::Provider(settings) => {
            tracing::info!(
                "Using {} provider with model {}",
                settings.provider.as_str(),
                settings.model
            );
            if !settings.is_configured() {
                tracing::warn!("AI provider is not fully configured, insights will fall back");
            }
            Arc::new(LlmInsightService::new(
                settings.clone(),
                store.clone(),
                config.request_timeout,
            )?)
        }
    };

    let state = AppState::new(config, store, insights);
    Ok((state.clone(), router(state)))
}

/// The full router with middleware, for a prepared [`AppState`].
pub fn router(state: AppState) -> Router {
    handlers::routes()
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
