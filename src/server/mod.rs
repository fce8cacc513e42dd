//! HTTP surface: router, shared state, and server lifecycle.
//!
//! The task routes and the chat relay live under `/api` behind the bearer
//! API-key middleware; the health check and the UI page are public.

mod auth;
mod handlers;
pub mod templates;

pub use auth::ApiKeys;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::TaskService;
use crate::workflow::chat::ChatClient;
use crate::workflow::enhance::EnhanceClient;

/// Shared state across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TaskService>,
    pub enhance: Arc<EnhanceClient>,
    pub chat: Arc<ChatClient>,
    pub api_keys: ApiKeys,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/api/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/api/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/api/tasks/{id}/toggle", post(handlers::toggle_task))
        .route("/api/tasks/{id}/enhance", post(handlers::enhance_task))
        .route("/api/chat", post(handlers::chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until a shutdown signal arrives.
pub async fn start_server(state: AppState, bind: &str, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
