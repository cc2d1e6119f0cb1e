//! Web front end: a static chat page plus a JSON endpoint.
//!
//! One agent is constructed at startup and shared by every request through
//! the router state. Each request is a stateless single-turn exchange.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppState, CHAT_PATH, ChatRequest, ChatResponse, HEALTH_PATH, router};

use tokio::net::TcpListener;
use tracing::info;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
