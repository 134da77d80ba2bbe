//! Web server using Axum.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

use super::router::create_app_router;

/// Run the web server, hosting the HTTP API and the gateway socket.
///
/// The listen port comes from settings; a `PORT` environment variable (as
/// set by container hosts) takes precedence.
pub async fn run_web_server(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let host = state.settings.server.host.clone();
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(state.settings.server.port);

    let app = create_app_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    tracing::info!("Starting web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
