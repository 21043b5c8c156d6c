//! # HTTP Server
//!
//! Builds the router (book routes plus request logging and panic recovery)
//! and runs it on a tokio listener.

use std::any::Any;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;

use crate::book_routes::book_routes;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    with_layers(book_routes(state))
}

fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(log_request))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let http_status = response.status();
    let status = if http_status.is_server_error() {
        "error"
    } else {
        "ok"
    };
    info!(
        "event=http_request module=api status={} method={} path={} http_status={} duration_ms={}",
        status,
        method,
        path,
        http_status.as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    warn!("event=http_panic module=api status=error");
    ApiError::Internal("internal server error".to_string()).into_response()
}

/// Bind `config.socket_addr()` and serve until the process exits.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "event=server_start module=api status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state)).await
}
