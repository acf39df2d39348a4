//! HTTP API server.
//!
//! This module serves the consumer-facing endpoint surface over HTTP.
//! Built on Axum, it exposes the blocking sample read and the ignored
//! write path under a versioned route tree.

pub mod v1;

pub use v1::AppState;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::tracing::prelude::*;

/// Serve the API on an already-bound listener until `running` is
/// cancelled.
///
/// The listener is bound by the caller so that a bind failure surfaces
/// during initialization, where earlier acquisitions can still be
/// released in order.
pub async fn task(listener: TcpListener, state: AppState, running: CancellationToken) {
    let app = Router::new()
        .nest("/api/v1", v1::routes(state))
        .layer(TraceLayer::new_for_http());

    match listener.local_addr() {
        Ok(addr) => info!(addr = %addr, "API listening."),
        Err(_) => info!("API listening."),
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move { running.cancelled().await })
        .await
    {
        error!(error = %e, "API server terminated.");
    }

    trace!("API task stopped.");
}
