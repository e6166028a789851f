//! Route configuration.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// # Endpoints
///
/// - `GET /` - health check
/// - `POST /api/sdp/offer` - SDP offer/answer signaling
/// - `GET /ws` - observer WebSocket upgrade
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/api/sdp/offer", post(handlers::signaling::sdp_offer))
        .route("/ws", get(handlers::observer::observer_handler))
        .layer(TraceLayer::new_for_http())
}
