//! HTTP adapters - REST API and live endpoint composition.
//!
//! ```text
//! /health                      GET   liveness + bus counters
//! /api/events/:id              GET   direct read
//! /api/events/:id/join         POST  join (auth)
//! /api/events/:id/leave        POST  leave (auth)
//! /api/live                    GET   WebSocket upgrade
//! ```

pub mod events;
pub mod middleware;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::adapters::websocket::{websocket_router, ChangeBus, WebSocketState};

pub use events::{event_routes, EventsApiError, EventsAppState};
pub use middleware::{auth_middleware, AuthRejection, AuthState, RequireAuth};

use events::HealthResponse;

/// Route: `GET /health`
pub async fn health(State(bus): State<Arc<ChangeBus>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        sessions: bus.session_count(),
        channels: bus.active_channels().len(),
    })
}

/// Builds the full application router.
///
/// The auth middleware wraps only the event routes; the WebSocket endpoint
/// and the health check are public.
pub fn app_router(events: EventsAppState, live: WebSocketState, auth: AuthState) -> Router {
    let bus = live.bus.clone();

    let event_api = event_routes()
        .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(events);

    Router::new()
        .route("/health", get(health).with_state(bus))
        .nest("/api/events", event_api)
        .nest("/api", websocket_router().with_state(live))
}
