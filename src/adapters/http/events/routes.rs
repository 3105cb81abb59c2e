//! Axum router configuration for event endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_event, join_event, leave_event, EventsAppState};

/// Create the event API router.
///
/// # Routes
///
/// - `GET /:id` - Current event document (no auth)
/// - `POST /:id/join` - Join the event (requires authentication)
/// - `POST /:id/leave` - Leave the event (requires authentication)
pub fn event_routes() -> Router<EventsAppState> {
    Router::new()
        .route("/:id", get(get_event))
        .route("/:id/join", post(join_event))
        .route("/:id/leave", post(leave_event))
}
