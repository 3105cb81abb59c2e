//! HTTP adapter for event membership endpoints.
//!
//! - `GET /api/events/:id` - Current event document
//! - `POST /api/events/:id/join` - Join as the authenticated user
//! - `POST /api/events/:id/leave` - Leave as the authenticated user

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, EventResponse, HealthResponse};
pub use handlers::{EventsApiError, EventsAppState};
pub use routes::event_routes;
