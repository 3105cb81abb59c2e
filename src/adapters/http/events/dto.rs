//! Data Transfer Objects for event endpoints.
//!
//! These types define the JSON shapes for HTTP responses.

use serde::Serialize;

use crate::domain::event::Event;
use crate::domain::foundation::ErrorCode;

/// Event document returned by join, leave and direct reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub capacity: u32,
    pub attendees: Vec<String>,
    pub seats_remaining: u32,
    pub version: u64,
    pub updated_at: String,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().to_string(),
            creator_id: event.creator_id().to_string(),
            capacity: event.capacity().get(),
            attendees: event.attendees().iter().map(|u| u.to_string()).collect(),
            seats_remaining: event.seats_remaining(),
            version: event.version(),
            updated_at: event.updated_at().to_rfc3339(),
        }
    }
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self::from(&event)
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Stable code for programmatic handling.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub sessions: usize,
    pub channels: usize,
}
