//! HTTP handlers for event membership endpoints.
//!
//! These handlers connect Axum routes to the membership registry.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    GetEventHandler, GetEventQuery, JoinEventCommand, LeaveEventCommand, MembershipRegistry,
};
use crate::domain::event::MembershipError;
use crate::domain::foundation::{ErrorCode, EventId};

use super::dto::{ErrorResponse, EventResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for event routes.
#[derive(Clone)]
pub struct EventsAppState {
    pub registry: Arc<MembershipRegistry>,
}

impl EventsAppState {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub fn get_event_handler(&self) -> GetEventHandler {
        GetEventHandler::new(self.registry.clone())
    }
}

fn parse_event_id(raw: &str) -> Result<EventId, EventsApiError> {
    raw.parse().map_err(|_| EventsApiError::InvalidEventId)
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/events/:id - Current event document
pub async fn get_event(
    State(state): State<EventsAppState>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, EventsApiError> {
    let event_id = parse_event_id(&event_id)?;
    let event = state
        .get_event_handler()
        .handle(GetEventQuery { event_id })
        .await?;
    Ok(Json(EventResponse::from(event)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/events/:id/join - Join as the authenticated user
pub async fn join_event(
    State(state): State<EventsAppState>,
    RequireAuth(user): RequireAuth,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, EventsApiError> {
    let event_id = parse_event_id(&event_id)?;
    let event = state
        .registry
        .join(JoinEventCommand {
            event_id,
            user_id: user.id,
        })
        .await?;
    Ok(Json(EventResponse::from(event)))
}

/// POST /api/events/:id/leave - Leave as the authenticated user
pub async fn leave_event(
    State(state): State<EventsAppState>,
    RequireAuth(user): RequireAuth,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, EventsApiError> {
    let event_id = parse_event_id(&event_id)?;
    let event = state
        .registry
        .leave(LeaveEventCommand {
            event_id,
            user_id: user.id,
        })
        .await?;
    Ok(Json(EventResponse::from(event)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts membership errors to HTTP responses.
#[derive(Debug)]
pub enum EventsApiError {
    Membership(MembershipError),
    InvalidEventId,
}

impl From<MembershipError> for EventsApiError {
    fn from(err: MembershipError) -> Self {
        Self::Membership(err)
    }
}

impl IntoResponse for EventsApiError {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            EventsApiError::InvalidEventId => {
                let body = ErrorResponse::new(ErrorCode::ValidationFailed, "Invalid event id");
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            EventsApiError::Membership(err) => err,
        };

        let status = match &err {
            MembershipError::NotFound(_) => StatusCode::NOT_FOUND,
            MembershipError::AlreadyMember { .. } | MembershipError::EventFull { .. } => {
                StatusCode::BAD_REQUEST
            }
            MembershipError::Unauthorized => StatusCode::UNAUTHORIZED,
            MembershipError::StorageConflict(_) => StatusCode::CONFLICT,
            MembershipError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            MembershipError::Internal(msg) => {
                tracing::error!("Membership request failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse::new(err.code(), err.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn status_of(err: MembershipError) -> StatusCode {
        EventsApiError::from(err).into_response().status()
    }

    #[test]
    fn maps_membership_errors_to_status() {
        let id = EventId::new();
        let user = UserId::new("u").unwrap();

        assert_eq!(status_of(MembershipError::not_found(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(MembershipError::already_member(id, user)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MembershipError::event_full(id, 2)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(MembershipError::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(MembershipError::StorageConflict(id)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(MembershipError::storage_unavailable("timeout")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(MembershipError::internal("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn bad_event_id_is_bad_request() {
        let response = EventsApiError::InvalidEventId.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parses_uuid_event_ids() {
        let id = EventId::new();
        assert_eq!(parse_event_id(&id.to_string()).unwrap(), id);
        assert!(parse_event_id("not-a-uuid").is_err());
    }
}
