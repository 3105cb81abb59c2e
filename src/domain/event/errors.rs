//! Membership error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | AlreadyMember | 400 |
//! | EventFull | 400 |
//! | Unauthorized | 401 |
//! | StorageConflict | 409 |
//! | StorageUnavailable | 503 |
//! | Internal | 500 |

use crate::domain::foundation::{ErrorCode, EventId, UserId};

/// Errors produced by join/leave and event reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// Event does not exist.
    NotFound(EventId),

    /// Caller already attends the event.
    AlreadyMember { event_id: EventId, user_id: UserId },

    /// Attendance has reached capacity.
    EventFull { event_id: EventId, capacity: u32 },

    /// Caller identity missing or invalid.
    Unauthorized,

    /// A concurrent write kept winning after the transparent retry.
    StorageConflict(EventId),

    /// Store timed out or is unreachable.
    StorageUnavailable(String),

    /// Anything unexpected.
    Internal(String),
}

impl MembershipError {
    pub fn not_found(event_id: EventId) -> Self {
        MembershipError::NotFound(event_id)
    }

    pub fn already_member(event_id: EventId, user_id: UserId) -> Self {
        MembershipError::AlreadyMember { event_id, user_id }
    }

    pub fn event_full(event_id: EventId, capacity: u32) -> Self {
        MembershipError::EventFull { event_id, capacity }
    }

    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        MembershipError::StorageUnavailable(reason.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MembershipError::Internal(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound(_) => ErrorCode::EventNotFound,
            MembershipError::AlreadyMember { .. } => ErrorCode::AlreadyMember,
            MembershipError::EventFull { .. } => ErrorCode::EventFull,
            MembershipError::Unauthorized => ErrorCode::Unauthorized,
            MembershipError::StorageConflict(_) => ErrorCode::StorageConflict,
            MembershipError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            MembershipError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::NotFound(_) => "Event not found".to_string(),
            MembershipError::AlreadyMember { .. } => "Already attending".to_string(),
            MembershipError::EventFull { .. } => "Event is full".to_string(),
            MembershipError::Unauthorized => "Authentication is required".to_string(),
            MembershipError::StorageConflict(_) => {
                "Event was modified concurrently, please retry".to_string()
            }
            MembershipError::StorageUnavailable(_) => {
                "Event storage is temporarily unavailable, please retry".to_string()
            }
            MembershipError::Internal(_) => "Server error".to_string(),
        }
    }

    /// Returns true if the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MembershipError::StorageConflict(_) | MembershipError::StorageUnavailable(_)
        )
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipError::NotFound(id) => write!(f, "event {} not found", id),
            MembershipError::AlreadyMember { event_id, user_id } => {
                write!(f, "user {} already attends event {}", user_id, event_id)
            }
            MembershipError::EventFull { event_id, capacity } => {
                write!(f, "event {} is at capacity ({})", event_id, capacity)
            }
            MembershipError::Unauthorized => write!(f, "unauthorized"),
            MembershipError::StorageConflict(id) => {
                write!(f, "conflicting concurrent write on event {}", id)
            }
            MembershipError::StorageUnavailable(reason) => {
                write!(f, "event storage unavailable: {}", reason)
            }
            MembershipError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for MembershipError {}
