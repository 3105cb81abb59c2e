//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, auth types and error codes
//! that form the vocabulary of the event attendance domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{ErrorCode, ValidationError};
pub use ids::{EventId, UserId};
pub use timestamp::Timestamp;
