//! EventStore port - durable record of events and their attendees.
//!
//! The store owns capacity and the attendee list. It offers a plain read and
//! a single conditional write; the membership registry builds join/leave on
//! top of those two.
//!
//! # Conditional update contract
//!
//! The registry reads an event, checks membership and capacity against that
//! snapshot, and asks the store to commit the resulting attendee list *only
//! if the snapshot is still current*. The snapshot is identified by its
//! `version`. Implementations must:
//!
//! - Apply the write atomically with the version comparison
//! - Refuse lists longer than the stored capacity
//! - Return `Conflict` when the version moved, `NotFound` when the event is gone
//! - Bump `version` by one on success and return the committed event

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::event::{Attendees, Event, MembershipError};
use crate::domain::foundation::EventId;

/// Failures reported by an [`EventStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    #[error("event {0} not found")]
    NotFound(EventId),

    /// Another writer committed since the caller's read.
    #[error("event {0} was modified concurrently")]
    Conflict(EventId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Internal(String),
}

impl From<EventStoreError> for MembershipError {
    fn from(err: EventStoreError) -> Self {
        match err {
            EventStoreError::NotFound(id) => MembershipError::NotFound(id),
            EventStoreError::Conflict(id) => MembershipError::StorageConflict(id),
            EventStoreError::Unavailable(reason) => MembershipError::StorageUnavailable(reason),
            EventStoreError::Internal(msg) => MembershipError::Internal(msg),
        }
    }
}

/// Port for reading events and conditionally rewriting their attendees.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Find an event by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such event exists
    /// - `Unavailable` / `Internal` on storage failure
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError>;

    /// Replace the attendee list if the event is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored version differs from `expected_version`
    ///   or the list no longer fits the capacity
    /// - `NotFound` if the event vanished
    /// - `Unavailable` / `Internal` on storage failure
    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError>;
}
