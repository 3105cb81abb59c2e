//! MembershipRegistry - join/leave under the capacity invariant.
//!
//! Every attendee change goes through [`MembershipRegistry::apply`]:
//!
//! ```text
//! read event ──▶ plan new attendee list ──▶ conditional write @ version
//!     ▲                 │ (domain error:                 │
//!     │                 ▼  no write)                     │ Conflict
//!     └──────────── retry once ◀─────────────────────────┘
//! ```
//!
//! The publish that follows a commit is handed to the bus and never awaited.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::event::{Attendees, Event, MembershipError};
use crate::domain::foundation::EventId;
use crate::ports::{EventStore, EventStoreError, MemberUpdatePublisher};

/// Total attempts of read-check-write before a conflict is surfaced.
pub(super) const MAX_ATTEMPTS: u32 = 2;

/// Result of planning a change against one snapshot.
pub(super) enum Plan<T> {
    /// Write this attendee list, then report `T`.
    Write(Attendees, T),
    /// Nothing to write; the snapshot already satisfies the request.
    Unchanged(T),
}

/// Enforces the join/leave state machine and capacity on top of an
/// [`EventStore`], publishing each success on the Change Bus.
pub struct MembershipRegistry {
    pub(super) store: Arc<dyn EventStore>,
    pub(super) publisher: Arc<dyn MemberUpdatePublisher>,
    store_timeout: Duration,
}

impl MembershipRegistry {
    pub fn new(
        store: Arc<dyn EventStore>,
        publisher: Arc<dyn MemberUpdatePublisher>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            publisher,
            store_timeout,
        }
    }

    /// Runs `plan` against the latest snapshot and commits it atomically.
    pub(super) async fn apply<T, F>(
        &self,
        event_id: EventId,
        plan: F,
    ) -> Result<(Event, T), MembershipError>
    where
        F: Fn(&Event) -> Result<Plan<T>, MembershipError>,
    {
        let mut attempt = 1;
        loop {
            let current = self.read(event_id).await?;

            let (attendees, outcome) = match plan(&current)? {
                Plan::Unchanged(outcome) => return Ok((current, outcome)),
                Plan::Write(attendees, outcome) => (attendees, outcome),
            };

            let committed = self
                .within_deadline(
                    event_id,
                    self.store.conditional_update_attendees(
                        &event_id,
                        current.version(),
                        attendees,
                    ),
                )
                .await?;

            match committed {
                Ok(event) => return Ok((event, outcome)),
                Err(EventStoreError::Conflict(_)) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(
                        event_id = %event_id,
                        attempt,
                        "Attendee write lost a race, re-reading"
                    );
                    attempt += 1;
                }
                Err(EventStoreError::Conflict(_)) => {
                    tracing::warn!(
                        event_id = %event_id,
                        attempts = attempt,
                        "Attendee write kept conflicting, giving up"
                    );
                    return Err(MembershipError::StorageConflict(event_id));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Direct read with the store deadline applied.
    pub async fn read(&self, event_id: EventId) -> Result<Event, MembershipError> {
        self.within_deadline(event_id, self.store.find_by_id(&event_id))
            .await?
            .map_err(MembershipError::from)
    }

    async fn within_deadline<T>(
        &self,
        event_id: EventId,
        call: impl Future<Output = Result<T, EventStoreError>>,
    ) -> Result<Result<T, EventStoreError>, MembershipError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                tracing::warn!(
                    event_id = %event_id,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Event store call timed out"
                );
                MembershipError::storage_unavailable(format!(
                    "event store did not answer within {}ms for event {}",
                    self.store_timeout.as_millis(),
                    event_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::membership::test_support::{
        sample_event, ConflictingStore, MockEventStore, RecordingPublisher, SlowStore,
    };
    use crate::domain::foundation::{ErrorCode, UserId};

    fn registry(store: Arc<dyn EventStore>) -> MembershipRegistry {
        MembershipRegistry::new(
            store,
            Arc::new(RecordingPublisher::new()),
            Duration::from_millis(200),
        )
    }

    fn add(user: &str) -> impl Fn(&Event) -> Result<Plan<()>, MembershipError> {
        let user = UserId::new(user).unwrap();
        move |event: &Event| Ok(Plan::Write(event.admit(&user)?, ()))
    }

    #[tokio::test]
    async fn apply_commits_planned_list() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(MockEventStore::with_event(event));
        let registry = registry(store.clone());

        let (committed, ()) = registry.apply(id, add("alice")).await.unwrap();

        assert_eq!(committed.attendees().len(), 1);
        assert_eq!(committed.version(), 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn apply_skips_write_when_unchanged() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(MockEventStore::with_event(event));
        let registry = registry(store.clone());

        let (current, outcome) = registry
            .apply(id, |_| Ok(Plan::Unchanged(7)))
            .await
            .unwrap();

        assert_eq!(outcome, 7);
        assert_eq!(current.version(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn apply_retries_one_conflict() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(ConflictingStore::new(event, 1));
        let registry = registry(store.clone());

        let result = registry.apply(id, add("alice")).await;

        assert!(result.is_ok());
        assert_eq!(store.attempts(), 2);
    }

    #[tokio::test]
    async fn apply_surfaces_second_conflict() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(ConflictingStore::new(event, 5));
        let registry = registry(store.clone());

        let err = registry.apply(id, add("alice")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::StorageConflict);
        assert_eq!(store.attempts(), MAX_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn apply_times_out_as_storage_unavailable() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(SlowStore::new(event, Duration::from_secs(5)));
        let registry = registry(store);

        let err = registry.apply(id, add("alice")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::StorageUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn timeout_names_the_event() {
        let event = sample_event(3);
        let id = event.id();
        let store = Arc::new(SlowStore::new(event, Duration::from_secs(5)));
        let registry = registry(store);

        let err = registry.apply(id, add("alice")).await.unwrap_err();

        match err {
            MembershipError::StorageUnavailable(reason) => {
                assert!(reason.contains(&id.to_string()), "reason was {reason}");
            }
            other => panic!("expected StorageUnavailable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_maps_missing_event_to_not_found() {
        let registry = registry(Arc::new(MockEventStore::new()));
        let err = registry.read(EventId::new()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventNotFound);
    }
}
