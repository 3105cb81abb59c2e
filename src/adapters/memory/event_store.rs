//! In-memory implementation of the EventStore port.
//!
//! Each event sits behind its own mutex, so conditional writes to one event
//! serialize while writes to different events proceed in parallel. The outer
//! map lock is only held long enough to find the entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::event::{Attendees, Event};
use crate::domain::foundation::EventId;
use crate::ports::{EventStore, EventStoreError};

type Slot = Arc<Mutex<Event>>;

/// Map-backed [`EventStore`] with per-event locking.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, Slot>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `events`.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let store = Self::new();
        for event in events {
            store.insert(event);
        }
        store
    }

    /// Adds or replaces an event. Event creation is owned by another service;
    /// the binary seeds from `membership.seed_file` through [`Self::with_events`].
    pub fn insert(&self, event: Event) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event.id(), Arc::new(Mutex::new(event)));
    }

    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: &EventId) -> Result<Slot, EventStoreError> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or(EventStoreError::NotFound(*id))
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError> {
        let slot = self.slot(id)?;
        let event = slot.lock().unwrap_or_else(PoisonError::into_inner).clone();
        Ok(event)
    }

    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError> {
        let slot = self.slot(id)?;
        let mut event = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if event.version() != expected_version {
            return Err(EventStoreError::Conflict(*id));
        }
        if let Err(e) = event.commit_attendees(attendees) {
            tracing::debug!(event_id = %id, "Rejected attendee list: {}", e);
            return Err(EventStoreError::Conflict(*id));
        }

        Ok(event.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::Capacity;
    use crate::domain::foundation::UserId;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn seeded(capacity: u32) -> (InMemoryEventStore, EventId) {
        let store = InMemoryEventStore::new();
        let event = Event::new(
            EventId::new(),
            "Hack night",
            uid("host"),
            Capacity::new(capacity).unwrap(),
        );
        let id = event.id();
        store.insert(event);
        (store, id)
    }

    fn list(ids: &[&str]) -> Attendees {
        Attendees::from_ids(ids.iter().map(|s| uid(s)).collect()).unwrap()
    }

    #[tokio::test]
    async fn with_events_preloads_each_event() {
        let first = Event::new(EventId::new(), "A", uid("host"), Capacity::new(1).unwrap());
        let second = Event::new(EventId::new(), "B", uid("host"), Capacity::new(2).unwrap());
        let second_id = second.id();

        let store = InMemoryEventStore::with_events([first, second]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id(&second_id).await.unwrap().name(), "B");
    }

    #[tokio::test]
    async fn find_missing_is_not_found() {
        let store = InMemoryEventStore::new();
        let id = EventId::new();
        assert_eq!(
            store.find_by_id(&id).await.unwrap_err(),
            EventStoreError::NotFound(id)
        );
    }

    #[tokio::test]
    async fn matching_version_commits_and_bumps() {
        let (store, id) = seeded(2);

        let updated = store
            .conditional_update_attendees(&id, 0, list(&["a"]))
            .await
            .unwrap();

        assert_eq!(updated.version(), 1);
        assert_eq!(store.find_by_id(&id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn stale_version_conflicts() {
        let (store, id) = seeded(2);
        store
            .conditional_update_attendees(&id, 0, list(&["a"]))
            .await
            .unwrap();

        let err = store
            .conditional_update_attendees(&id, 0, list(&["b"]))
            .await
            .unwrap_err();

        assert_eq!(err, EventStoreError::Conflict(id));
        assert_eq!(
            store.find_by_id(&id).await.unwrap().attendees(),
            &list(&["a"])
        );
    }

    #[tokio::test]
    async fn oversized_list_is_refused() {
        let (store, id) = seeded(1);

        let err = store
            .conditional_update_attendees(&id, 0, list(&["a", "b"]))
            .await
            .unwrap_err();

        assert_eq!(err, EventStoreError::Conflict(id));
        assert!(store.find_by_id(&id).await.unwrap().attendees().is_empty());
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = InMemoryEventStore::new();
        let id = EventId::new();
        let err = store
            .conditional_update_attendees(&id, 0, Attendees::new())
            .await
            .unwrap_err();
        assert_eq!(err, EventStoreError::NotFound(id));
    }
}
