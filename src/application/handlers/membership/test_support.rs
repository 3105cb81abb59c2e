//! Shared mocks for the membership handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::event::{Attendees, Capacity, Event, MemberUpdate};
use crate::domain::foundation::{EventId, UserId};
use crate::ports::{EventStore, EventStoreError, MemberUpdatePublisher};

pub fn uid(s: &str) -> UserId {
    UserId::new(s).unwrap()
}

pub fn sample_event(capacity: u32) -> Event {
    Event::new(
        EventId::new(),
        "Rooftop meetup",
        uid("creator"),
        Capacity::new(capacity).unwrap(),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Stores
// ════════════════════════════════════════════════════════════════════════════

/// Map-backed store with a real version check.
pub struct MockEventStore {
    events: Mutex<HashMap<EventId, Event>>,
    writes: AtomicUsize,
    fail_with: Option<EventStoreError>,
}

impl MockEventStore {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    pub fn with_event(event: Event) -> Self {
        let store = Self::new();
        store.events.lock().unwrap().insert(event.id(), event);
        store
    }

    pub fn failing(err: EventStoreError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new()
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &EventId) -> Option<Event> {
        self.events.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl EventStore for MockEventStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.get(id).ok_or(EventStoreError::NotFound(*id))
    }

    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError> {
        let mut events = self.events.lock().unwrap();
        let event = events.get_mut(id).ok_or(EventStoreError::NotFound(*id))?;
        if event.version() != expected_version {
            return Err(EventStoreError::Conflict(*id));
        }
        event
            .commit_attendees(attendees)
            .map_err(|_| EventStoreError::Conflict(*id))?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(event.clone())
    }
}

/// Store whose first `conflicts` writes report a lost race.
pub struct ConflictingStore {
    inner: MockEventStore,
    conflicts: usize,
    attempts: AtomicUsize,
}

impl ConflictingStore {
    pub fn new(event: Event, conflicts: usize) -> Self {
        Self {
            inner: MockEventStore::with_event(event),
            conflicts,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for ConflictingStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError> {
        self.inner.find_by_id(id).await
    }

    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.conflicts {
            return Err(EventStoreError::Conflict(*id));
        }
        self.inner
            .conditional_update_attendees(id, expected_version, attendees)
            .await
    }
}

/// Store that answers reads immediately and stalls on writes.
pub struct SlowStore {
    inner: MockEventStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(event: Event, delay: Duration) -> Self {
        Self {
            inner: MockEventStore::with_event(event),
            delay,
        }
    }
}

#[async_trait]
impl EventStore for SlowStore {
    async fn find_by_id(&self, id: &EventId) -> Result<Event, EventStoreError> {
        self.inner.find_by_id(id).await
    }

    async fn conditional_update_attendees(
        &self,
        id: &EventId,
        expected_version: u64,
        attendees: Attendees,
    ) -> Result<Event, EventStoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner
            .conditional_update_attendees(id, expected_version, attendees)
            .await
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Publisher
// ════════════════════════════════════════════════════════════════════════════

pub struct RecordingPublisher {
    published: Mutex<Vec<MemberUpdate>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn published(&self) -> Vec<MemberUpdate> {
        self.published.lock().unwrap().clone()
    }
}

impl MemberUpdatePublisher for RecordingPublisher {
    fn publish(&self, update: MemberUpdate) {
        self.published.lock().unwrap().push(update);
    }
}
