//! Event aggregate, membership view.
//!
//! Only the fields the membership core reads are modelled here. Everything
//! else about an event (description, date, location, image) belongs to the
//! CRUD collaborator and never passes through this crate.
//!
//! # Invariants
//!
//! - `attendees.len() <= capacity`
//! - `attendees` has no duplicates (enforced by [`Attendees`])
//! - `version` grows by one on every committed attendee change

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Timestamp, UserId, ValidationError};

use super::{AttendanceState, Attendees, Capacity, LeaveOutcome, MembershipError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EventDocument")]
pub struct Event {
    id: EventId,
    name: String,
    creator_id: UserId,
    capacity: Capacity,
    attendees: Attendees,
    version: u64,
    updated_at: Timestamp,
}

impl Event {
    /// A freshly hosted event with nobody attending.
    pub fn new(id: EventId, name: impl Into<String>, creator_id: UserId, capacity: Capacity) -> Self {
        Self {
            id,
            name: name.into(),
            creator_id,
            capacity,
            attendees: Attendees::new(),
            version: 0,
            updated_at: Timestamp::now(),
        }
    }

    /// Rehydrates a stored event, re-checking the capacity invariant.
    pub fn restore(
        id: EventId,
        name: String,
        creator_id: UserId,
        capacity: Capacity,
        attendees: Attendees,
        version: u64,
        updated_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        check_fits(capacity, &attendees)?;
        Ok(Self {
            id,
            name,
            creator_id,
            capacity,
            attendees,
            version,
            updated_at,
        })
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn attendees(&self) -> &Attendees {
        &self.attendees
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn attendance_of(&self, user_id: &UserId) -> AttendanceState {
        if self.attendees.contains(user_id) {
            AttendanceState::Member
        } else {
            AttendanceState::NotMember
        }
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_exhausted_by(self.attendees.len())
    }

    pub fn seats_remaining(&self) -> u32 {
        self.capacity
            .get()
            .saturating_sub(self.attendees.len() as u32)
    }

    /// Attendee list after admitting `user_id`.
    ///
    /// Membership is checked before capacity, so a member re-joining a full
    /// event sees `AlreadyMember`.
    pub fn admit(&self, user_id: &UserId) -> Result<Attendees, MembershipError> {
        if self.attendance_of(user_id).on_join().is_none() {
            return Err(MembershipError::already_member(self.id, user_id.clone()));
        }
        if self.is_full() {
            return Err(MembershipError::event_full(self.id, self.capacity.get()));
        }
        self.attendees
            .with(user_id)
            .ok_or_else(|| MembershipError::already_member(self.id, user_id.clone()))
    }

    /// Attendee list after `user_id` leaves. Never fails.
    pub fn release(&self, user_id: &UserId) -> (Attendees, LeaveOutcome) {
        let (_, outcome) = self.attendance_of(user_id).on_leave();
        match outcome {
            LeaveOutcome::Removed => (self.attendees.without(user_id), outcome),
            LeaveOutcome::NoOp => (self.attendees.clone(), outcome),
        }
    }

    /// Commits a new attendee list, bumping the version.
    ///
    /// Stores call this only after their own version check passed.
    pub fn commit_attendees(&mut self, attendees: Attendees) -> Result<(), ValidationError> {
        check_fits(self.capacity, &attendees)?;
        self.attendees = attendees;
        self.version += 1;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn check_fits(capacity: Capacity, attendees: &Attendees) -> Result<(), ValidationError> {
    if attendees.len() > capacity.get() as usize {
        return Err(ValidationError::out_of_range(
            "attendees",
            0,
            i64::from(capacity.get()),
            attendees.len() as i64,
        ));
    }
    Ok(())
}

/// Wire shape of [`Event`], validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    id: EventId,
    name: String,
    creator_id: UserId,
    capacity: Capacity,
    attendees: Attendees,
    version: u64,
    updated_at: Timestamp,
}

impl TryFrom<EventDocument> for Event {
    type Error = ValidationError;

    fn try_from(doc: EventDocument) -> Result<Self, Self::Error> {
        Event::restore(
            doc.id,
            doc.name,
            doc.creator_id,
            doc.capacity,
            doc.attendees,
            doc.version,
            doc.updated_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn event_with_capacity(cap: u32) -> Event {
        Event::new(
            EventId::new(),
            "Rust meetup",
            uid("host"),
            Capacity::new(cap).unwrap(),
        )
    }

    fn admitted(mut event: Event, user: &str) -> Event {
        let next = event.admit(&uid(user)).unwrap();
        event.commit_attendees(next).unwrap();
        event
    }

    #[test]
    fn new_event_has_no_attendees_and_creator_is_not_one() {
        let event = event_with_capacity(3);
        assert!(event.attendees().is_empty());
        assert_eq!(event.attendance_of(&uid("host")), AttendanceState::NotMember);
        assert_eq!(event.seats_remaining(), 3);
    }

    #[test]
    fn admit_adds_user() {
        let event = admitted(event_with_capacity(2), "alice");
        assert!(event.attendees().contains(&uid("alice")));
        assert_eq!(event.version(), 1);
    }

    #[test]
    fn admit_rejects_existing_member() {
        let event = admitted(event_with_capacity(2), "alice");
        let err = event.admit(&uid("alice")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyMember);
    }

    #[test]
    fn admit_rejects_when_full() {
        let event = admitted(event_with_capacity(1), "alice");
        let err = event.admit(&uid("bob")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventFull);
    }

    #[test]
    fn member_rejoining_full_event_is_already_member() {
        let event = admitted(event_with_capacity(1), "alice");
        let err = event.admit(&uid("alice")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyMember);
    }

    #[test]
    fn release_of_non_member_is_noop() {
        let event = admitted(event_with_capacity(2), "alice");
        let (next, outcome) = event.release(&uid("bob"));
        assert_eq!(outcome, LeaveOutcome::NoOp);
        assert_eq!(&next, event.attendees());
    }

    #[test]
    fn release_removes_member() {
        let event = admitted(event_with_capacity(2), "alice");
        let (next, outcome) = event.release(&uid("alice"));
        assert_eq!(outcome, LeaveOutcome::Removed);
        assert!(next.is_empty());
    }

    #[test]
    fn commit_refuses_overflow() {
        let mut event = event_with_capacity(1);
        let overflow = Attendees::from_ids(vec![uid("a"), uid("b")]).unwrap();
        assert!(event.commit_attendees(overflow).is_err());
        assert_eq!(event.version(), 0);
    }

    #[test]
    fn restore_refuses_overflow() {
        let result = Event::restore(
            EventId::new(),
            "x".into(),
            uid("host"),
            Capacity::new(1).unwrap(),
            Attendees::from_ids(vec![uid("a"), uid("b")]).unwrap(),
            3,
            Timestamp::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn serializes_as_camel_case_document() {
        let event = admitted(event_with_capacity(2), "alice");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["capacity"], 2);
        assert_eq!(json["attendees"], serde_json::json!(["alice"]));
        assert_eq!(json["creatorId"], "host");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn deserialization_rechecks_capacity() {
        let event = event_with_capacity(1);
        let mut json = serde_json::to_value(&event).unwrap();
        json["attendees"] = serde_json::json!(["a", "b"]);
        assert!(serde_json::from_value::<Event>(json).is_err());
    }
}
