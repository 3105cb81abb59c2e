//! Member update published after every successful join or leave.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, Timestamp, UserId};

use super::{Event, MemberChannel};

/// What happened to the attendee list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttendanceChange {
    Joined {
        #[serde(rename = "userId")]
        user_id: UserId,
    },
    /// `was_member` is false when a non-member left and nothing changed.
    Left {
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "wasMember")]
        was_member: bool,
    },
}

/// Payload of `event:{id}:memberUpdate`: the full event document after the
/// change, plus what changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub event: Event,
    pub change: AttendanceChange,
    pub occurred_at: Timestamp,
}

impl MemberUpdate {
    pub fn joined(event: Event, user_id: UserId) -> Self {
        Self {
            event,
            change: AttendanceChange::Joined { user_id },
            occurred_at: Timestamp::now(),
        }
    }

    pub fn left(event: Event, user_id: UserId, was_member: bool) -> Self {
        Self {
            event,
            change: AttendanceChange::Left {
                user_id,
                was_member,
            },
            occurred_at: Timestamp::now(),
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event.id()
    }

    pub fn channel(&self) -> MemberChannel {
        MemberChannel::for_event(self.event.id())
    }
}
