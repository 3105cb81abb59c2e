//! Attendance state machine per (event, user) pair.
//!
//! ```text
//!              join
//!  NotMember ────────▶ Member
//!      ▲                 │
//!      └──────leave──────┘
//! ```
//!
//! Join from `Member` is rejected. Leave from `NotMember` is a no-op.
//! Capacity is checked by the aggregate, not here.

use serde::{Deserialize, Serialize};

/// Whether a user currently counts against an event's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceState {
    NotMember,
    Member,
}

/// Outcome of applying `leave` to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Removed,
    NoOp,
}

impl AttendanceState {
    /// Target state of a join, or `None` when the user already attends.
    pub fn on_join(self) -> Option<AttendanceState> {
        match self {
            AttendanceState::NotMember => Some(AttendanceState::Member),
            AttendanceState::Member => None,
        }
    }

    pub fn on_leave(self) -> (AttendanceState, LeaveOutcome) {
        match self {
            AttendanceState::Member => (AttendanceState::NotMember, LeaveOutcome::Removed),
            AttendanceState::NotMember => (AttendanceState::NotMember, LeaveOutcome::NoOp),
        }
    }
}
