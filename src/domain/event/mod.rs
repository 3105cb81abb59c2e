//! Event domain module.
//!
//! Attendance of hosted events under a fixed capacity.
//!
//! # Module Structure
//!
//! - `aggregate` - Event aggregate (membership view)
//! - `attendance` - NotMember/Member state machine
//! - `attendees` - Duplicate-free attendee list
//! - `capacity` - Positive seat limit
//! - `channel` - `event:{id}:memberUpdate` naming
//! - `update` - Payload published after join/leave
//! - `errors` - Membership error taxonomy

mod aggregate;
mod attendance;
mod attendees;
mod capacity;
mod channel;
mod errors;
mod update;

pub use aggregate::Event;
pub use attendance::{AttendanceState, LeaveOutcome};
pub use attendees::Attendees;
pub use capacity::Capacity;
pub use channel::{MemberChannel, MEMBER_UPDATE_PATTERN};
pub use errors::MembershipError;
pub use update::{AttendanceChange, MemberUpdate};
