//! Membership handlers - join, leave and read an event's attendees.

mod get_event;
mod join_event;
mod leave_event;
mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use get_event::{GetEventHandler, GetEventQuery};
pub use join_event::JoinEventCommand;
pub use leave_event::LeaveEventCommand;
pub use registry::MembershipRegistry;
