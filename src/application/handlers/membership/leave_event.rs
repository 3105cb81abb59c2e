//! Leave - drop a user from an event's attendees.
//!
//! Leaving an event you do not attend succeeds without a write, and the
//! unchanged state is still published.

use crate::domain::event::{Event, LeaveOutcome, MemberUpdate, MembershipError};
use crate::domain::foundation::{EventId, UserId};

use super::registry::{MembershipRegistry, Plan};

/// Command to leave an event.
#[derive(Debug, Clone)]
pub struct LeaveEventCommand {
    pub event_id: EventId,
    pub user_id: UserId,
}

impl MembershipRegistry {
    /// Removes `cmd.user_id` from the attendees and publishes the new state.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `StorageConflict` / `StorageUnavailable` if the write could not land
    pub async fn leave(&self, cmd: LeaveEventCommand) -> Result<Event, MembershipError> {
        let user_id = cmd.user_id;

        let (event, outcome) = self
            .apply(cmd.event_id, |current| {
                Ok(match current.release(&user_id) {
                    (attendees, LeaveOutcome::Removed) => {
                        Plan::Write(attendees, LeaveOutcome::Removed)
                    }
                    (_, LeaveOutcome::NoOp) => Plan::Unchanged(LeaveOutcome::NoOp),
                })
            })
            .await?;

        let was_member = outcome == LeaveOutcome::Removed;
        if was_member {
            tracing::info!(
                event_id = %event.id(),
                user_id = %user_id,
                attendees = event.attendees().len(),
                "User left event"
            );
        } else {
            tracing::debug!(
                event_id = %event.id(),
                user_id = %user_id,
                "Leave by non-member, nothing to write"
            );
        }

        self.publisher
            .publish(MemberUpdate::left(event.clone(), user_id, was_member));

        Ok(event)
    }
}
