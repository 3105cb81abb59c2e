//! Join - admit a user to an event if a seat is free.

use crate::domain::event::{Event, MemberUpdate, MembershipError};
use crate::domain::foundation::{EventId, UserId};

use super::registry::{MembershipRegistry, Plan};

/// Command to join an event.
#[derive(Debug, Clone)]
pub struct JoinEventCommand {
    pub event_id: EventId,
    pub user_id: UserId,
}

impl MembershipRegistry {
    /// Adds `cmd.user_id` to the attendees and publishes the new state.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `AlreadyMember` if the user already attends
    /// - `EventFull` if no seat is left
    /// - `StorageConflict` / `StorageUnavailable` if the write could not land
    pub async fn join(&self, cmd: JoinEventCommand) -> Result<Event, MembershipError> {
        let user_id = cmd.user_id;

        let (event, ()) = self
            .apply(cmd.event_id, |current| {
                Ok(Plan::Write(current.admit(&user_id)?, ()))
            })
            .await
            .map_err(|err| {
                tracing::debug!(
                    event_id = %cmd.event_id,
                    user_id = %user_id,
                    code = %err.code(),
                    "Join rejected"
                );
                err
            })?;

        tracing::info!(
            event_id = %event.id(),
            user_id = %user_id,
            attendees = event.attendees().len(),
            capacity = event.capacity().get(),
            "User joined event"
        );

        self.publisher
            .publish(MemberUpdate::joined(event.clone(), user_id));

        Ok(event)
    }
}
