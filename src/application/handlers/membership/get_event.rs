//! GetEventHandler - Query handler for reading an event's current state.

use std::sync::Arc;

use crate::domain::event::{Event, MembershipError};
use crate::domain::foundation::EventId;

use super::registry::MembershipRegistry;

/// Query to fetch one event.
#[derive(Debug, Clone)]
pub struct GetEventQuery {
    pub event_id: EventId,
}

/// Handler for direct event reads. Subscribers use this to refresh after a
/// missed update.
pub struct GetEventHandler {
    registry: Arc<MembershipRegistry>,
}

impl GetEventHandler {
    pub fn new(registry: Arc<MembershipRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: GetEventQuery) -> Result<Event, MembershipError> {
        self.registry.read(query.event_id).await
    }
}
