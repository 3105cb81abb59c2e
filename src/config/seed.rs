//! Seed events for the in-memory store.
//!
//! Event creation belongs to another service. Without a database the hub has
//! no events of its own, so a JSON fixture can be pointed at with
//! `RSVP_HUB__MEMBERSHIP__SEED_FILE`:
//!
//! ```text
//! [
//!   { "id": "7f0c...", "name": "Launch party", "creatorId": "host-1", "capacity": 50 },
//!   { "name": "Standup", "creatorId": "host-2", "capacity": 8 }
//! ]
//! ```
//!
//! Entries without an `id` get a fresh one at startup.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::domain::event::{Capacity, Event};
use crate::domain::foundation::{EventId, UserId};

use super::error::{ConfigError, ValidationError};

/// One fixture entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEvent {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub creator_id: String,
    pub capacity: u32,
}

impl SeedEvent {
    /// Builds an empty event from the entry.
    pub fn into_event(self) -> Result<Event, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidSeedEvent {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        let creator_id =
            UserId::new(self.creator_id.as_str()).map_err(|e| invalid(e.to_string()))?;
        let capacity = Capacity::new(self.capacity).map_err(|e| invalid(e.to_string()))?;
        let id = self.id.map(EventId::from_uuid).unwrap_or_default();

        Ok(Event::new(id, self.name, creator_id, capacity))
    }
}

/// Parses a fixture document. Explicit ids must be unique.
pub fn parse_seed_events(json: &str) -> Result<Vec<SeedEvent>, ConfigError> {
    let seeds: Vec<SeedEvent> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    for id in seeds.iter().filter_map(|s| s.id) {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateSeedEvent(id.to_string()).into());
        }
    }
    Ok(seeds)
}

/// Reads and parses the fixture at `path`.
pub fn load_seed_events(path: &Path) -> Result<Vec<SeedEvent>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedRead {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed_events(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_entries_with_and_without_id() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"[
                {{"id":"{id}","name":"Launch party","creatorId":"host-1","capacity":50}},
                {{"name":"Standup","creatorId":"host-2","capacity":8}}
            ]"#
        );

        let seeds = parse_seed_events(&json).unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].id, Some(id));
        assert_eq!(seeds[1].id, None);
        assert_eq!(seeds[1].capacity, 8);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"[
                {{"id":"{id}","name":"A","creatorId":"h","capacity":1}},
                {{"id":"{id}","name":"B","creatorId":"h","capacity":1}}
            ]"#
        );

        assert!(matches!(
            parse_seed_events(&json),
            Err(ConfigError::ValidationFailed(ValidationError::DuplicateSeedEvent(_)))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_seed_events(r#"[{"name":"A"}]"#),
            Err(ConfigError::SeedParse(_))
        ));
    }

    #[test]
    fn test_into_event_keeps_explicit_id() {
        let id = Uuid::new_v4();
        let seed = SeedEvent {
            id: Some(id),
            name: "Quiz".to_string(),
            creator_id: "host".to_string(),
            capacity: 4,
        };

        let event = seed.into_event().unwrap();

        assert_eq!(event.id(), EventId::from_uuid(id));
        assert_eq!(event.capacity().get(), 4);
        assert!(event.attendees().is_empty());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let seed = SeedEvent {
            id: None,
            name: "Empty room".to_string(),
            creator_id: "host".to_string(),
            capacity: 0,
        };

        assert!(matches!(
            seed.into_event(),
            Err(ValidationError::InvalidSeedEvent { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let path =
            std::env::temp_dir().join(format!("rsvp-hub-missing-{}.json", Uuid::new_v4()));
        assert!(matches!(
            load_seed_events(&path),
            Err(ConfigError::SeedRead { .. })
        ));
    }
}
