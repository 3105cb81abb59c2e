//! Membership registry and Change Bus tuning

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{ConfigError, ValidationError};
use super::seed::{load_seed_events, SeedEvent};

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipConfig {
    /// Deadline for each event store call, in milliseconds
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,

    /// Outbound queue length per live session
    #[serde(default = "default_session_buffer")]
    pub session_buffer: usize,

    /// JSON fixture of events to preload into the in-memory store
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl MembershipConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Events listed in `seed_file`, or none when it is unset.
    pub fn seed_events(&self) -> Result<Vec<SeedEvent>, ConfigError> {
        match &self.seed_file {
            Some(path) => load_seed_events(path),
            None => Ok(Vec::new()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.store_timeout_ms == 0 || self.store_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidStoreTimeout);
        }
        if self.session_buffer == 0 || self.session_buffer > 10_000 {
            return Err(ValidationError::InvalidSessionBuffer);
        }
        Ok(())
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: default_store_timeout(),
            session_buffer: default_session_buffer(),
            seed_file: None,
        }
    }
}

fn default_store_timeout() -> u64 {
    5000
}

fn default_session_buffer() -> usize {
    128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MembershipConfig::default();
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
        assert_eq!(config.session_buffer, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = MembershipConfig {
            store_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStoreTimeout));
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = MembershipConfig {
            session_buffer: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSessionBuffer));
    }

    #[test]
    fn test_no_seed_file_means_no_events() {
        let config = MembershipConfig::default();
        assert!(config.seed_events().unwrap().is_empty());
    }

    #[test]
    fn test_seed_file_is_read() {
        let path =
            std::env::temp_dir().join(format!("rsvp-hub-seed-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"name":"Book club","creatorId":"host","capacity":12}]"#,
        )
        .unwrap();
        let config = MembershipConfig {
            seed_file: Some(path.clone()),
            ..Default::default()
        };

        let seeds = config.seed_events();
        std::fs::remove_file(&path).ok();

        let seeds = seeds.unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].name, "Book club");
    }
}
