//! Per-event member update channel names.
//!
//! The name `event:{eventId}:memberUpdate` is a logical contract shared by
//! clients and every transport (in-process bus, Redis relay).

use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EventId, ValidationError};

const PREFIX: &str = "event:";
const SUFFIX: &str = ":memberUpdate";

/// Pattern matching every member update channel, for transports with
/// glob-style subscriptions.
pub const MEMBER_UPDATE_PATTERN: &str = "event:*:memberUpdate";

/// Channel carrying attendance changes of a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberChannel(EventId);

impl MemberChannel {
    pub fn for_event(event_id: EventId) -> Self {
        Self(event_id)
    }

    pub fn event_id(&self) -> EventId {
        self.0
    }
}

impl fmt::Display for MemberChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", PREFIX, self.0, SUFFIX)
    }
}

impl FromStr for MemberChannel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .strip_prefix(PREFIX)
            .and_then(|rest| rest.strip_suffix(SUFFIX))
            .ok_or_else(|| {
                ValidationError::invalid_format("channel", "expected event:{id}:memberUpdate")
            })?;
        let event_id = id
            .parse::<EventId>()
            .map_err(|e| ValidationError::invalid_format("channel", e.to_string()))?;
        Ok(Self(event_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_contract_name() {
        let id = EventId::new();
        assert_eq!(
            MemberChannel::for_event(id).to_string(),
            format!("event:{}:memberUpdate", id)
        );
    }

    #[test]
    fn parses_its_own_rendering() {
        let channel = MemberChannel::for_event(EventId::new());
        let parsed: MemberChannel = channel.to_string().parse().unwrap();
        assert_eq!(parsed, channel);
    }

    #[test]
    fn rejects_foreign_channels() {
        assert!("event:abc:memberUpdate".parse::<MemberChannel>().is_err());
        assert!("chat:room".parse::<MemberChannel>().is_err());
        assert!(MEMBER_UPDATE_PATTERN.parse::<MemberChannel>().is_err());
    }
}
