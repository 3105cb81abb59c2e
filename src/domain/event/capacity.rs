//! Capacity value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Maximum simultaneous attendees an event may hold. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Upper bound accepted from storage or clients.
    pub const MAX: u32 = 1_000_000;

    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 || value > Self::MAX {
            return Err(ValidationError::out_of_range(
                "capacity",
                1,
                i64::from(Self::MAX),
                i64::from(value),
            ));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// True when `count` attendees leave no open seat.
    pub fn is_exhausted_by(&self, count: usize) -> bool {
        count >= self.0 as usize
    }
}

impl TryFrom<u32> for Capacity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Capacity> for u32 {
    fn from(capacity: Capacity) -> Self {
        capacity.0
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
