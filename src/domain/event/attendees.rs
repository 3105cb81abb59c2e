//! Attendee list value object.
//!
//! Membership semantics are those of a set. Insertion order is kept only so
//! clients can render attendees in the order they joined.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};

/// Duplicate-free, insertion-ordered list of attending users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UserId>", into = "Vec<UserId>")]
pub struct Attendees(Vec<UserId>);

impl Attendees {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds from stored ids, rejecting duplicates.
    pub fn from_ids(ids: Vec<UserId>) -> Result<Self, ValidationError> {
        let mut seen = std::collections::HashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id) {
                return Err(ValidationError::invalid_format(
                    "attendees",
                    format!("duplicate attendee {}", id),
                ));
            }
        }
        Ok(Self(ids))
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.0.iter().any(|id| id == user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }

    /// Returns a copy with `user_id` appended, or `None` if already present.
    pub fn with(&self, user_id: &UserId) -> Option<Self> {
        if self.contains(user_id) {
            return None;
        }
        let mut next = self.0.clone();
        next.push(user_id.clone());
        Some(Self(next))
    }

    /// Returns a copy without `user_id`. Absent ids leave the list unchanged.
    pub fn without(&self, user_id: &UserId) -> Self {
        Self(self.0.iter().filter(|id| *id != user_id).cloned().collect())
    }

    pub fn as_slice(&self) -> &[UserId] {
        &self.0
    }
}

impl TryFrom<Vec<UserId>> for Attendees {
    type Error = ValidationError;

    fn try_from(ids: Vec<UserId>) -> Result<Self, Self::Error> {
        Self::from_ids(ids)
    }
}

impl From<Attendees> for Vec<UserId> {
    fn from(attendees: Attendees) -> Self {
        attendees.0
    }
}
