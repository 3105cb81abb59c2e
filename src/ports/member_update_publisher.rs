//! MemberUpdatePublisher port - hands attendance changes to the Change Bus.
//!
//! The registry only ever publishes; subscription bookkeeping lives with the
//! session transport.

use crate::domain::event::MemberUpdate;

/// Port for publishing member updates on `event:{id}:memberUpdate`.
///
/// Implementations must:
/// - Return without waiting on any subscriber or network round trip
/// - Absorb and log delivery failures; nothing is reported back
/// - Deliver at most once, with no buffering for later subscribers
pub trait MemberUpdatePublisher: Send + Sync {
    fn publish(&self, update: MemberUpdate);
}
