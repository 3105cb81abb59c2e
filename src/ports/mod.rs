//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `EventStore` - Event reads and conditional attendee writes
//! - `MemberUpdatePublisher` - Fire-and-forget hand-off to the Change Bus
//! - `SessionValidator` - Caller identity from a presented token

mod event_store;
mod member_update_publisher;
mod session_validator;

pub use event_store::{EventStore, EventStoreError};
pub use member_update_publisher::MemberUpdatePublisher;
pub use session_validator::SessionValidator;
