//! In-memory adapters.
//!
//! - `InMemoryEventStore` - Event store for single-node runs and tests

mod event_store;

pub use event_store::InMemoryEventStore;
