//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresEventStore` - Events with versioned attendee arrays

mod event_store;

pub use event_store::PostgresEventStore;
