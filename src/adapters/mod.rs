//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process event store (development, tests)
//! - `postgres` - sqlx event store with compare-and-swap updates
//! - `websocket` - Change Bus and live client sessions
//! - `redis` - Cross-node relay for member updates
//! - `auth` - Session token validators
//! - `http` - axum routes, DTOs and middleware

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod websocket;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;
pub use websocket::ChangeBus;
