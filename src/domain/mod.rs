//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, auth, error codes)
//! - `event` - Event attendance, capacity and member update payloads

pub mod event;
pub mod foundation;
