//! Redis adapters.
//!
//! - `RedisChangeRelay` - Publishes member updates on Redis pub/sub
//! - `spawn_listener` - Pattern-subscribes and feeds the local Change Bus

mod relay;

pub use relay::{decode_update, spawn_listener, RedisChangeRelay, RelayError};
