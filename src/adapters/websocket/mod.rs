//! WebSocket adapters: the Change Bus and live sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     MembershipRegistry                               │
//! │   join / leave commit ──▶ MemberUpdatePublisher::publish            │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                     ChangeBus (single node) or
//!                     RedisChangeRelay ──▶ ChangeBus on every node
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         ChangeBus                                    │
//! │   event:E1:memberUpdate   event:E2:memberUpdate                     │
//! │   ├── client-a            ├── client-a                              │
//! │   └── client-b            └── client-c                              │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼ per-session queue
//!                         WebSocket session (handler)
//! ```
//!
//! # Components
//!
//! - [`change_bus`] - Subscription table and fan-out
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod change_bus;
pub mod handler;
pub mod messages;

pub use change_bus::{BusError, ChangeBus, ClientId, DEFAULT_SESSION_BUFFER};
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ServerMessage};
