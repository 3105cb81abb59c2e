//! RSVP Hub - Event attendance with live member updates
//!
//! Users join and leave capacity-limited events; every committed change is
//! pushed to the WebSocket sessions watching that event.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
