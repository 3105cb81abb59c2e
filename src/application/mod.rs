//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Join and leave are commands on the `MembershipRegistry`; reads go through
//! `GetEventHandler`.

pub mod handlers;

pub use handlers::{
    GetEventHandler, GetEventQuery, JoinEventCommand, LeaveEventCommand, MembershipRegistry,
};
