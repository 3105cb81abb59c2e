//! WebSocket message types for live member updates.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: connection status, subscription acks, member updates,
//!   event state, errors, pongs
//! - Client → Server: subscribe, unsubscribe, state requests, pings

use serde::{Deserialize, Serialize};

use crate::domain::event::{AttendanceChange, Event, MemberUpdate, MembershipError};
use crate::domain::foundation::{EventId, Timestamp};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established successfully.
    Connected(ConnectedMessage),

    /// Subscription to a member channel is active.
    Subscribed(ChannelAck),

    /// Subscription removed (or was never there).
    Unsubscribed(ChannelAck),

    /// Attendee list changed.
    MemberUpdate(MemberUpdateMessage),

    /// Answer to `request.state`.
    #[serde(rename = "event.state")]
    EventState(EventStateMessage),

    /// Error occurred.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when a client connects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub client_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelAck {
    pub channel: String,
}

/// A `event:{id}:memberUpdate` delivery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdateMessage {
    pub channel: String,
    pub event: Event,
    pub change: AttendanceChange,
    pub timestamp: String,
}

/// Current event document, read directly from the store.
#[derive(Debug, Clone, Serialize)]
pub struct EventStateMessage {
    pub event: Event,
    pub timestamp: String,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl ServerMessage {
    pub fn connected(client_id: impl ToString) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            client_id: client_id.to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn event_state(event: Event) -> Self {
        ServerMessage::EventState(EventStateMessage {
            event,
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.into(),
            message: message.into(),
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: Timestamp::now().to_rfc3339(),
        })
    }
}

impl From<MemberUpdate> for ServerMessage {
    fn from(update: MemberUpdate) -> Self {
        ServerMessage::MemberUpdate(MemberUpdateMessage {
            channel: update.channel().to_string(),
            timestamp: update.occurred_at.to_rfc3339(),
            event: update.event,
            change: update.change,
        })
    }
}

impl From<&MembershipError> for ServerMessage {
    fn from(err: &MembershipError) -> Self {
        ServerMessage::error(err.code().to_string(), err.message())
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving `event:{eventId}:memberUpdate`.
    #[serde(rename_all = "camelCase")]
    Subscribe { event_id: EventId },

    /// Stop receiving it.
    #[serde(rename_all = "camelCase")]
    Unsubscribe { event_id: EventId },

    /// Fetch the current document (after subscribing or reconnecting).
    #[serde(rename = "request.state", rename_all = "camelCase")]
    RequestState { event_id: EventId },

    /// Heartbeat request.
    Ping,
}
