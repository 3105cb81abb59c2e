//! Redis pub/sub relay for member updates across nodes.
//!
//! ```text
//! node A registry ──publish──▶ RedisChangeRelay ──PUBLISH event:{id}:memberUpdate──┐
//!                                                                                   ▼
//!                                                                            Redis server
//!                                                                                   │
//! node A ChangeBus ◀──fan_out── listener ◀──PSUBSCRIBE event:*:memberUpdate─────────┤
//! node B ChangeBus ◀──fan_out── listener ◀──────────────────────────────────────────┘
//! ```
//!
//! Every node, including the publisher, hears the update once through its
//! listener, so local sessions are never served twice. Delivery stays
//! at-most-once: messages published while a listener reconnects are lost.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::adapters::websocket::ChangeBus;
use crate::domain::event::{MemberChannel, MemberUpdate, MEMBER_UPDATE_PATTERN};
use crate::ports::MemberUpdatePublisher;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("undecodable member update: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("channel {channel} does not carry member updates")]
    UnknownChannel { channel: String },

    #[error("update for {payload_event} arrived on {channel}")]
    ChannelMismatch {
        channel: String,
        payload_event: String,
    },
}

/// Publishes member updates to Redis instead of the local bus.
#[derive(Clone)]
pub struct RedisChangeRelay {
    conn: MultiplexedConnection,
}

impl RedisChangeRelay {
    pub async fn connect(client: &redis::Client) -> Result<Self, RelayError> {
        let conn = client.get_multiplexed_tokio_connection().await?;
        Ok(Self { conn })
    }
}

impl MemberUpdatePublisher for RedisChangeRelay {
    fn publish(&self, update: MemberUpdate) {
        let channel = update.channel().to_string();
        let payload = match serde_json::to_string(&update) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(channel = %channel, "Failed to encode member update: {}", e);
                return;
            }
        };

        let mut conn = self.conn.clone();
        tokio::spawn(async move {
            let result: Result<i64, redis::RedisError> = conn.publish(&channel, payload).await;
            match result {
                Ok(receivers) => {
                    tracing::debug!(channel = %channel, receivers, "Member update relayed");
                }
                Err(e) => {
                    tracing::warn!(channel = %channel, "Failed to relay member update: {}", e);
                }
            }
        });
    }
}

/// Parses a relayed message and checks it belongs to the channel it came on.
pub fn decode_update(channel: &str, payload: &str) -> Result<MemberUpdate, RelayError> {
    let member_channel: MemberChannel =
        channel
            .parse()
            .map_err(|_| RelayError::UnknownChannel {
                channel: channel.to_string(),
            })?;
    let update: MemberUpdate = serde_json::from_str(payload)?;
    if update.event_id() != member_channel.event_id() {
        return Err(RelayError::ChannelMismatch {
            channel: channel.to_string(),
            payload_event: update.event_id().to_string(),
        });
    }
    Ok(update)
}

/// Feeds every relayed update into the local bus until the task is aborted.
pub fn spawn_listener(
    client: redis::Client,
    bus: Arc<ChangeBus>,
    reconnect_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match listen(&client, &bus).await {
                Ok(()) => tracing::warn!("Relay subscription ended, reconnecting"),
                Err(e) => tracing::warn!("Relay listener failed: {}", e),
            }
            tokio::time::sleep(reconnect_delay).await;
        }
    })
}

async fn listen(client: &redis::Client, bus: &ChangeBus) -> Result<(), RelayError> {
    let mut pubsub = client.get_async_connection().await?.into_pubsub();
    pubsub.psubscribe(MEMBER_UPDATE_PATTERN).await?;
    tracing::info!(pattern = MEMBER_UPDATE_PATTERN, "Relay listener subscribed");

    let mut messages = pubsub.on_message();
    while let Some(msg) = messages.next().await {
        let channel = msg.get_channel_name().to_string();
        let payload: String = match msg.get_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(channel = %channel, "Unreadable relay payload: {}", e);
                continue;
            }
        };
        match decode_update(&channel, &payload) {
            Ok(update) => {
                bus.fan_out(&update);
            }
            Err(e) => tracing::warn!(channel = %channel, "Dropping relayed message: {}", e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{Capacity, Event};
    use crate::domain::foundation::{EventId, UserId};

    fn update() -> MemberUpdate {
        let event = Event::new(
            EventId::new(),
            "Workshop",
            UserId::new("host").unwrap(),
            Capacity::new(5).unwrap(),
        );
        MemberUpdate::joined(event, UserId::new("guest").unwrap())
    }

    #[test]
    fn decodes_update_on_its_channel() {
        let update = update();
        let payload = serde_json::to_string(&update).unwrap();

        let decoded = decode_update(&update.channel().to_string(), &payload).unwrap();

        assert_eq!(decoded, update);
    }

    #[test]
    fn rejects_update_on_foreign_channel() {
        let update = update();
        let payload = serde_json::to_string(&update).unwrap();
        let other = MemberChannel::for_event(EventId::new()).to_string();

        assert!(matches!(
            decode_update(&other, &payload),
            Err(RelayError::ChannelMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unrelated_channel_names() {
        let payload = serde_json::to_string(&update()).unwrap();
        assert!(matches!(
            decode_update("chat:lobby", &payload),
            Err(RelayError::UnknownChannel { .. })
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        let channel = MemberChannel::for_event(EventId::new()).to_string();
        assert!(matches!(
            decode_update(&channel, "{not json"),
            Err(RelayError::Decode(_))
        ));
    }
}
