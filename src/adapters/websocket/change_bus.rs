//! Change Bus - per-event channel fan-out to live sessions.
//!
//! Each connected session owns one bounded outbound queue. Subscriptions map
//! an event's member channel to the sessions listening on it:
//!
//! ```text
//! event:E1:memberUpdate    event:E2:memberUpdate
//! ├── client-a             ├── client-a
//! └── client-b             └── client-c
//! ```
//!
//! A publish for E1 lands in the queues of a and b only. Delivery is
//! at-most-once: a full queue drops the update, a closed queue is pruned,
//! and nothing is kept for sessions that subscribe later.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::event::{MemberChannel, MemberUpdate};
use crate::domain::foundation::EventId;
use crate::ports::MemberUpdatePublisher;

/// Default per-session outbound queue length.
pub const DEFAULT_SESSION_BUFFER: usize = 128;

/// Unique identifier for a live session.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription table failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("session {0} is not connected")]
    NotConnected(ClientId),

    #[error("change bus is shut down")]
    ShutDown,
}

struct Session {
    outbound: mpsc::Sender<MemberUpdate>,
    channels: HashSet<EventId>,
}

#[derive(Default)]
struct Table {
    sessions: HashMap<ClientId, Session>,
    channels: HashMap<EventId, HashSet<ClientId>>,
    shut_down: bool,
}

impl Table {
    fn remove_session(&mut self, client_id: &ClientId) -> Option<Session> {
        let session = self.sessions.remove(client_id)?;
        for event_id in &session.channels {
            self.detach(event_id, client_id);
        }
        Some(session)
    }

    fn detach(&mut self, event_id: &EventId, client_id: &ClientId) -> bool {
        let Some(members) = self.channels.get_mut(event_id) else {
            return false;
        };
        let removed = members.remove(client_id);
        if members.is_empty() {
            self.channels.remove(event_id);
        }
        removed
    }
}

/// The subscription table plus fan-out.
///
/// Constructed once at startup and shared by `Arc` with the registry and the
/// socket layer.
///
/// # Thread Safety
///
/// A single `RwLock` guards the table. Publishes take the read lock and
/// only `try_send`, so no await point ever runs under the lock.
pub struct ChangeBus {
    table: RwLock<Table>,
    session_buffer: usize,
}

impl ChangeBus {
    pub fn new(session_buffer: usize) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            session_buffer: session_buffer.max(1),
        }
    }

    /// Registers a session and returns the receiving end of its queue.
    pub fn connect(&self, client_id: ClientId) -> Result<mpsc::Receiver<MemberUpdate>, BusError> {
        let (outbound, inbound) = mpsc::channel(self.session_buffer);
        let mut table = self.write();
        if table.shut_down {
            return Err(BusError::ShutDown);
        }
        table.remove_session(&client_id);
        table.sessions.insert(
            client_id,
            Session {
                outbound,
                channels: HashSet::new(),
            },
        );
        tracing::debug!(client_id = %client_id, "Session connected to change bus");
        Ok(inbound)
    }

    /// Adds `client_id` to `channel`. Subscribing twice is harmless.
    pub fn subscribe(&self, client_id: &ClientId, channel: &MemberChannel) -> Result<(), BusError> {
        let mut table = self.write();
        if table.shut_down {
            return Err(BusError::ShutDown);
        }
        let event_id = channel.event_id();
        let session = table
            .sessions
            .get_mut(client_id)
            .ok_or(BusError::NotConnected(*client_id))?;
        session.channels.insert(event_id);
        table.channels.entry(event_id).or_default().insert(*client_id);

        tracing::debug!(client_id = %client_id, channel = %channel, "Subscribed");
        Ok(())
    }

    /// Removes `client_id` from `channel`. Returns whether it was subscribed.
    pub fn unsubscribe(&self, client_id: &ClientId, channel: &MemberChannel) -> bool {
        let mut table = self.write();
        let event_id = channel.event_id();
        if let Some(session) = table.sessions.get_mut(client_id) {
            session.channels.remove(&event_id);
        }
        let removed = table.detach(&event_id, client_id);
        if removed {
            tracing::debug!(client_id = %client_id, channel = %channel, "Unsubscribed");
        }
        removed
    }

    /// Drops a session and every subscription it held.
    pub fn disconnect(&self, client_id: &ClientId) {
        if let Some(session) = self.write().remove_session(client_id) {
            tracing::debug!(
                client_id = %client_id,
                channels = session.channels.len(),
                "Session disconnected from change bus"
            );
        }
    }

    /// Pushes `update` to every session on its channel without waiting.
    ///
    /// Returns how many session queues accepted it.
    pub fn fan_out(&self, update: &MemberUpdate) -> usize {
        let channel = update.channel();
        let event_id = channel.event_id();
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let table = self.read();
            let Some(members) = table.channels.get(&event_id) else {
                tracing::trace!(channel = %channel, "Publish with no subscribers");
                return 0;
            };
            for client_id in members {
                let Some(session) = table.sessions.get(client_id) else {
                    continue;
                };
                match session.outbound.try_send(update.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(
                            client_id = %client_id,
                            channel = %channel,
                            "Session queue full, dropping member update"
                        );
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*client_id),
                }
            }
        }

        if !closed.is_empty() {
            let mut table = self.write();
            for client_id in &closed {
                table.remove_session(client_id);
            }
            tracing::debug!(pruned = closed.len(), "Pruned closed sessions");
        }

        delivered
    }

    /// Disconnects every session. Later connects and subscribes fail.
    pub fn shutdown(&self) {
        let mut table = self.write();
        let sessions = table.sessions.len();
        table.sessions.clear();
        table.channels.clear();
        table.shut_down = true;
        tracing::info!(sessions, "Change bus shut down");
    }

    /// Sessions currently subscribed to `channel`.
    pub fn subscriber_count(&self, channel: &MemberChannel) -> usize {
        self.read()
            .channels
            .get(&channel.event_id())
            .map(HashSet::len)
            .unwrap_or(0)
    }

    /// Channels with at least one subscriber.
    pub fn active_channels(&self) -> Vec<MemberChannel> {
        self.read()
            .channels
            .keys()
            .map(|id| MemberChannel::for_event(*id))
            .collect()
    }

    /// Connected sessions, subscribed or not.
    pub fn session_count(&self) -> usize {
        self.read().sessions.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_BUFFER)
    }
}

impl MemberUpdatePublisher for ChangeBus {
    fn publish(&self, update: MemberUpdate) {
        let delivered = self.fan_out(&update);
        tracing::debug!(channel = %update.channel(), delivered, "Member update published");
    }
}
