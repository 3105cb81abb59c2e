//! WebSocket upgrade handler for live member updates.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Register the session on the Change Bus
//! 3. Apply subscribe/unsubscribe requests and forward channel deliveries
//! 4. Drop every subscription on disconnect

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::application::{GetEventHandler, GetEventQuery};
use crate::domain::event::MemberChannel;

use super::{
    change_bus::{ChangeBus, ClientId},
    messages::{ChannelAck, ClientMessage, ServerMessage},
};

/// Direct replies queued per session (acks, pongs, state answers).
const REPLY_BUFFER: usize = 32;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub bus: Arc<ChangeBus>,
    pub events: Arc<GetEventHandler>,
}

impl WebSocketState {
    pub fn new(bus: Arc<ChangeBus>, events: Arc<GetEventHandler>) -> Self {
        Self { bus, events }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /api/live`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = ClientId::new();

    let mut updates = match state.bus.connect(client_id) {
        Ok(rx) => rx,
        Err(e) => {
            tracing::debug!(client_id = %client_id, "Refusing session: {}", e);
            let _ = send_message(&mut sender, &ServerMessage::error("UNAVAILABLE", e.to_string()))
                .await;
            return;
        }
    };

    if let Err(e) = send_message(&mut sender, &ServerMessage::connected(client_id)).await {
        tracing::debug!(client_id = %client_id, "Failed to send connected message: {}", e);
        state.bus.disconnect(&client_id);
        return;
    }

    let (reply_tx, mut replies) = mpsc::channel::<ServerMessage>(REPLY_BUFFER);

    // Forward channel deliveries and direct replies to the client
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                update = updates.recv() => match update {
                    Some(update) => ServerMessage::from(update),
                    None => break,
                },
                reply = replies.recv() => match reply {
                    Some(reply) => reply,
                    None => break,
                },
            };
            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Handle incoming messages from client
    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    let reply = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => dispatch(&recv_state, client_id, msg).await,
                        Err(e) => {
                            tracing::debug!(client_id = %client_id, "Unparseable client message: {}", e);
                            ServerMessage::error("INVALID_MESSAGE", e.to_string())
                        }
                    };
                    if reply_tx.send(reply).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(client_id = %client_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!(client_id = %client_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.bus.disconnect(&client_id);
    tracing::debug!(client_id = %client_id, "Session closed");
}

/// Applies one client message and returns the direct reply.
async fn dispatch(state: &WebSocketState, client_id: ClientId, msg: ClientMessage) -> ServerMessage {
    match msg {
        ClientMessage::Subscribe { event_id } => {
            let channel = MemberChannel::for_event(event_id);
            match state.bus.subscribe(&client_id, &channel) {
                Ok(()) => ServerMessage::Subscribed(ChannelAck {
                    channel: channel.to_string(),
                }),
                Err(e) => ServerMessage::error("SUBSCRIBE_FAILED", e.to_string()),
            }
        }
        ClientMessage::Unsubscribe { event_id } => {
            let channel = MemberChannel::for_event(event_id);
            state.bus.unsubscribe(&client_id, &channel);
            ServerMessage::Unsubscribed(ChannelAck {
                channel: channel.to_string(),
            })
        }
        ClientMessage::RequestState { event_id } => {
            match state.events.handle(GetEventQuery { event_id }).await {
                Ok(event) => ServerMessage::event_state(event),
                Err(err) => ServerMessage::from(&err),
            }
        }
        ClientMessage::Ping => {
            tracing::trace!(client_id = %client_id, "Received ping");
            ServerMessage::pong()
        }
    }
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/live", get(ws_handler))
}
