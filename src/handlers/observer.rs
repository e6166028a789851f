//! Observer WebSocket handler.
//!
//! The observer receives mirrored control events from the voice session. It
//! may connect before or after the call is negotiated, and the bridge works
//! without it.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Mirrored events queued per observer before being dropped.
const OBSERVER_CHANNEL_CAPACITY: usize = 256;

/// `GET /ws` — upgrade to the observer connection.
pub async fn observer_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_observer_socket(socket, state))
}

async fn handle_observer_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("observer connected");

    let (mut sender, mut receiver) = socket.split();
    let (mirror_tx, mut mirror_rx) = mpsc::channel::<String>(OBSERVER_CHANNEL_CAPACITY);
    state.observer.attach(mirror_tx);

    // Writer drains mirrored events to the socket
    let writer = tokio::spawn(async move {
        while let Some(event) = mirror_rx.recv().await {
            if sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound messages are only logged; the observer has no control surface
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                debug!("observer message: {text}");
            }
            Ok(Message::Close(_)) => {
                info!("observer closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("observer read failed: {e}");
                break;
            }
        }
    }

    state.observer.detach();
    writer.abort();
    info!("observer disconnected");
}
