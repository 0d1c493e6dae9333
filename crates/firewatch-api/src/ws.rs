//! `WebSocket` handler for real-time escalation streaming.
//!
//! Clients connect to `GET /ws/escalations` and receive a JSON-encoded
//! [`EscalationEvent`] each time a refresh cycle raises a zone's level.
//! If a client falls behind, lagged messages are skipped and the client
//! resumes from the most recent event.
//!
//! [`EscalationEvent`]: firewatch_types::EscalationEvent

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use firewatch_core::{RouteCatalogSource, ZoneReadingSource};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming escalation events.
///
/// # Route
///
/// `GET /ws/escalations`
pub async fn ws_escalations<S, C>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<S, C>>>,
) -> impl IntoResponse
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource + 'static,
{
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Subscribe to the escalation stream and forward each event as a text
/// frame until either side closes.
async fn handle_ws<S, C>(mut socket: WebSocket, state: Arc<AppState<S, C>>)
where
    S: ZoneReadingSource,
    C: RouteCatalogSource,
{
    debug!("WebSocket client connected");

    let mut rx = state.scheduler.subscribe();

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize escalation event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("WebSocket client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        debug!(skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Escalation stream closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        return;
                    }
                    // Client text and binary frames are ignored.
                    _ => {}
                }
            }
        }
    }
}
