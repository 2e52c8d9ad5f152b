//! WebSocket support for real-time queue and history updates.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use holliday_core::{HistoryEvent, QueueEvent};

use crate::metrics::{WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_LAG_EVENTS, WS_MESSAGES_SENT};
use crate::state::AppState;

fn queue_event_label(event: &QueueEvent) -> &'static str {
    match event {
        QueueEvent::JobQueued { .. } => "job_queued",
        QueueEvent::JobStarted { .. } => "job_started",
        QueueEvent::JobProgress { .. } => "job_progress",
        QueueEvent::JobCompleted { .. } => "job_completed",
        QueueEvent::JobFailed { .. } => "job_failed",
        QueueEvent::JobRemoved { .. } => "job_removed",
        QueueEvent::QueueCleared => "queue_cleared",
        QueueEvent::RunFinished { .. } => "run_finished",
    }
}

fn history_event_label(event: &HistoryEvent) -> &'static str {
    match event {
        HistoryEvent::Appended { .. } => "history_appended",
        HistoryEvent::Cleared => "history_cleared",
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection, forwarding queue and history
/// events as JSON.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut queue_rx = state.queue().subscribe();
    let mut history_rx = state.history().subscribe();

    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("WebSocket client connected");

    let send_task = tokio::spawn(async move {
        loop {
            let (json, label) = tokio::select! {
                result = queue_rx.recv() => match result {
                    Ok(event) => (to_json(&event), queue_event_label(&event)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("WebSocket client lagged, skipped {} queue events", n);
                        WS_LAG_EVENTS.inc();
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Queue event channel closed");
                        break;
                    }
                },
                result = history_rx.recv() => match result {
                    Ok(event) => (to_json(&event), history_event_label(&event)),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("WebSocket client lagged, skipped {} history events", n);
                        WS_LAG_EVENTS.inc();
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("History event channel closed");
                        break;
                    }
                },
            };

            match json {
                Some(json) => {
                    WS_MESSAGES_SENT.with_label_values(&[label]).inc();
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        debug!("WebSocket send failed, client disconnected");
                        break;
                    }
                }
                None => continue,
            }
        }
    });

    // Handle incoming messages from client (ping/pong, close)
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                debug!("WebSocket client requested close");
                break;
            }
            Ok(Message::Ping(data)) => {
                // Pong is handled automatically by axum
                debug!("Received ping: {:?}", data);
            }
            Ok(Message::Text(text)) => {
                // No client messages are expected, but log them
                debug!("Received text message: {}", text);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    send_task.abort();
    WS_CONNECTIONS_ACTIVE.dec();
    info!("WebSocket client disconnected");
}

fn to_json<T: Serialize>(event: &T) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize event: {}", e);
            None
        }
    }
}
