use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::app::SharedState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe_ws();

    // Send connection confirmation with the current job snapshot
    let client_id = uuid::Uuid::new_v4().to_string();
    let welcome = serde_json::json!({
        "type": "connected",
        "data": { "clientId": client_id, "job": state.batch().status().without_log() }
    });
    if sender
        .send(Message::Text(welcome.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    // Replies meant only for this client
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(16);

    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(msg) => msg,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "WebSocket client lagging");
                        continue;
                    }
                    Err(_) => break,
                },
                Some(msg) = reply_rx.recv() => msg,
            };
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_message(&text, &state) {
                        let _ = reply_tx.send(reply).await;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Route incoming client messages. Returns a reply for the sender, if any.
fn handle_client_message(text: &str, state: &SharedState) -> Option<String> {
    let msg = serde_json::from_str::<serde_json::Value>(text).ok()?;
    let msg_type = msg.get("type").and_then(|t| t.as_str()).unwrap_or("");

    let reply = match msg_type {
        "ping" => serde_json::json!({ "type": "pong" }),
        "cancel_job" => serde_json::json!({
            "type": "cancel_ack",
            "data": { "cancelled": state.batch().cancel() }
        }),
        "job_status" => serde_json::json!({
            "type": "job_status",
            "data": state.batch().status()
        }),
        _ => {
            tracing::debug!(msg_type, "Ignoring WebSocket message");
            return None;
        }
    };
    Some(reply.to_string())
}
