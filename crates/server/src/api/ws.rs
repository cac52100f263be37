//! WebSocket 命令通道。
//!
//! 每个文本帧是一条命令对象，处理后恰好回写一帧响应。命令之间
//! 互相独立，允许交错执行，因此响应顺序不保证与请求顺序一致。

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use fs_broker::Response;

use super::state::AppState;

/// Axum WebSocket 升级 handler，升级前完成调用方白名单检查。
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let sender = headers
        .get(ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let allowed = state.is_allowed(&sender);

    info!(sender = %sender, allowed, "new WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state, allowed))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, allowed: bool) {
    let (mut sender, mut receiver) = socket.split();

    // 白名单之外的调用方只收到一帧 Forbidden，连接随即关闭
    if !allowed {
        let forbidden = serde_json::json!({"error": "Forbidden"}).to_string();
        let _ = sender.send(Message::Text(forbidden.into())).await;
        return;
    }

    let (out_tx, mut out_rx) = mpsc::channel::<Response>(64);

    let writer_task = tokio::spawn(async move {
        while let Some(response) = out_rx.recv().await {
            match serde_json::to_string(&response) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    error!(error = %err, "failed to serialize WebSocket response");
                    break;
                }
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(raw) => {
                    let broker = state.broker.clone();
                    let response_tx = out_tx.clone();
                    tokio::spawn(async move {
                        let response = broker.handle(raw).await;
                        let _ = response_tx.send(response).await;
                    });
                }
                Err(err) => {
                    let response = Response::Error {
                        error: format!("invalid message: {err}"),
                    };
                    if out_tx.send(response).await.is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "WebSocket receive error");
                break;
            }
        }
    }

    drop(out_tx);
    if let Err(err) = writer_task.await {
        warn!(error = %err, "WebSocket writer task exited with join error");
    }

    info!("WebSocket connection closed");
}
