//! API 路由模块。
//!
//! 对外只暴露一条命令通道：WebSocket 上的 JSON 命令对象。

pub mod state;
pub mod ws;

pub use state::AppState;
pub use ws::websocket_handler;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

/// 创建命令通道路由。
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/fs", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
