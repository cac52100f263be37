//! 统一的应用状态。

use std::sync::Arc;

use fs_broker::Broker;

/// 统一的应用状态，所有连接共享。
pub struct AppState {
    /// 文件系统命令代理器。
    pub broker: Arc<Broker>,
    /// 调用方白名单；空表允许所有调用方。
    pub allowed_senders: Vec<String>,
}

impl AppState {
    /// 创建新的应用状态。
    pub fn new(broker: Arc<Broker>, allowed_senders: Vec<String>) -> Self {
        Self {
            broker,
            allowed_senders,
        }
    }

    /// 判断调用方是否允许接入。
    pub fn is_allowed(&self, sender: &str) -> bool {
        self.allowed_senders.is_empty() || self.allowed_senders.iter().any(|id| id == sender)
    }
}
