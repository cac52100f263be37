use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::path;
use crate::root::RootHandle;

type Result<T> = anyhow::Result<T>;

/// 持久化配置：根目录授权、主目录路径与调用方白名单。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// 被授权的根目录。未授权时文件系统命令全部拒绝。
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// 主目录路径，仅逻辑路径转换使用，可以为空。
    #[serde(default)]
    pub home_path: String,
    /// 允许调用代理器的外部调用方标识；空表允许所有调用方。
    #[serde(default)]
    pub allowed_senders: Vec<String>,
    /// 服务监听地址。
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl BrokerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize broker config")
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8737".to_string()
}

/// 进程级配置存储，对核心提供 get/set 语义。
///
/// 核心每条命令读取一次快照，从不通过命令路径修改配置；
/// 重新授权只经由 `set_root`/`set_home_path`。
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<BrokerConfig>,
    file: Option<PathBuf>,
}

impl ConfigStore {
    /// 用内存配置创建存储，不落盘。
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            inner: RwLock::new(config),
            file: None,
        }
    }

    /// 从 TOML 文件装载，之后的变更写回同一文件。
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = BrokerConfig::from_file(path)?;

        info!(path = %path.display(), "broker config loaded");
        Ok(Self {
            inner: RwLock::new(config),
            file: Some(path.to_path_buf()),
        })
    }

    /// 读取根句柄与主目录路径，主目录返回内部绝对形式。
    pub async fn get_root(&self) -> (Option<RootHandle>, String) {
        let config = self.inner.read().await;
        let root = config.root.clone().map(RootHandle::new);
        let home = path::to_internal_absolute(&config.home_path);
        (root, home)
    }

    /// 重新授权根目录。
    pub async fn set_root(&self, root: PathBuf) -> Result<()> {
        info!(root = %root.display(), "granting root directory");
        {
            let mut config = self.inner.write().await;
            config.root = Some(root);
        }
        self.persist().await
    }

    /// 设置主目录路径：反斜杠转正斜杠，非空时保证以斜杠结尾。
    pub async fn set_home_path(&self, home: &str) -> Result<()> {
        let mut normalized = home.replace('\\', "/");
        if !normalized.is_empty() && !normalized.ends_with('/') {
            normalized.push('/');
        }

        info!(home = %normalized, "setting home path");
        {
            let mut config = self.inner.write().await;
            config.home_path = normalized;
        }
        self.persist().await
    }

    /// 当前调用方白名单。
    pub async fn allowed_senders(&self) -> Vec<String> {
        self.inner.read().await.allowed_senders.clone()
    }

    /// 当前监听地址。
    pub async fn listen_addr(&self) -> String {
        self.inner.read().await.listen_addr.clone()
    }

    async fn persist(&self) -> Result<()> {
        let Some(file) = &self.file else {
            return Ok(());
        };

        let serialized = {
            let config = self.inner.read().await;
            toml::to_string_pretty(&*config).context("failed to serialize broker config")?
        };
        tokio::fs::write(file, serialized)
            .await
            .with_context(|| format!("failed to write config file: {}", file.display()))
    }
}
