//! 命令分发与执行。
//!
//! 每条命令独立走一遍 校验 -> 解析 -> 执行 -> 响应 的流水线，
//! 根句柄与主目录路径每条命令从配置存储读取一次并以参数传入，
//! 不经过任何进程级可变状态。所有失败在 `handle` 边界收敛为
//! `{error}` 响应，绝不向通道外抛出。

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ConfigStore;
use crate::error::{BrokerError, Result};
use crate::fetch;
use crate::fs::{Filesystem, LocalFs};
use crate::path;
use crate::protocol::{
    Command, Entry, FileContent, FilePayload, ListingPayload, LogicalPathPayload, MovePayload,
    Response, WritePayload,
};
use crate::root::RootHandle;

/// 文件系统命令代理器。
pub struct Broker {
    config: Arc<ConfigStore>,
    fs: Arc<dyn Filesystem>,
}

impl Broker {
    /// 用本地文件系统创建代理器。
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self::with_filesystem(config, Arc::new(LocalFs))
    }

    /// 注入自定义文件系统实现。
    pub fn with_filesystem(config: Arc<ConfigStore>, fs: Arc<dyn Filesystem>) -> Self {
        Self { config, fs }
    }

    /// 处理一条命令，恰好产生一个响应。
    pub async fn handle(&self, raw: Value) -> Response {
        match self.dispatch(raw).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "command failed");
                Response::from_error(&err)
            }
        }
    }

    async fn dispatch(&self, raw: Value) -> Result<Response> {
        let command = Command::from_value(raw)?;
        let (root, home_path) = self.config.get_root().await;

        match command {
            Command::Read {
                path,
                content_type,
                encoding,
            } => {
                self.read(&require_root(root)?, path, content_type, encoding)
                    .await
            }
            Command::Write {
                path,
                content,
                content_type,
                encoding,
            } => {
                self.write(&require_root(root)?, path, content, content_type, encoding)
                    .await
            }
            Command::Writep {
                path,
                content,
                content_type,
                encoding,
            } => {
                self.writep(&require_root(root)?, path, content, content_type, encoding)
                    .await
            }
            Command::Ls { path } => self.ls(&require_root(root)?, path).await,
            Command::Mv { from, to } => self.mv(&require_root(root)?, from, to).await,
            Command::ToLogicalPath { path } => to_logical_path(&home_path, path),
        }
    }

    async fn read(
        &self,
        root: &RootHandle,
        path: Option<String>,
        content_type: Option<String>,
        encoding: Option<String>,
    ) -> Result<Response> {
        let raw = require(path, "path")?;
        // arraybuffer 之外的读取在触达文件前先确定解码器
        let decoder = if content_type.as_deref() == Some("arraybuffer") {
            None
        } else {
            Some(resolve_encoding(encoding.as_deref())?)
        };

        let canonical = path::normalize(&raw);
        info!(path = %canonical, "reading file");

        let file = root.resolve_file(self.fs.as_ref(), &canonical, false).await?;
        let bytes = self.fs.read(&file).await?;
        let meta = self.fs.metadata(&file).await?;

        let content = match decoder {
            Some(encoding) => {
                let (text, _, _) = encoding.decode(&bytes);
                FileContent::Text(text.into_owned())
            }
            None => FileContent::Bytes(bytes),
        };

        Ok(Response::File(FilePayload {
            path: path::to_logical(&canonical),
            name: path::basename(&canonical).to_string(),
            content,
            last_modified: meta.modified,
            bytes: Some(meta.size),
        }))
    }

    async fn write(
        &self,
        root: &RootHandle,
        path: Option<String>,
        content: Option<String>,
        content_type: Option<String>,
        encoding: Option<String>,
    ) -> Result<Response> {
        let raw = require(path, "path")?;
        let content = require(content, "content")?;

        let payload = match content_type.as_deref() {
            Some("url") => fetch::fetch_content(&content).await?,
            _ => {
                let encoding = resolve_encoding(encoding.as_deref())?;
                let (bytes, _, _) = encoding.encode(&content);
                bytes.into_owned()
            }
        };

        let canonical = path::normalize(&raw);
        info!(path = %canonical, bytes = payload.len(), "writing file");

        let file = root.resolve_file(self.fs.as_ref(), &canonical, true).await?;
        self.fs.write(&file, &payload).await?;

        Ok(Response::Written(WritePayload {
            path: path::to_logical(&canonical),
            name: path::basename(&canonical).to_string(),
            last_modified: Utc::now().timestamp_millis(),
            bytes: payload.len() as u64,
        }))
    }

    async fn writep(
        &self,
        root: &RootHandle,
        path: Option<String>,
        content: Option<String>,
        content_type: Option<String>,
        encoding: Option<String>,
    ) -> Result<Response> {
        let raw = require(path.clone(), "path")?;
        require(content.clone(), "content")?;

        let canonical = path::normalize(&raw);
        let segments: Vec<&str> = canonical.split('/').collect();
        let (parents, _) = segments.split_at(segments.len() - 1);

        info!(path = %canonical, parents = parents.len(), "writing file with parents");
        root.resolve_dir_chain(self.fs.as_ref(), parents).await?;
        self.write(root, path, content, content_type, encoding).await
    }

    async fn ls(&self, root: &RootHandle, path: Option<String>) -> Result<Response> {
        let raw = require(path, "path")?;
        let canonical = path::normalize(&raw);
        let dir = root.resolve_dir(self.fs.as_ref(), &canonical, false).await?;

        // 平台按批次返回条目，循环取批直到空批为止
        let mut collected = Vec::new();
        loop {
            let batch = self.fs.list_batch(&dir, collected.len()).await?;
            if batch.is_empty() {
                break;
            }
            collected.extend(batch);
        }

        collected.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });

        let logical_dir = path::to_logical(&canonical);
        info!(path = %logical_dir, entries = collected.len(), "directory listed");

        let entries = collected
            .into_iter()
            .map(|entry| Entry {
                path: path::join_logical(&logical_dir, &entry.name),
                name: entry.name,
                bytes: 0,
                is_dir: entry.is_dir,
                is_deleted: false,
                id: None,
                last_modified: None,
                created: None,
                mime_type: Entry::DEFAULT_MIME.to_string(),
            })
            .collect();

        Ok(Response::Listing(ListingPayload {
            path: logical_dir,
            name: path::basename(&canonical).to_string(),
            entries,
        }))
    }

    async fn mv(
        &self,
        root: &RootHandle,
        from: Option<String>,
        to: Option<String>,
    ) -> Result<Response> {
        let from = require(from, "from")?;
        let to = require(to, "to")?;

        let from_canonical = path::normalize(&from);
        let (to_dir, to_name) = path::split_destination(&from_canonical, &path::normalize(&to));

        info!(from = %from_canonical, to_dir = %to_dir, to_name = %to_name, "moving file");

        let source = root
            .resolve_file(self.fs.as_ref(), &from_canonical, false)
            .await?;
        let dest_dir = root
            .resolve_dir(self.fs.as_ref(), to_dir.trim_end_matches('/'), false)
            .await?;
        self.fs.rename(&source, &dest_dir.join(&to_name)).await?;

        Ok(Response::Moved(MovePayload {
            to: format!("{to_dir}{to_name}"),
        }))
    }
}

fn require(field: Option<String>, name: &'static str) -> Result<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(BrokerError::MissingField(name)),
    }
}

fn require_root(root: Option<RootHandle>) -> Result<RootHandle> {
    root.ok_or(BrokerError::MissingRoot)
}

fn resolve_encoding(label: Option<&str>) -> Result<&'static encoding_rs::Encoding> {
    let label = label.unwrap_or("UTF-8");
    encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| BrokerError::UnsupportedEncoding(label.to_string()))
}

fn to_logical_path(home_path: &str, path: Option<String>) -> Result<Response> {
    let raw = require(path, "path")?;
    if home_path.is_empty() {
        return Err(BrokerError::MissingHomePath);
    }

    let absolute = path::to_internal_absolute(&raw);
    if !path::is_internal_absolute(&absolute) {
        return Err(BrokerError::NotAbsolute(absolute));
    }

    let logical = match absolute.strip_prefix(home_path) {
        Some(rest) => format!("/{rest}"),
        None => absolute,
    };

    Ok(Response::Logical(LogicalPathPayload {
        logical_path: logical,
    }))
}
