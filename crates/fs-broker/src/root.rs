//! 根句柄与路径解析。

use std::path::{Path, PathBuf};

use crate::error::{BrokerError, Result};
use crate::fs::Filesystem;

/// 根句柄：代理器被授权操作的唯一目录树的能力引用。
///
/// 由外部配置提供，核心只读不改；所有命令路径都相对它解析。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootHandle {
    root: PathBuf,
}

impl RootHandle {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// 将规范相对路径映射到根句柄之下。空串即根目录本身。
    pub fn join(&self, canonical: &str) -> PathBuf {
        if canonical.is_empty() {
            self.root.clone()
        } else {
            self.root.join(canonical)
        }
    }

    /// 解析文件。
    ///
    /// `create=false` 时条目必须已存在，否则返回 `NotFound`；
    /// `create=true` 时由随后的写入按需创建。
    pub async fn resolve_file(
        &self,
        fs: &dyn Filesystem,
        canonical: &str,
        create: bool,
    ) -> Result<PathBuf> {
        let path = self.join(canonical);
        if !create {
            let meta = fs.metadata(&path).await?;
            if meta.is_dir {
                return Err(BrokerError::NotFound(path.display().to_string()));
            }
        }
        Ok(path)
    }

    /// 解析目录。
    ///
    /// `create=true` 为“不存在则创建”，解析已存在的目录不报错；
    /// `create=false` 时目录必须已存在。
    pub async fn resolve_dir(
        &self,
        fs: &dyn Filesystem,
        canonical: &str,
        create: bool,
    ) -> Result<PathBuf> {
        let path = self.join(canonical);
        if create {
            fs.create_dir(&path).await?;
        } else {
            let meta = fs.metadata(&path).await?;
            if !meta.is_dir {
                return Err(BrokerError::NotFound(path.display().to_string()));
            }
        }
        Ok(path)
    }

    /// 从左到右逐段创建目录链。
    ///
    /// 第 N+1 段要等第 N 段完成后才开始。任一段失败立即终止整条
    /// 链，已创建的目录保留，不做回滚。
    pub async fn resolve_dir_chain(&self, fs: &dyn Filesystem, segments: &[&str]) -> Result<()> {
        let mut current = String::new();
        for segment in segments {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            fs.create_dir(&self.join(&current)).await?;
        }
        Ok(())
    }
}
