//! 平台文件系统抽象层。
//!
//! 该模块定义了统一的 `Filesystem` 接口，解析器与命令执行器只
//! 依赖这些原语，便于在测试中用记录型替身替换真实文件系统。

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod local;
pub use local::LocalFs;

/// 文件/目录元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    /// 大小（字节）。
    pub size: u64,
    /// 修改时间（Unix 毫秒时间戳）。
    pub modified: Option<i64>,
    /// 是否为目录。
    pub is_dir: bool,
}

/// 目录列举返回的单个条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// 平台文件系统能力接口。
///
/// 所有操作都是异步的，一条命令挂起时其他命令可以交错执行。
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// 查询条目元数据；条目不存在返回 `NotFound`。
    async fn metadata(&self, path: &Path) -> Result<FileMeta>;

    /// 读取整个文件内容。
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// 写入完整内容，覆盖语义：文件被截断为恰好写入的长度。
    async fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// 创建目录，“不存在则创建”：目录已存在时视为成功。
    async fn create_dir(&self, path: &Path) -> Result<()>;

    /// 从 `offset` 开始返回一批目录条目。
    ///
    /// 平台按批次返回列举结果，空批次表示列举完成，调用方需要
    /// 循环取批直到为空。
    async fn list_batch(&self, path: &Path, offset: usize) -> Result<Vec<DirEntryInfo>>;

    /// 移动/重命名，单次平台操作。
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}
