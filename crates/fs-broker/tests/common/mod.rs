use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use fs_broker::{DirEntryInfo, FileMeta, Filesystem, Result};

/// 记录所有平台调用的文件系统替身。
///
/// 读写全部为空操作，目录列举按预置批次依次返回，用于验证
/// 调用顺序以及“校验失败不触达文件系统”这类性质。
#[derive(Clone, Default)]
pub struct MockFs {
    calls: Arc<Mutex<Vec<String>>>,
    batches: Arc<Mutex<VecDeque<Vec<DirEntryInfo>>>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置 `list_batch` 的分批返回序列，耗尽后返回空批。
    pub fn with_batches(batches: Vec<Vec<DirEntryInfo>>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            batches: Arc::new(Mutex::new(batches.into())),
        }
    }

    /// 已记录的平台调用，按发生顺序。
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .clone()
    }

    fn record(&self, op: &str, path: &Path) {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(format!("{op} {}", path.display()));
    }
}

#[async_trait]
impl Filesystem for MockFs {
    async fn metadata(&self, path: &Path) -> Result<FileMeta> {
        self.record("metadata", path);
        Ok(FileMeta {
            size: 0,
            modified: None,
            is_dir: true,
        })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.record("read", path);
        Ok(Vec::new())
    }

    async fn write(&self, path: &Path, _content: &[u8]) -> Result<()> {
        self.record("write", path);
        Ok(())
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        self.record("create_dir", path);
        Ok(())
    }

    async fn list_batch(&self, path: &Path, _offset: usize) -> Result<Vec<DirEntryInfo>> {
        self.record("list_batch", path);
        Ok(self
            .batches
            .lock()
            .expect("batches lock should not be poisoned")
            .pop_front()
            .unwrap_or_default())
    }

    async fn rename(&self, from: &Path, _to: &Path) -> Result<()> {
        self.record("rename", from);
        Ok(())
    }
}
