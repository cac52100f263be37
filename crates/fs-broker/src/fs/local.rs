//! 基于 `tokio::fs` 的本地文件系统实现。

use std::io::ErrorKind;
use std::path::Path;
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::fs;

use super::{DirEntryInfo, FileMeta, Filesystem};
use crate::error::{BrokerError, Result};

/// 单批目录条目数上限。
pub const LIST_BATCH_SIZE: usize = 64;

/// 本地文件系统能力实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

fn map_io(path: &Path, err: std::io::Error) -> BrokerError {
    if err.kind() == ErrorKind::NotFound {
        BrokerError::NotFound(path.display().to_string())
    } else {
        BrokerError::Io(err)
    }
}

#[async_trait]
impl Filesystem for LocalFs {
    async fn metadata(&self, path: &Path) -> Result<FileMeta> {
        let meta = fs::metadata(path).await.map_err(|e| map_io(path, e))?;
        let modified = meta.modified().ok().and_then(|t| {
            t.duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_millis() as i64)
        });

        Ok(FileMeta {
            size: meta.len(),
            modified,
            is_dir: meta.is_dir(),
        })
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).await.map_err(|e| map_io(path, e))
    }

    async fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        fs::write(path, content).await.map_err(|e| map_io(path, e))
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        match fs::create_dir(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                // 已存在的必须是目录，同名文件仍然算失败
                let meta = fs::metadata(path).await.map_err(|e| map_io(path, e))?;
                if meta.is_dir() {
                    Ok(())
                } else {
                    Err(BrokerError::Io(err))
                }
            }
            Err(err) => Err(map_io(path, err)),
        }
    }

    async fn list_batch(&self, path: &Path, offset: usize) -> Result<Vec<DirEntryInfo>> {
        let mut reader = fs::read_dir(path).await.map_err(|e| map_io(path, e))?;
        let mut index = 0usize;
        let mut batch = Vec::new();

        while let Some(entry) = reader.next_entry().await.map_err(|e| map_io(path, e))? {
            if index >= offset {
                let file_type = entry.file_type().await.map_err(|e| map_io(path, e))?;
                batch.push(DirEntryInfo {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: file_type.is_dir(),
                });
                if batch.len() >= LIST_BATCH_SIZE {
                    break;
                }
            }
            index += 1;
        }

        Ok(batch)
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await.map_err(|e| map_io(from, e))
    }
}
