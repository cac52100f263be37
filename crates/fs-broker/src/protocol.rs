//! 命令与响应的线上形状。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BrokerError, Result};

/// 调用方发送的命令对象。
///
/// 字段缺失在反序列化阶段不报错，由各执行器统一做
/// “存在且非空”校验，这样缺字段能得到命令级的错误响应。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    /// 读取文件内容与元数据。
    Read {
        #[serde(default)]
        path: Option<String>,
        /// `"arraybuffer"` 时返回原始字节，否则按 `encoding` 解码为文本。
        #[serde(rename = "type", default)]
        content_type: Option<String>,
        #[serde(default)]
        encoding: Option<String>,
    },
    /// 写入文件（覆盖语义）。
    Write {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        content: Option<String>,
        /// `"url"` 时 `content` 视为待抓取的数据引用，按二进制写入。
        #[serde(rename = "type", default)]
        content_type: Option<String>,
        #[serde(default)]
        encoding: Option<String>,
    },
    /// 写入文件，缺失的父目录逐级创建。
    Writep {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        content: Option<String>,
        #[serde(rename = "type", default)]
        content_type: Option<String>,
        #[serde(default)]
        encoding: Option<String>,
    },
    /// 列出目录全部条目。
    Ls {
        #[serde(default)]
        path: Option<String>,
    },
    /// 移动/重命名文件。
    Mv {
        #[serde(default)]
        from: Option<String>,
        #[serde(default)]
        to: Option<String>,
    },
    /// 将本地绝对路径转换为主目录相对的逻辑路径。
    #[serde(rename = "toLogicalPath")]
    ToLogicalPath {
        #[serde(default)]
        path: Option<String>,
    },
}

impl Command {
    /// 从原始 JSON 值解析命令。
    ///
    /// 命令名不在枚举内时返回 `UnknownCommand`，不会触达任何执行器。
    pub fn from_value(value: Value) -> Result<Self> {
        let name = value
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "read" | "write" | "writep" | "ls" | "mv" | "toLogicalPath" => {
                serde_json::from_value(value).map_err(BrokerError::Json)
            }
            _ => Err(BrokerError::UnknownCommand(name)),
        }
    }
}

/// 命令执行结果。
///
/// 每条命令恰好产生一个响应：成功负载或 `{error}`，二者取其一。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    File(FilePayload),
    Written(WritePayload),
    Listing(ListingPayload),
    Moved(MovePayload),
    Logical(LogicalPathPayload),
    Error { error: String },
}

impl Response {
    /// 由错误生成 `{error}` 响应。
    pub fn from_error(err: &BrokerError) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}

/// `read` 命令响应负载。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePayload {
    pub path: String,
    pub name: String,
    pub content: FileContent,
    #[serde(rename = "lastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// 文件内容：解码后的文本或原始字节。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// `write`/`writep` 命令响应负载，`bytes` 为实际写入长度。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritePayload {
    pub path: String,
    pub name: String,
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
    pub bytes: u64,
}

/// `ls` 命令响应负载。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPayload {
    pub path: String,
    pub name: String,
    pub entries: Vec<Entry>,
}

/// 目录条目的固定记录形状。
///
/// `bytes`/`lastModified`/`created` 在列目录时刻意不填充，
/// 元数据只在直接读取文件时获取。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub bytes: u64,
    pub path: String,
    pub is_dir: bool,
    pub is_deleted: bool,
    pub id: Option<String>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<i64>,
    pub created: Option<i64>,
    pub mime_type: String,
}

impl Entry {
    /// 列目录条目统一的 MIME 占位值。
    pub const DEFAULT_MIME: &'static str = "application/octet-stream";
}

/// `mv` 命令响应负载。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovePayload {
    pub to: String,
}

/// `toLogicalPath` 命令响应负载。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalPathPayload {
    #[serde(rename = "logicalPath")]
    pub logical_path: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_read_command() {
        let command = Command::from_value(json!({
            "command": "read",
            "path": "/notes/today.md",
            "encoding": "shift_jis",
        }))
        .expect("read command should parse");

        match command {
            Command::Read {
                path,
                content_type,
                encoding,
            } => {
                assert_eq!(path.as_deref(), Some("/notes/today.md"));
                assert!(content_type.is_none());
                assert_eq!(encoding.as_deref(), Some("shift_jis"));
            }
            other => panic!("expected Read, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_to_logical_path_command() {
        let command = Command::from_value(json!({
            "command": "toLogicalPath",
            "path": "C:\\Users\\u\\pics\\a.jpg",
        }))
        .expect("toLogicalPath command should parse");

        assert!(matches!(command, Command::ToLogicalPath { .. }));
    }

    #[test]
    fn test_missing_fields_still_parse() {
        let command =
            Command::from_value(json!({"command": "mv"})).expect("mv without fields should parse");

        match command {
            Command::Mv { from, to } => {
                assert!(from.is_none());
                assert!(to.is_none());
            }
            other => panic!("expected Mv, got: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = Command::from_value(json!({"command": "rm", "path": "/x"}))
            .expect_err("unknown command should be rejected");

        match err {
            BrokerError::UnknownCommand(name) => assert_eq!(name, "rm"),
            other => panic!("expected UnknownCommand, got: {other:?}"),
        }
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::Error {
            error: "Forbidden".to_string(),
        };
        let value = serde_json::to_value(&response).expect("response should serialize");

        assert_eq!(value, json!({"error": "Forbidden"}));
    }

    #[test]
    fn test_entry_serializes_fixed_shape() {
        let entry = Entry {
            name: "a.txt".to_string(),
            bytes: 0,
            path: "/docs/a.txt".to_string(),
            is_dir: false,
            is_deleted: false,
            id: None,
            last_modified: None,
            created: None,
            mime_type: Entry::DEFAULT_MIME.to_string(),
        };
        let value = serde_json::to_value(&entry).expect("entry should serialize");

        assert_eq!(
            value,
            json!({
                "name": "a.txt",
                "bytes": 0,
                "path": "/docs/a.txt",
                "is_dir": false,
                "is_deleted": false,
                "id": null,
                "lastModified": null,
                "created": null,
                "mime_type": "application/octet-stream",
            })
        );
    }
}
