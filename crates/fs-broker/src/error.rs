use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("缺少必填字段: {0}")]
    MissingField(&'static str),

    #[error("路径不存在: {0}")]
    NotFound(String),

    #[error("未知编码: {0}")]
    UnsupportedEncoding(String),

    #[error("不是绝对路径: {0}")]
    NotAbsolute(String),

    #[error("未配置主目录路径")]
    MissingHomePath,

    #[error("未授权根目录")]
    MissingRoot,

    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("获取内容失败: {0}")]
    Fetch(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML 错误: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP 错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BrokerError>;
