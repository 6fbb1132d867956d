use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// 没有可用的凭据组合，启动阶段即失败
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// 仅在 WriteMode::Add / 创建已存在的目录时出现
    #[error("Remote path already exists: {0}")]
    Conflict(String),

    #[error("Remote path not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {summary}")]
    Api { status: u16, summary: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
