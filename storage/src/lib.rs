pub mod credentials;
pub mod dropbox;
pub mod error;
pub mod file;
pub mod key;

pub use credentials::*;
pub use dropbox::{DropboxEndpoints, DropboxStore};
pub use error::{Result, StorageError};
pub use file::*;
pub use key::RemoteKey;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 上传写入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// 覆盖已存在的对象
    Overwrite,
    /// 仅新增；目标已存在时返回 Conflict，且不修改原对象
    Add,
}

impl WriteMode {
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Add
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Add => "add",
        }
    }
}

/// 远端存储能力
///
/// Every call completes (or fails) before returning; implementations must not
/// retry on their own.
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    async fn download(&self, key: &RemoteKey) -> Result<Vec<u8>>;
    async fn upload(&self, key: &RemoteKey, data: &[u8], mode: WriteMode) -> Result<()>;
    async fn create_folder(&self, key: &RemoteKey) -> Result<()>;
}

/// 存储类型枚举
#[derive(Debug)]
pub enum StoreType {
    Dropbox(DropboxStore),
    Local(LocalStore),
}

/// Options for [`create_store`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub local_root: PathBuf,
    pub endpoints: DropboxEndpoints,
    pub timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            local_root: PathBuf::from("./remote"),
            endpoints: DropboxEndpoints::default(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// 根据后端名称创建存储实例
///
/// The Dropbox backend resolves its credentials from the environment here, so
/// a missing credential set fails before any transfer starts.
pub fn create_store(backend: &str, options: StoreOptions) -> Result<StoreType> {
    match backend.trim().to_ascii_lowercase().as_str() {
        "dropbox" => {
            let credentials = Credentials::from_env()?;
            let store = DropboxStore::new(credentials, options.endpoints, options.timeout)?;
            Ok(StoreType::Dropbox(store))
        }
        "local" => Ok(StoreType::Local(LocalStore::new(options.local_root))),
        other => Err(StorageError::Configuration(format!(
            "Unknown store backend '{}', expected 'dropbox' or 'local'",
            other
        ))),
    }
}

// 为StoreType实现统一的接口
#[async_trait::async_trait]
impl RemoteStore for StoreType {
    async fn download(&self, key: &RemoteKey) -> Result<Vec<u8>> {
        match self {
            StoreType::Dropbox(store) => store.download(key).await,
            StoreType::Local(store) => store.download(key).await,
        }
    }

    async fn upload(&self, key: &RemoteKey, data: &[u8], mode: WriteMode) -> Result<()> {
        match self {
            StoreType::Dropbox(store) => store.upload(key, data, mode).await,
            StoreType::Local(store) => store.upload(key, data, mode).await,
        }
    }

    async fn create_folder(&self, key: &RemoteKey) -> Result<()> {
        match self {
            StoreType::Dropbox(store) => store.create_folder(key).await,
            StoreType::Local(store) => store.create_folder(key).await,
        }
    }
}
