//! 同步模块 - 将本地目录树镜像上传到远端路径

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use storage::RemoteKey;

mod sync;


pub use sync::sync_folder;

/// 同步选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    /// false 时远端已存在的对象保持不变，对应文件计为跳过
    pub overwrite: bool,
    /// 上传前为遍历到的每个目录调用 create_folder
    pub create_folders: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            create_folders: false,
        }
    }
}

/// 一次文件传输：本地文件 -> 远端key，遍历时生成、立即消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
    pub local: PathBuf,
    pub key: RemoteKey,
}

/// 同步结果统计，仅在成功时返回
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub uploaded: u64,
    pub skipped: u64,
    pub folders: u64,
    pub symlinks_skipped: u64,
    pub bytes: u64,
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} uploaded ({} bytes), {} skipped, {} folders, {} symlinks ignored",
            self.uploaded, self.bytes, self.skipped, self.folders, self.symlinks_skipped
        )
    }
}
