//! 单文件传输：下载、上传、创建目录
//!
//! Every function performs at most one store call and never retries.

use std::path::{Path, PathBuf};
use storage::{RemoteKey, RemoteStore, Result, StorageError, WriteMode};

/// Result of a single upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded { bytes: u64 },
    /// `WriteMode::Add` hit an existing object, which was left untouched.
    Skipped,
}

/// 下载远端对象到本地路径
///
/// With `overwrite == false` an existing local file is returned as-is and the
/// store is not contacted; staleness is not checked. The write is not atomic,
/// a failure midway leaves a partial file.
pub async fn download(
    store: &dyn RemoteStore, key: &RemoteKey, local_path: &Path, overwrite: bool,
) -> Result<PathBuf> {
    if !overwrite && tokio::fs::try_exists(local_path).await? {
        log::debug!("'{}' exists, skipping download", local_path.display());
        return Ok(local_path.to_path_buf());
    }

    if let Some(parent) = local_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let data = store.download(key).await?;
    tokio::fs::write(local_path, &data).await?;

    log::info!("Downloaded '{}' to '{}'", key, local_path.display());
    Ok(local_path.to_path_buf())
}

/// 上传本地文件，返回远端key
pub async fn upload(
    store: &dyn RemoteStore, local_path: &Path, key: &RemoteKey, overwrite: bool,
) -> Result<RemoteKey> {
    put_file(store, local_path, key, WriteMode::from_overwrite(overwrite)).await?;
    Ok(key.clone())
}

/// Same as [`upload`], kept for callers using the older name.
pub async fn upload_file(
    store: &dyn RemoteStore, local_path: &Path, key: &RemoteKey, overwrite: bool,
) -> Result<RemoteKey> {
    upload(store, local_path, key, overwrite).await
}

/// Reads the whole file and writes it with a single store call.
pub async fn put_file(
    store: &dyn RemoteStore, local_path: &Path, key: &RemoteKey, mode: WriteMode,
) -> Result<UploadOutcome> {
    let data = tokio::fs::read(local_path).await?;

    match store.upload(key, &data, mode).await {
        Ok(()) => {
            log::info!("Uploaded '{}' to '{}'", local_path.display(), key);
            Ok(UploadOutcome::Uploaded {
                bytes: data.len() as u64,
            })
        }
        Err(StorageError::Conflict(_)) if mode == WriteMode::Add => {
            log::info!("'{}' already exists, skipped '{}'", key, local_path.display());
            Ok(UploadOutcome::Skipped)
        }
        Err(e) => Err(e),
    }
}

/// 创建远端目录（尽力而为）
///
/// Any failure, "already exists" included, is discarded.
pub async fn create_folder(store: &dyn RemoteStore, key: &RemoteKey) {
    match store.create_folder(key).await {
        Ok(()) => log::debug!("Created folder '{}'", key),
        Err(e) => log::debug!("Ignoring create_folder failure for '{}': {}", key, e),
    }
}
