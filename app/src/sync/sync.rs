use std::io;
use std::path::Path;
use storage::{RemoteKey, RemoteStore, Result, StorageError, WriteMode};
use walkdir::WalkDir;

use super::{SyncOptions, SyncReport, TransferTask};
use crate::transfer::{self, UploadOutcome};

/// 主同步函数 - 入口点
///
/// Walks `local_root` and uploads every regular file to `remote_root` joined
/// with its relative path. Traversal order is whatever the filesystem yields.
/// Symbolic links are not followed and not uploaded.
///
/// The first error aborts the walk and is returned unchanged. Files uploaded
/// before it stay uploaded.
pub async fn sync_folder(
    store: &dyn RemoteStore, local_root: &Path, remote_root: &RemoteKey, options: &SyncOptions,
) -> Result<SyncReport> {
    let metadata = tokio::fs::metadata(local_root).await?;
    if !metadata.is_dir() {
        return Err(StorageError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' is not a directory", local_root.display()),
        )));
    }

    log::info!(
        "Starting sync of '{}' to '{}' with options: {:?}",
        local_root.display(),
        remote_root,
        options
    );

    let mode = WriteMode::from_overwrite(options.overwrite);
    let mut report = SyncReport::default();

    for entry in WalkDir::new(local_root).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            log::debug!("Skipping symlink '{}'", entry.path().display());
            report.symlinks_skipped += 1;
            continue;
        }

        let relative = entry.path().strip_prefix(local_root).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("'{}' is outside the sync root", entry.path().display()),
            )
        })?;
        let key = remote_root.join(relative);

        if file_type.is_dir() {
            if options.create_folders {
                transfer::create_folder(store, &key).await;
                report.folders += 1;
            }
            continue;
        }

        // sockets, fifos, devices
        if !file_type.is_file() {
            continue;
        }

        let task = TransferTask {
            local: entry.into_path(),
            key,
        };

        match transfer::put_file(store, &task.local, &task.key, mode).await? {
            UploadOutcome::Uploaded { bytes } => {
                report.uploaded += 1;
                report.bytes += bytes;
            }
            UploadOutcome::Skipped => report.skipped += 1,
        }
    }

    log::info!("Sync completed: {}", report);
    Ok(report)
}
