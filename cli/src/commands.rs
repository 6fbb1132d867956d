use app::prelude::*;
use std::path::PathBuf;
use std::time::Duration;
use storage::{create_store, DropboxEndpoints, StoreOptions, StoreType};
use utils::app_config::AppConfig;
use utils::error::{Error, Result};

/// 根据配置创建远端存储（凭据在此解析，失败即退出）
fn build_store(config: &AppConfig) -> Result<StoreType> {
    let options = StoreOptions {
        local_root: PathBuf::from(&config.store.local_root),
        endpoints: DropboxEndpoints {
            api_base: config.dropbox.api_base.clone(),
            content_base: config.dropbox.content_base.clone(),
            token_url: config.dropbox.token_url.clone(),
        },
        timeout: Duration::from_secs(config.dropbox.timeout_secs),
    };

    log::debug!("Using '{}' store backend", config.store.backend);
    create_store(&config.store.backend, options)
        .map_err(|e| Error::with_source("Failed to create remote store", Box::new(e)))
}

pub async fn sync_cmd(
    source: Option<PathBuf>, destination: Option<String>, no_overwrite: bool,
    create_folders: bool,
) -> Result<()> {
    let config = AppConfig::fetch()?;
    let store = build_store(&config)?;

    let source = source.unwrap_or_else(|| PathBuf::from(&config.sync.source));
    let destination = RemoteKey::new(destination.unwrap_or_else(|| config.sync.destination.clone()));
    let options = SyncOptions {
        overwrite: config.sync.overwrite && !no_overwrite,
        create_folders: config.sync.create_folders || create_folders,
    };

    let report = sync_folder(&store, &source, &destination, &options)
        .await
        .map_err(|e| Error::with_source("Sync failed", Box::new(e)))?;

    println!("Sync completed: {}", report);
    Ok(())
}

pub async fn upload_cmd(local: PathBuf, remote: String, overwrite: bool) -> Result<()> {
    let config = AppConfig::fetch()?;
    let store = build_store(&config)?;

    let key = upload(&store, &local, &RemoteKey::new(remote), overwrite)
        .await
        .map_err(|e| Error::with_source("Upload failed", Box::new(e)))?;

    println!("{}", key);
    Ok(())
}

pub async fn download_cmd(remote: String, local: PathBuf, overwrite: bool) -> Result<()> {
    let config = AppConfig::fetch()?;
    let store = build_store(&config)?;

    let path = download(&store, &RemoteKey::new(remote), &local, overwrite)
        .await
        .map_err(|e| Error::with_source("Download failed", Box::new(e)))?;

    println!("{}", path.display());
    Ok(())
}

pub async fn mkdir_cmd(remote: String) -> Result<()> {
    let config = AppConfig::fetch()?;
    let store = build_store(&config)?;

    create_folder(&store, &RemoteKey::new(remote)).await;
    Ok(())
}
