use std::io;
use std::path::PathBuf;
use tokio::fs as tokio_fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Result, StorageError};
use crate::key::RemoteKey;
use crate::{RemoteStore, WriteMode};

/// Local storage implementation: keys are mapped below a root directory
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create new local storage instance
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get full path for a key
    ///
    /// `..` segments are rejected so a key can never escape the root.
    pub fn full_path(&self, key: &RemoteKey) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.segments() {
            match segment {
                "." => continue,
                ".." => {
                    return Err(StorageError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Key escapes store root: {}", key),
                    )))
                }
                s => path.push(s),
            }
        }
        Ok(path)
    }

    /// Check if path exists asynchronously
    pub async fn exists(&self, key: &RemoteKey) -> Result<bool> {
        let path = self.full_path(key)?;
        Ok(tokio_fs::try_exists(&path).await?)
    }
}

#[async_trait::async_trait]
impl RemoteStore for LocalStore {
    async fn download(&self, key: &RemoteKey) -> Result<Vec<u8>> {
        let path = self.full_path(key)?;
        match tokio_fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn upload(&self, key: &RemoteKey, data: &[u8], mode: WriteMode) -> Result<()> {
        let path = self.full_path(key)?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !tokio_fs::try_exists(parent).await? {
                tokio_fs::create_dir_all(parent).await?;
            }
        }

        let mut options = tokio_fs::OpenOptions::new();
        options.write(true);
        match mode {
            WriteMode::Overwrite => options.create(true).truncate(true),
            WriteMode::Add => options.create_new(true),
        };

        let mut file = match options.open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StorageError::Conflict(key.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(data).await?;
        file.flush().await?;

        Ok(())
    }

    async fn create_folder(&self, key: &RemoteKey) -> Result<()> {
        let path = self.full_path(key)?;
        if tokio_fs::try_exists(&path).await? {
            return Err(StorageError::Conflict(key.to_string()));
        }
        tokio_fs::create_dir_all(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn full_path_maps_segments() {
        let store = LocalStore::new("/srv/remote");
        let path = store.full_path(&RemoteKey::new("/dest/sub/b.txt")).unwrap();
        assert_eq!(path, PathBuf::from("/srv/remote/dest/sub/b.txt"));
    }

    #[test]
    fn full_path_rejects_parent_segments() {
        let store = LocalStore::new("/srv/remote");
        assert!(store.full_path(&RemoteKey::new("/dest/../../etc")).is_err());
    }

    #[tokio::test]
    async fn upload_then_download() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path());
        let key = RemoteKey::new("/dest/sub/b.txt");

        store.upload(&key, b"hello", WriteMode::Overwrite).await.unwrap();

        assert!(temp.path().join("dest/sub/b.txt").is_file());
        assert_eq!(store.download(&key).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn add_mode_refuses_existing() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path());
        let key = RemoteKey::new("/a.txt");

        store.upload(&key, b"first", WriteMode::Add).await.unwrap();
        let err = store.upload(&key, b"second", WriteMode::Add).await.unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(store.download(&key).await.unwrap(), b"first");

        store.upload(&key, b"third", WriteMode::Overwrite).await.unwrap();
        assert_eq!(store.download(&key).await.unwrap(), b"third");
    }

    #[tokio::test]
    async fn download_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path());
        let err = store.download(&RemoteKey::new("/nope")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref k) if k == "/nope"));
    }

    #[tokio::test]
    async fn create_folder_twice_conflicts() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path());
        let key = RemoteKey::new("/dest/empty");

        store.create_folder(&key).await.unwrap();
        assert!(store.exists(&key).await.unwrap());
        assert!(matches!(
            store.create_folder(&key).await,
            Err(StorageError::Conflict(_))
        ));
    }
}
