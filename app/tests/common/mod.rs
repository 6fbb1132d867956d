use std::collections::BTreeMap;
use std::sync::Mutex;
use storage::{RemoteKey, RemoteStore, Result, StorageError, WriteMode};

/// 记录到的存储调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Download(String),
    Upload(String, WriteMode),
    CreateFolder(String),
}

/// 内存中的远端存储，记录所有调用
///
/// `Add` uploads onto an existing key are rejected with `Conflict`, the same
/// way the real service refuses them.
#[derive(Default)]
pub struct MockStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Call>>,
    /// 1-based index of the upload call that fails with a transport error
    fail_upload_at: Option<usize>,
    fail_folders: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload_at(n: usize) -> Self {
        Self {
            fail_upload_at: Some(n),
            ..Default::default()
        }
    }

    pub fn failing_folders() -> Self {
        Self {
            fail_folders: true,
            ..Default::default()
        }
    }

    pub fn with_object(self, key: &str, data: &[u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        self
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Upload(key, _) => Some(key),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl RemoteStore for MockStore {
    async fn download(&self, key: &RemoteKey) -> Result<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Download(key.to_string()));
        self.object(key.as_str())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn upload(&self, key: &RemoteKey, data: &[u8], mode: WriteMode) -> Result<()> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Upload(key.to_string(), mode));
            calls
                .iter()
                .filter(|c| matches!(c, Call::Upload(..)))
                .count()
        };

        if self.fail_upload_at == Some(attempt) {
            return Err(StorageError::Transport(format!("connection reset on {}", key)));
        }

        let mut objects = self.objects.lock().unwrap();
        if mode == WriteMode::Add && objects.contains_key(key.as_str()) {
            return Err(StorageError::Conflict(key.to_string()));
        }
        objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn create_folder(&self, key: &RemoteKey) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::CreateFolder(key.to_string()));
        if self.fail_folders {
            return Err(StorageError::Auth("expired_access_token/".into()));
        }
        let mut objects = self.objects.lock().unwrap();
        let marker = format!("{}/", key);
        if objects.contains_key(&marker) {
            return Err(StorageError::Conflict(key.to_string()));
        }
        objects.insert(marker, Vec::new());
        Ok(())
    }
}
