//! Dropbox API v2 backend.
//!
//! Uploads and downloads go through the content endpoints with the
//! `Dropbox-API-Arg` header; folder creation is a plain RPC call. Requests
//! are never retried, every failure is returned to the caller.

use crate::credentials::{mask, Credentials};
use crate::error::{Result, StorageError};
use crate::key::RemoteKey;
use crate::{RemoteStore, WriteMode};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;

pub const API_BASE: &str = "https://api.dropboxapi.com/2";
pub const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";
pub const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

const API_ARG_HEADER: &str = "Dropbox-API-Arg";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// 令牌在到期前这么多秒就视为过期
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropboxEndpoints {
    pub api_base: String,
    pub content_base: String,
    pub token_url: String,
}

impl Default for DropboxEndpoints {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            content_base: CONTENT_BASE.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => at - ChronoDuration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => true,
        }
    }
}

/// Dropbox 存储实现
pub struct DropboxStore {
    http: reqwest::Client,
    credentials: Credentials,
    endpoints: DropboxEndpoints,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for DropboxStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxStore")
            .field("endpoints", &self.endpoints)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl DropboxStore {
    /// Client against the public Dropbox endpoints.
    pub fn connect(credentials: Credentials) -> Result<Self> {
        Self::new(
            credentials,
            DropboxEndpoints::default(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn new(
        credentials: Credentials, endpoints: DropboxEndpoints, timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        log::debug!(
            "Dropbox client ready ({})",
            if credentials.is_refreshable() {
                "refresh token"
            } else {
                "access token"
            }
        );

        Ok(Self {
            http,
            credentials,
            endpoints,
            token: Mutex::new(None),
        })
    }

    pub fn endpoints(&self) -> &DropboxEndpoints {
        &self.endpoints
    }

    /// 获取可用的访问令牌，必要时通过refresh token换取新令牌
    async fn access_token(&self) -> Result<String> {
        let (app_key, app_secret, refresh_token) = match &self.credentials {
            Credentials::AccessToken(token) => return Ok(token.clone()),
            Credentials::Refresh {
                app_key,
                app_secret,
                refresh_token,
            } => (app_key, app_secret, refresh_token),
        };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        log::debug!("Refreshing Dropbox access token ({})", mask(refresh_token));
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", app_key.as_str()),
            ("client_secret", app_secret.as_str()),
        ];

        let resp = self
            .http
            .post(&self.endpoints.token_url)
            .form(&params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StorageError::Auth(format!(
                "Token refresh rejected ({status}): {body}"
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)?;
        let token = CachedToken {
            value: parsed.access_token,
            expires_at: parsed
                .expires_in
                .map(|secs| Utc::now() + ChronoDuration::seconds(secs)),
        };
        let value = token.value.clone();
        *cached = Some(token);

        Ok(value)
    }
}

#[async_trait::async_trait]
impl RemoteStore for DropboxStore {
    async fn download(&self, key: &RemoteKey) -> Result<Vec<u8>> {
        let url = format!("{}/files/download", self.endpoints.content_base);
        let arg = header_safe_json(&serde_json::json!({ "path": api_path(key) }))?;
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(API_ARG_HEADER, arg)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_api_error(status, key, &body));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    async fn upload(&self, key: &RemoteKey, data: &[u8], mode: WriteMode) -> Result<()> {
        let url = format!("{}/files/upload", self.endpoints.content_base);
        let arg = header_safe_json(&upload_arg(key, mode))?;
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(API_ARG_HEADER, arg)
            .body(data.to_vec())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_api_error(status, key, &body));
        }

        Ok(())
    }

    async fn create_folder(&self, key: &RemoteKey) -> Result<()> {
        let url = format!("{}/files/create_folder_v2", self.endpoints.api_base);
        let token = self.access_token().await?;

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "path": api_path(key), "autorename": false }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(map_api_error(status, key, &body));
        }

        Ok(())
    }
}

/// Dropbox 路径：根目录为空串，其余必须以 `/` 开头
pub fn api_path(key: &RemoteKey) -> String {
    if key.is_root() {
        return String::new();
    }
    let key = key.as_str().trim_end_matches('/');
    if key.starts_with('/') {
        key.to_string()
    } else {
        format!("/{}", key)
    }
}

pub fn upload_arg(key: &RemoteKey, mode: WriteMode) -> serde_json::Value {
    serde_json::json!({
        "path": api_path(key),
        "mode": mode.as_str(),
        "autorename": false,
        "mute": false,
    })
}

/// Serialize JSON for an HTTP header.
///
/// Header values must be ASCII, so every non-ASCII character (and DEL) is
/// written as a `\uXXXX` escape, using surrogate pairs outside the BMP.
pub fn header_safe_json(value: &serde_json::Value) -> Result<String> {
    let raw = serde_json::to_string(value)?;
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut buf = [0u16; 2];
            for unit in c.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(out)
}

/// 将Dropbox错误响应映射为StorageError
pub fn map_api_error(status: StatusCode, key: &RemoteKey, body: &str) -> StorageError {
    let summary = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| e.error_summary)
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => StorageError::Auth(summary),
        StatusCode::CONFLICT if summary.contains("conflict") => {
            StorageError::Conflict(key.to_string())
        }
        StatusCode::CONFLICT if summary.contains("not_found") => {
            StorageError::NotFound(key.to_string())
        }
        _ => StorageError::Api {
            status: status.as_u16(),
            summary,
        },
    }
}
