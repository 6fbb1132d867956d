//! Dropbox 凭据解析
//!
//! 两种组合：
//! - `APP_KEY` + `APP_SECRET` + `REFRESH_TOKEN`：短期令牌，自动刷新（优先）
//! - `ACCESS_TOKEN`：长期令牌

use crate::error::{Result, StorageError};
use std::fmt;

pub const APP_KEY_VAR: &str = "APP_KEY";
pub const APP_SECRET_VAR: &str = "APP_SECRET";
pub const REFRESH_TOKEN_VAR: &str = "REFRESH_TOKEN";
pub const ACCESS_TOKEN_VAR: &str = "ACCESS_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Refresh {
        app_key: String,
        app_secret: String,
        refresh_token: String,
    },
    AccessToken(String),
}

impl Credentials {
    /// 从进程环境变量解析凭据
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let (Some(app_key), Some(app_secret), Some(refresh_token)) = (
            get(APP_KEY_VAR),
            get(APP_SECRET_VAR),
            get(REFRESH_TOKEN_VAR),
        ) {
            return Ok(Credentials::Refresh {
                app_key,
                app_secret,
                refresh_token,
            });
        }

        match get(ACCESS_TOKEN_VAR) {
            Some(token) => Ok(Credentials::AccessToken(token)),
            None => Err(StorageError::Configuration(format!(
                "Must set either {} (with {}/{}) or {}",
                REFRESH_TOKEN_VAR, APP_KEY_VAR, APP_SECRET_VAR, ACCESS_TOKEN_VAR
            ))),
        }
    }

    pub fn is_refreshable(&self) -> bool {
        matches!(self, Credentials::Refresh { .. })
    }
}

/// Show a masked version of a secret for logging.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".into();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Refresh {
                app_key,
                refresh_token,
                ..
            } => f
                .debug_struct("Refresh")
                .field("app_key", app_key)
                .field("app_secret", &"****")
                .field("refresh_token", &mask(refresh_token))
                .finish(),
            Credentials::AccessToken(token) => {
                f.debug_tuple("AccessToken").field(&mask(token)).finish()
            }
        }
    }
}
