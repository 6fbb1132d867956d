use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

const SEPARATOR: char = '/';

/// 远端对象路径，始终使用 `/` 分隔
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemoteKey(String);

impl RemoteKey {
    /// Backslashes are normalized to `/`.
    pub fn new(key: impl Into<String>) -> Self {
        let key: String = key.into();
        RemoteKey(key.replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.trim_matches(SEPARATOR).is_empty()
    }

    /// 将本地相对路径拼接到当前key之后
    ///
    /// Only normal components of `relative` are used, so the result never
    /// depends on the host path separator: `/dest` + `sub\b.txt` on Windows and
    /// `/dest` + `sub/b.txt` elsewhere both give `/dest/sub/b.txt`.
    pub fn join(&self, relative: &Path) -> RemoteKey {
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            return self.clone();
        }

        let base = self.0.trim_end_matches(SEPARATOR);
        RemoteKey(format!("{}{}{}", base, SEPARATOR, parts.join("/")))
    }

    /// Non-empty path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RemoteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RemoteKey {
    fn from(key: &str) -> Self {
        RemoteKey::new(key)
    }
}

impl From<String> for RemoteKey {
    fn from(key: String) -> Self {
        RemoteKey::new(key)
    }
}
