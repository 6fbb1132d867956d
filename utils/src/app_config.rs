use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::Path;
use std::sync::RwLock;

use super::error::{Error, Result};

// BUILDER static variable. Every layer (embedded defaults, env, files,
// overrides) is added to it; values are resolved on read.
lazy_static! {
    pub static ref BUILDER: RwLock<ConfigBuilder<DefaultState>> = RwLock::new(Config::builder());
}

/// Environment variables with this prefix override configuration keys,
/// e.g. `DROPSYNC_LOG__LEVEL=debug`.
pub const ENV_PREFIX: &str = "DROPSYNC";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    pub level: String,
    pub max_size: u64,
    pub max_backups: u8,
}

/// 默认同步任务：源目录与远端目标路径
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    pub source: String,
    pub destination: String,
    pub overwrite: bool,
    pub create_folders: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// "dropbox" or "local"
    pub backend: String,
    /// Root directory used by the local backend
    pub local_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DropboxConfig {
    pub api_base: String,
    pub content_base: String,
    pub token_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub log: LogConfig,
    pub sync: SyncConfig,
    pub store: StoreConfig,
    pub dropbox: DropboxConfig,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> Error {
    Error::new("Configuration lock poisoned")
}

impl AppConfig {
    /// Initialize AppConfig.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        // Embed file into executable
        // This macro will embed the configuration file into the
        // executable. Check include_str! for more info.
        if let Some(config_contents) = default_config {
            builder = builder.add_source(config::File::from_str(
                config_contents,
                config::FileFormat::Toml,
            ));
        }

        // Merge settings with env variables
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        // Save Config to RwLoc
        {
            let mut w = BUILDER.write().map_err(poisoned)?;
            *w = builder;
        }

        Ok(())
    }

    /// Apply the global command line switches on top of the loaded configuration.
    pub fn merge_args(args: &clap::ArgMatches) -> Result<()> {
        if let Ok(Some(level)) = args.try_get_one::<String>("log_level") {
            AppConfig::set("log.level", level)?;
        }

        Ok(())
    }

    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        // Merge settings with config file if there is one
        if let Some(config_file_path) = config_file {
            let mut w = BUILDER.write().map_err(poisoned)?;
            *w = w
                .clone()
                .add_source(config::File::from(config_file_path.to_path_buf()));
        }
        Ok(())
    }

    // Set CONFIG
    pub fn set(key: &str, value: &str) -> Result<()> {
        {
            // Set Property
            let mut w = BUILDER.write().map_err(poisoned)?;
            *w = w.clone().set_override(key, value)?;
        }

        Ok(())
    }

    // Get a single value
    pub fn get<T>(key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let config = BUILDER.read().map_err(poisoned)?.deref().clone().build()?;
        Ok(config.get::<T>(key)?)
    }

    // Get CONFIG
    // This clones Config (from RwLock<Config>) into a new AppConfig object.
    // This means you have to fetch this again if you changed the configuration.
    pub fn fetch() -> Result<AppConfig> {
        // Get a Read Lock from RwLock
        let config = BUILDER.read().map_err(poisoned)?.deref().clone().build()?;

        // Coerce Config into AppConfig
        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }
}
