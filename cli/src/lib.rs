use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use utils::app_config::AppConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "dropsync", version)]
#[command(about = "Upload a local directory tree to Dropbox", long_about = None)]
pub struct Cli {
    // None: sync the configured source to the configured destination
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set the logging level (debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Additional configuration file merged over the built-in defaults
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload every file below a local directory
    Sync {
        /// Local directory to upload (defaults to sync.source)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Remote destination path (defaults to sync.destination)
        #[arg(short, long)]
        destination: Option<String>,

        /// Keep remote files that already exist
        #[arg(long)]
        no_overwrite: bool,

        /// Create every remote folder before uploading its files
        #[arg(long)]
        create_folders: bool,
    },

    /// Upload a single file
    Upload {
        /// Local file
        local: PathBuf,

        /// Remote path
        remote: String,

        /// Keep the remote file if it already exists
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Download a single file
    Download {
        /// Remote path
        remote: String,

        /// Local destination file
        local: PathBuf,

        /// Keep the local file if it already exists
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Create a remote folder, ignoring any failure
    Mkdir {
        /// Remote folder path
        remote: String,
    },
}

/// Parse the command line and merge `--config` / `--log-level` into AppConfig.
///
/// Runs before logging is set up so the chosen level applies to the logger.
pub fn parse_args() -> utils::error::Result<Cli> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    AppConfig::merge_config(cli.config.as_deref())?;
    AppConfig::merge_args(&matches)?;

    Ok(cli)
}

pub async fn cli_match(cli: Cli) -> utils::error::Result<()> {
    // Execute the subcommand
    match cli.command {
        None => commands::sync_cmd(None, None, false, false).await?,
        Some(Commands::Sync {
            source,
            destination,
            no_overwrite,
            create_folders,
        }) => commands::sync_cmd(source, destination, no_overwrite, create_folders).await?,
        Some(Commands::Upload {
            local,
            remote,
            no_overwrite,
        }) => commands::upload_cmd(local, remote, !no_overwrite).await?,
        Some(Commands::Download {
            remote,
            local,
            no_overwrite,
        }) => commands::download_cmd(remote, local, !no_overwrite).await?,
        Some(Commands::Mkdir { remote }) => commands::mkdir_cmd(remote).await?,
    }

    Ok(())
}
