use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Application level error.
///
/// Library crates keep their own error enums; anything that bubbles up to the
/// command layer is wrapped here, usually through [`Error::with_source`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    #[error("{msg}: {source}")]
    WithSource {
        msg: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Clap(#[from] clap::Error),
}

impl Error {
    pub fn new(msg: &str) -> Self {
        Error::Message(msg.to_string())
    }

    pub fn with_source(msg: &str, source: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::WithSource {
            msg: msg.to_string(),
            source,
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Message(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Message(msg.to_string())
    }
}
