use std::{io, path::PathBuf};

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config root is not a JSON object")]
    NotAnObject,
    #[error("config version {0} is newer than the supported version {1}")]
    UnsupportedVersion(u32, u32),
}
