//! Errors raised at the edges of the dashboard (terminal, files, arguments).
//!
//! The rendering core never fails: missing data, degenerate geometry and an
//! unattached canvas all have a defined rendering.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkytraceError>;

#[derive(Debug, Error)]
pub enum SkytraceError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read route file {path}: {source}")]
    RouteRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid route file {path}: {source}")]
    RouteParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
