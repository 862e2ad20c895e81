//! Failures raised at the invocation boundary.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("failed to read parameters file {}: {source}", .path.display())]
    ParameterFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse parameters file {}: {source}", .path.display())]
    ParameterFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid plugin id '{0}'")]
    InvalidId(String),

    #[error("plugin not found: '{id}' (searched {})", .dir.display())]
    NotFound { id: String, dir: PathBuf },

    #[error("failed to load plugin '{id}': {reason}")]
    PluginLoad { id: String, reason: String },

    #[error("plugin '{id}' failed: {reason}")]
    PluginExecution { id: String, reason: String },

    #[error("plugin '{id}' timed out after {}s", .after.as_secs())]
    Timeout { id: String, after: Duration },

    #[error("failed to read plugins directory {}: {source}", .dir.display())]
    Catalog {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, InvokeError>;
