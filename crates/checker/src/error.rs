use std::path::PathBuf;

use formrules_core::ConfigError;

/// Everything that can stop a check before a report is produced.
///
/// A record that fails its rules is not an error: it yields an invalid
/// [`crate::CheckReport`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Environment: {0}")]
    Env(String),
}
