//! Store error types.

use std::path::PathBuf;

/// Errors from the connection store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the data file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not a JSON array of connections
    #[error("failed to parse connections: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend failed to answer a query
    #[error("store query failed: {message}")]
    Backend { message: String },
}
