//! Exact lookup of a connection by its opaque identifier.

use std::sync::Arc;

use tracing::error;

use crate::codec::{self, CodecError};
use crate::domain::{Connection, ConnectionKey};
use crate::store::{ConnectionStore, StoreError};

/// Errors from an exact lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The identifier is malformed or lacks a key field
    #[error(transparent)]
    InvalidId(#[from] CodecError),

    /// No connection has this key
    #[error("connection not found: {0}")]
    NotFound(ConnectionKey),

    /// Several connections share this key; the dataset is broken
    #[error("{matches} connections share the key {key}, keys must be unique")]
    Integrity { key: ConnectionKey, matches: usize },

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves identifiers to single connections.
pub struct ExactLookup<S> {
    store: Arc<S>,
}

impl<S: ConnectionStore> ExactLookup<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Decode `token` and fetch the one connection it names.
    ///
    /// Several matches are never tolerated: they mean the key uniqueness the
    /// identifiers rely on does not hold.
    pub async fn get(&self, token: &str) -> Result<Connection, LookupError> {
        let key = codec::decode_strict(token)?;
        let mut rows = self.store.fetch_exact(&key).await?;

        match rows.len() {
            0 => Err(LookupError::NotFound(key)),
            1 => Ok(rows.remove(0)),
            matches => {
                error!(%key, matches, "connection key is not unique");
                Err(LookupError::Integrity { key, matches })
            }
        }
    }
}
