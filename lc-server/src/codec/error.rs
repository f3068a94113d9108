//! Connection identifier codec errors.

use chrono::{DateTime, Utc};

use crate::domain::KeyField;

/// Errors from encoding or decoding connection identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A required key field is empty or absent
    #[error("{0} must not be empty")]
    MissingField(KeyField),

    /// A time does not fit the identifier's unsigned 32-bit seconds field
    #[error(
        "{field} {instant} is outside the representable range \
         1970-01-01T00:00:00Z..=2106-02-07T06:28:15Z"
    )]
    OutOfRange {
        field: KeyField,
        instant: DateTime<Utc>,
    },

    /// The token is not valid base64
    #[error("connection id is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded bytes are not a valid identifier message
    #[error("connection id is malformed: {0}")]
    InvalidMessage(#[from] prost::DecodeError),
}
