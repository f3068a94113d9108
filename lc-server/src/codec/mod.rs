//! Opaque connection identifiers.
//!
//! A connection's natural key is packed into a small protocol buffers
//! message and rendered as padded standard base64:
//!
//! ```text
//! message ConnectionId {
//!     string trip_id = 1;
//!     string from_stop_id = 2;
//!     uint32 t_departure = 3;  // Unix seconds
//!     uint32 t_arrival = 4;    // Unix seconds
//!     string to_stop_id = 5;
//! }
//! ```
//!
//! Identifiers already handed out to clients must keep resolving, so the
//! byte layout is fixed: all five fields, in tag order, always written.
//! Times have whole-second resolution and overflow at 2106-02-07T06:28:16Z.

mod error;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use prost::Message;

use crate::domain::{ConnectionKey, KeyField};

pub use error::CodecError;

/// Standard alphabet, padded on output, padding optional on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Wire form of an identifier. Fields are `optional` so that zero values
/// are still written and absent fields can be told apart on decode.
#[derive(Clone, PartialEq, Message)]
struct ConnectionId {
    #[prost(string, optional, tag = "1")]
    trip_id: Option<String>,
    #[prost(string, optional, tag = "2")]
    from_stop_id: Option<String>,
    #[prost(uint32, optional, tag = "3")]
    t_departure: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    t_arrival: Option<u32>,
    #[prost(string, optional, tag = "5")]
    to_stop_id: Option<String>,
}

/// Encode a connection key as an opaque identifier.
///
/// Sub-second precision is truncated. Fails if a string field is empty or
/// a time is before the epoch or at/after 2106-02-07T06:28:16Z.
///
/// # Examples
///
/// ```
/// use lc_server::codec;
/// use lc_server::domain::{ConnectionKey, parse_instant};
///
/// let key = ConnectionKey::new(
///     "foo",
///     "bar",
///     "baz",
///     parse_instant("2022-09-09T09:09:09.000Z").unwrap(),
///     parse_instant("2022-10-10T10:10:10.000Z").unwrap(),
/// );
/// assert_eq!(codec::encode(&key).unwrap(), "CgNmb28SA2Jhchi1heyYBiCC34+aBioDYmF6");
/// ```
pub fn encode(key: &ConnectionKey) -> Result<String, CodecError> {
    require_non_empty(KeyField::TripId, &key.trip_id)?;
    require_non_empty(KeyField::FromStopId, &key.from_stop_id)?;
    require_non_empty(KeyField::ToStopId, &key.to_stop_id)?;

    let id = ConnectionId {
        trip_id: Some(key.trip_id.clone()),
        from_stop_id: Some(key.from_stop_id.clone()),
        t_departure: Some(to_unix_seconds(KeyField::DepartureTime, key.departure_time)?),
        t_arrival: Some(to_unix_seconds(KeyField::ArrivalTime, key.arrival_time)?),
        to_stop_id: Some(key.to_stop_id.clone()),
    };

    Ok(TOKEN_ENGINE.encode(id.encode_to_vec()))
}

/// Decode an identifier back into a connection key.
///
/// Only syntax is checked. Absent string fields come back empty and absent
/// times come back as the epoch; use [`decode_strict`] when every field
/// must be present.
pub fn decode(token: &str) -> Result<ConnectionKey, CodecError> {
    Ok(parse(token)?.into_key())
}

/// Decode an identifier, requiring all five fields to be present and every
/// string field to be non-empty.
pub fn decode_strict(token: &str) -> Result<ConnectionKey, CodecError> {
    let id = parse(token)?;

    require_present(KeyField::TripId, id.trip_id.as_deref())?;
    require_present(KeyField::FromStopId, id.from_stop_id.as_deref())?;
    if id.t_departure.is_none() {
        return Err(CodecError::MissingField(KeyField::DepartureTime));
    }
    if id.t_arrival.is_none() {
        return Err(CodecError::MissingField(KeyField::ArrivalTime));
    }
    require_present(KeyField::ToStopId, id.to_stop_id.as_deref())?;

    Ok(id.into_key())
}

fn parse(token: &str) -> Result<ConnectionId, CodecError> {
    let bytes = TOKEN_ENGINE.decode(token)?;
    Ok(ConnectionId::decode(bytes.as_slice())?)
}

impl ConnectionId {
    fn into_key(self) -> ConnectionKey {
        ConnectionKey {
            trip_id: self.trip_id.unwrap_or_default(),
            from_stop_id: self.from_stop_id.unwrap_or_default(),
            to_stop_id: self.to_stop_id.unwrap_or_default(),
            departure_time: from_unix_seconds(self.t_departure.unwrap_or(0)),
            arrival_time: from_unix_seconds(self.t_arrival.unwrap_or(0)),
        }
    }
}

fn require_present(field: KeyField, value: Option<&str>) -> Result<(), CodecError> {
    require_non_empty(field, value.unwrap_or_default())
}

fn require_non_empty(field: KeyField, value: &str) -> Result<(), CodecError> {
    if value.is_empty() {
        return Err(CodecError::MissingField(field));
    }
    Ok(())
}

fn to_unix_seconds(field: KeyField, instant: DateTime<Utc>) -> Result<u32, CodecError> {
    // `timestamp` floors, which equals truncation for the non-negative range
    // we accept.
    u32::try_from(instant.timestamp()).map_err(|_| CodecError::OutOfRange { field, instant })
}

fn from_unix_seconds(secs: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(i64::from(secs), 0).unwrap_or(DateTime::UNIX_EPOCH)
}
