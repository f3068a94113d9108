//! Connection records as read from the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ConnectionKey, truncate_to_seconds};

/// A stop (or station) referenced by a connection.
///
/// Only `stop_id` is required; the rest is descriptive metadata that may be
/// missing from the dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stop {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_lon: Option<f64>,
    #[serde(default)]
    pub stop_lat: Option<f64>,
    #[serde(default)]
    pub stop_code: Option<String>,
    #[serde(default)]
    pub platform_code: Option<String>,
    #[serde(default)]
    pub wheelchair_boarding: Option<u8>,
    /// Parent station, if this stop is a platform or entrance.
    #[serde(default)]
    pub parent_station: Option<Box<Stop>>,
}

impl Stop {
    /// A stop with only an ID.
    pub fn new(stop_id: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            ..Self::default()
        }
    }
}

/// A single connection: one trip travelling from one stop to the next.
///
/// Immutable once read. Delays are in seconds; pickup and drop-off types
/// are the GTFS codes (0 = regular, 1 = none, 2 = phone, 3 = coordinate
/// with driver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub trip_id: String,
    #[serde(default)]
    pub route_id: Option<String>,
    pub from_stop: Stop,
    pub t_departure: DateTime<Utc>,
    #[serde(default)]
    pub departure_delay: Option<i32>,
    pub to_stop: Stop,
    pub t_arrival: DateTime<Utc>,
    #[serde(default)]
    pub arrival_delay: Option<i32>,
    #[serde(default)]
    pub pickup_type: Option<u8>,
    #[serde(default)]
    pub drop_off_type: Option<u8>,
}

impl Connection {
    /// The natural key of this connection.
    pub fn key(&self) -> ConnectionKey {
        ConnectionKey {
            trip_id: self.trip_id.clone(),
            from_stop_id: self.from_stop.stop_id.clone(),
            to_stop_id: self.to_stop.stop_id.clone(),
            departure_time: self.t_departure,
            arrival_time: self.t_arrival,
        }
    }

    /// Whether this connection is named by the given key.
    ///
    /// Times compare to the second: identifiers carry whole seconds only.
    pub fn has_key(&self, key: &ConnectionKey) -> bool {
        self.trip_id == key.trip_id
            && self.from_stop.stop_id == key.from_stop_id
            && self.to_stop.stop_id == key.to_stop_id
            && truncate_to_seconds(self.t_departure) == truncate_to_seconds(key.departure_time)
            && truncate_to_seconds(self.t_arrival) == truncate_to_seconds(key.arrival_time)
    }
}
