//! The natural key of a connection.

use std::fmt;

use chrono::{DateTime, Utc};

/// One of the five fields making up a [`ConnectionKey`].
///
/// Used to name the offending field in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyField {
    TripId,
    FromStopId,
    DepartureTime,
    ArrivalTime,
    ToStopId,
}

impl KeyField {
    /// Field name as used in the stored rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyField::TripId => "trip_id",
            KeyField::FromStopId => "from_stop_id",
            KeyField::DepartureTime => "t_departure",
            KeyField::ArrivalTime => "t_arrival",
            KeyField::ToStopId => "to_stop_id",
        }
    }
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The composite key uniquely identifying a connection in the dataset.
///
/// Uniqueness is a property of the dataset, not of this type: nothing here
/// stops two rows sharing a key. Exact lookups check it when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey {
    pub trip_id: String,
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

impl ConnectionKey {
    pub fn new(
        trip_id: impl Into<String>,
        from_stop_id: impl Into<String>,
        to_stop_id: impl Into<String>,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            from_stop_id: from_stop_id.into(),
            to_stop_id: to_stop_id.into(),
            departure_time,
            arrival_time,
        }
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trip {} from {} at {} to {} at {}",
            self.trip_id,
            self.from_stop_id,
            self.departure_time.to_rfc3339(),
            self.to_stop_id,
            self.arrival_time.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn field_names() {
        assert_eq!(KeyField::TripId.to_string(), "trip_id");
        assert_eq!(KeyField::FromStopId.to_string(), "from_stop_id");
        assert_eq!(KeyField::DepartureTime.to_string(), "t_departure");
        assert_eq!(KeyField::ArrivalTime.to_string(), "t_arrival");
        assert_eq!(KeyField::ToStopId.to_string(), "to_stop_id");
    }

    #[test]
    fn display_key() {
        let dep = Utc.with_ymd_and_hms(2022, 9, 9, 9, 9, 9).unwrap();
        let arr = Utc.with_ymd_and_hms(2022, 9, 9, 9, 19, 9).unwrap();
        let key = ConnectionKey::new("t1", "a", "b", dep, arr);
        assert_eq!(
            key.to_string(),
            "trip t1 from a at 2022-09-09T09:09:09+00:00 to b at 2022-09-09T09:19:09+00:00"
        );
    }
}
