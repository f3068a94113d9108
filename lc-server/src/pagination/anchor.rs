//! Resolving client time anchors.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{format_instant, parse_instant, truncate_to_seconds};

use super::config::{ConflictPolicy, PaginationConfig};

/// Query parameter anchoring a page at a departure time (inclusive lower bound).
pub const DEPARTURE_TIME_PARAM: &str = "departureTime";

/// Query parameter anchoring a page at an arrival time (inclusive upper bound).
pub const ARRIVAL_TIME_PARAM: &str = "arrivalTime";

/// Which time field a page is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Connections departing at or after the anchor, by departure time.
    Departure,
    /// Connections arriving at or before the anchor, by arrival time.
    Arrival,
}

impl Direction {
    /// The query parameter carrying an anchor for this direction.
    pub fn param(&self) -> &'static str {
        match self {
            Direction::Departure => DEPARTURE_TIME_PARAM,
            Direction::Arrival => ARRIVAL_TIME_PARAM,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Departure => f.write_str("departure"),
            Direction::Arrival => f.write_str("arrival"),
        }
    }
}

/// Errors from resolving an anchor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    /// A time parameter is not an ISO-8601 instant
    #[error("invalid {param} parameter: {value:?} is not an ISO 8601 instant")]
    InvalidTime { param: &'static str, value: String },

    /// Both anchors were given and the configuration forbids it
    #[error("departureTime and arrivalTime cannot be combined")]
    ConflictingAnchors,

    /// The query string could not be decoded
    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

/// Raw query parameters in request order.
///
/// Repeated names are kept; lookups see the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Result<Self, AnchorError> {
        serde_urlencoded::from_str::<Vec<(String, String)>>(query)
            .map(QueryParams)
            .map_err(|e| AnchorError::InvalidQuery(e.to_string()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryParams(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// A copy without any `name` parameter.
    pub fn without(&self, name: &str) -> Self {
        QueryParams(self.0.iter().filter(|(k, _)| k != name).cloned().collect())
    }

    /// A copy with `name` set to `value`, replacing earlier values.
    pub fn with(&self, name: &str, value: impl Into<String>) -> Self {
        let mut params = self.without(name);
        params.0.push((name.to_string(), value.into()));
        params
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as a query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        // A sequence of string pairs always serializes.
        serde_urlencoded::to_string(&self.0).unwrap_or_default()
    }
}

/// A validated, canonical page anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorDescriptor {
    pub direction: Direction,
    pub anchor_time: DateTime<Utc>,

    /// Every other query parameter, echoed untouched into continuation links.
    pub extra_params: QueryParams,
}

impl AnchorDescriptor {
    /// The query parameters that resolve back to this descriptor.
    pub fn to_params(&self) -> QueryParams {
        self.extra_params
            .with(self.direction.param(), format_instant(self.anchor_time))
    }
}

/// Turns raw query parameters into an [`AnchorDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct AnchorResolver {
    conflicting_anchors: ConflictPolicy,
}

impl AnchorResolver {
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            conflicting_anchors: config.conflicting_anchors(),
        }
    }

    /// Resolve the anchor of a listing request.
    ///
    /// A departure anchor wins over an arrival anchor unless the policy is
    /// [`ConflictPolicy::Reject`]. With no anchor at all the page starts at
    /// `now` (to the second), by departure.
    pub fn resolve(
        &self,
        params: &QueryParams,
        now: DateTime<Utc>,
    ) -> Result<AnchorDescriptor, AnchorError> {
        let departure = parse_anchor(params, DEPARTURE_TIME_PARAM)?;
        let arrival = parse_anchor(params, ARRIVAL_TIME_PARAM)?;

        let (direction, anchor_time) = match (departure, arrival) {
            (Some(_), Some(_)) if self.conflicting_anchors == ConflictPolicy::Reject => {
                return Err(AnchorError::ConflictingAnchors);
            }
            (Some(departure), Some(_)) => {
                debug!("both anchors given, ignoring arrivalTime");
                (Direction::Departure, departure)
            }
            (Some(departure), None) => (Direction::Departure, departure),
            (None, Some(arrival)) => (Direction::Arrival, arrival),
            (None, None) => (Direction::Departure, truncate_to_seconds(now)),
        };

        let descriptor = AnchorDescriptor {
            direction,
            anchor_time,
            extra_params: params
                .without(DEPARTURE_TIME_PARAM)
                .without(ARRIVAL_TIME_PARAM),
        };
        debug!(%direction, anchor = %format_instant(anchor_time), "resolved anchor");
        Ok(descriptor)
    }
}

fn parse_anchor(
    params: &QueryParams,
    param: &'static str,
) -> Result<Option<DateTime<Utc>>, AnchorError> {
    params
        .get(param)
        .map(|value| {
            parse_instant(value).map_err(|_| AnchorError::InvalidTime {
                param,
                value: value.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 9, h, m, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        parse_instant("2022-09-09T12:34:56.789Z").unwrap()
    }

    fn resolve(query: &str) -> Result<AnchorDescriptor, AnchorError> {
        AnchorResolver::default().resolve(&QueryParams::parse(query).unwrap(), now())
    }

    #[test]
    fn departure_anchor() {
        let d = resolve("departureTime=2022-09-09T10:00:00Z").unwrap();
        assert_eq!(d.direction, Direction::Departure);
        assert_eq!(d.anchor_time, t(10, 0));
        assert!(d.extra_params.is_empty());
    }

    #[test]
    fn arrival_anchor() {
        let d = resolve("arrivalTime=2022-09-09T11:30:00%2B01:00").unwrap();
        assert_eq!(d.direction, Direction::Arrival);
        assert_eq!(d.anchor_time, t(10, 30));
    }

    #[test]
    fn departure_wins_over_arrival() {
        let d = resolve("arrivalTime=2022-09-09T11:00:00Z&departureTime=2022-09-09T10:00:00Z")
            .unwrap();
        assert_eq!(d.direction, Direction::Departure);
        assert_eq!(d.anchor_time, t(10, 0));
    }

    #[test]
    fn conflicting_anchors_rejected_by_policy() {
        let config = PaginationConfig::new(10, ConflictPolicy::Reject).unwrap();
        let resolver = AnchorResolver::new(&config);
        let params = QueryParams::from_pairs([
            (DEPARTURE_TIME_PARAM, "2022-09-09T10:00:00Z"),
            (ARRIVAL_TIME_PARAM, "2022-09-09T11:00:00Z"),
        ]);
        assert_eq!(resolver.resolve(&params, now()), Err(AnchorError::ConflictingAnchors));

        let params = QueryParams::from_pairs([(ARRIVAL_TIME_PARAM, "2022-09-09T11:00:00Z")]);
        assert!(resolver.resolve(&params, now()).is_ok());
    }

    #[test]
    fn no_anchor_defaults_to_now_by_departure() {
        let d = resolve("").unwrap();
        assert_eq!(d.direction, Direction::Departure);
        assert_eq!(d.anchor_time, Utc.with_ymd_and_hms(2022, 9, 9, 12, 34, 56).unwrap());
    }

    #[test]
    fn invalid_times_rejected() {
        assert_eq!(
            resolve("departureTime=tomorrow"),
            Err(AnchorError::InvalidTime {
                param: DEPARTURE_TIME_PARAM,
                value: "tomorrow".into(),
            })
        );
        assert!(matches!(
            resolve("arrivalTime="),
            Err(AnchorError::InvalidTime { param: ARRIVAL_TIME_PARAM, .. })
        ));
        // an invalid arrival anchor is reported even when departure wins
        assert!(resolve("departureTime=2022-09-09T10:00:00Z&arrivalTime=nope").is_err());
    }

    #[test]
    fn other_params_pass_through_in_order() {
        let d = resolve("z=1&departureTime=2022-09-09T10:00:00Z&a=2&z=3").unwrap();
        let extra: Vec<_> = d.extra_params.iter().collect();
        assert_eq!(extra, vec![("z", "1"), ("a", "2"), ("z", "3")]);
    }

    #[test]
    fn resolving_twice_is_identical() {
        let query = "lang=en&arrivalTime=2022-09-09T10:00:00Z";
        assert_eq!(resolve(query).unwrap(), resolve(query).unwrap());
        assert_eq!(resolve("").unwrap(), resolve("").unwrap());
    }

    #[test]
    fn descriptor_params_resolve_back() {
        let d = resolve("lang=en&arrivalTime=2022-09-09T10:00:00Z").unwrap();
        let params = d.to_params();
        assert_eq!(params.get(ARRIVAL_TIME_PARAM), Some("2022-09-09T10:00:00Z"));
        assert_eq!(
            AnchorResolver::default().resolve(&params, now()).unwrap(),
            d
        );
    }

    #[test]
    fn query_params_editing() {
        let params = QueryParams::from_pairs([("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));
        assert_eq!(params.without("a").get("a"), None);

        let replaced = params.with("a", "9");
        assert_eq!(replaced.iter().collect::<Vec<_>>(), vec![("b", "2"), ("a", "9")]);
    }

    #[test]
    fn query_string_encoding() {
        let params = QueryParams::from_pairs([
            ("departureTime", "2022-09-09T10:00:00+01:00"),
            ("q", "a b&c"),
        ]);
        let encoded = params.to_query_string();
        assert_eq!(
            encoded,
            "departureTime=2022-09-09T10%3A00%3A00%2B01%3A00&q=a+b%26c"
        );
        assert_eq!(QueryParams::parse(&encoded).unwrap(), params);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Unrelated parameters survive resolution untouched
        #[test]
        fn extra_params_preserved(
            pairs in prop::collection::vec(("[a-z]{1,8}", "[ -~]{0,12}"), 0..6),
            secs in 0i64..4_000_000_000i64,
        ) {
            let anchor = DateTime::from_timestamp(secs, 0).unwrap();
            let mut params = QueryParams::from_pairs(pairs.clone());
            params = params.with(DEPARTURE_TIME_PARAM, format_instant(anchor));
            let resolved = AnchorResolver::default().resolve(&params, anchor).unwrap();

            let expected: Vec<(String, String)> = pairs
                .into_iter()
                .filter(|(k, _)| k != DEPARTURE_TIME_PARAM && k != ARRIVAL_TIME_PARAM)
                .collect();
            prop_assert_eq!(resolved.extra_params, QueryParams::from_pairs(expected));
            prop_assert_eq!(resolved.anchor_time, anchor);
        }

        /// Query strings survive an encode/parse cycle
        #[test]
        fn query_string_roundtrip(
            pairs in prop::collection::vec(("[a-zA-Z]{1,8}", ".{0,12}"), 0..6),
        ) {
            let params = QueryParams::from_pairs(pairs);
            prop_assert_eq!(QueryParams::parse(&params.to_query_string()).unwrap(), params);
        }
    }
}
