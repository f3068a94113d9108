//! Response representations.
//!
//! Plain field renaming from connection rows into the Linked Connections
//! JSON-LD shape. Nothing here is consulted by the codec or pagination.

use serde::Serialize;

use crate::codec::{self, CodecError};
use crate::domain::{Connection, Stop, format_instant};
use crate::pagination::{Page, PathField, QueryParams, Relation, RelationKind};

/// Media type of every successful response.
pub const JSON_LD: &str = "application/ld+json";

/// Prefixes used by the representations.
#[derive(Debug, Serialize)]
pub struct Context {
    pub lc: &'static str,
    pub gtfs: &'static str,
    pub tree: &'static str,
    pub rdfs: &'static str,
    pub geosparql: &'static str,
    pub id: &'static str,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            lc: "http://semweb.mmlab.be/ns/linkedconnections#",
            gtfs: "http://vocab.gtfs.org/terms#",
            tree: "https://w3id.org/tree#",
            rdfs: "http://www.w3.org/2000/01/rdf-schema#",
            geosparql: "http://www.opengis.net/ont/geosparql#",
            id: "@id",
        }
    }
}

/// One page of the connections feed.
#[derive(Debug, Serialize)]
pub struct ConnectionsPageView {
    #[serde(rename = "@context")]
    pub context: Context,

    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@type")]
    pub kind: &'static str,

    /// Omitted entirely for an empty page.
    #[serde(rename = "tree:relation", skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<RelationView>,

    #[serde(rename = "@graph")]
    pub connections: Vec<ConnectionView>,
}

impl ConnectionsPageView {
    pub fn new(
        base_url: &str,
        params: &QueryParams,
        page: &Page,
        relations: &[Relation],
    ) -> Result<Self, CodecError> {
        let connections = page
            .items()
            .iter()
            .map(|c| ConnectionView::from_connection(c, base_url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            context: Context::default(),
            id: connections_url(base_url, params),
            kind: "tree:Node",
            relations: relations
                .iter()
                .map(|r| RelationView::from_relation(r, base_url))
                .collect(),
            connections,
        })
    }
}

/// URL of a connections fragment.
pub fn connections_url(base_url: &str, params: &QueryParams) -> String {
    if params.is_empty() {
        format!("{base_url}/connections")
    } else {
        format!("{base_url}/connections?{}", params.to_query_string())
    }
}

/// A continuation link.
#[derive(Debug, Serialize)]
pub struct RelationView {
    #[serde(rename = "@type")]
    pub kind: &'static str,

    #[serde(rename = "tree:node")]
    pub node: String,

    #[serde(rename = "tree:path")]
    pub path: &'static str,

    #[serde(rename = "tree:value")]
    pub value: String,
}

impl RelationView {
    pub fn from_relation(relation: &Relation, base_url: &str) -> Self {
        Self {
            kind: match relation.kind {
                RelationKind::GreaterThanOrEqualTo => "tree:GreaterThanOrEqualToRelation",
                RelationKind::SmallerThanOrEqualTo => "tree:LessThanOrEqualToRelation",
            },
            node: connections_url(base_url, &relation.next_query),
            path: match relation.path {
                PathField::DepartureTime => "lc:departureTime",
                PathField::ArrivalTime => "lc:arrivalTime",
            },
            value: format_instant(relation.value),
        }
    }
}

/// A stop or station.
#[derive(Debug, Serialize)]
pub struct StopView {
    pub id: String,

    #[serde(rename = "rdfs:label")]
    pub label: Option<String>,

    #[serde(rename = "geosparql:asWkt")]
    pub wkt: Option<String>,

    #[serde(rename = "gtfs:parentStation")]
    pub parent_station: Option<Box<StopView>>,

    #[serde(rename = "gtfs:code")]
    pub code: Option<String>,

    #[serde(rename = "gtfs:wheelchairBoarding")]
    pub wheelchair_boarding: Option<u8>,

    #[serde(rename = "gtfs:platformCode")]
    pub platform_code: Option<String>,
}

/// Empty text is rendered as `null`.
fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_owned)
}

impl StopView {
    pub fn from_stop(stop: &Stop) -> Self {
        Self {
            id: stop.stop_id.clone(),
            label: non_empty(stop.stop_name.as_deref()),
            wkt: match (stop.stop_lon, stop.stop_lat) {
                (Some(lon), Some(lat)) => Some(format!("POINT ({lon} {lat})")),
                _ => None,
            },
            parent_station: stop
                .parent_station
                .as_deref()
                .map(|s| Box::new(StopView::from_stop(s))),
            code: non_empty(stop.stop_code.as_deref()),
            // GTFS 0 means "no information".
            wheelchair_boarding: stop.wheelchair_boarding.filter(|&code| code != 0),
            platform_code: non_empty(stop.platform_code.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteRef {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct TripView {
    pub id: String,

    #[serde(rename = "gtfs:route")]
    pub route: Option<RouteRef>,
}

/// A single connection.
#[derive(Debug, Serialize)]
pub struct ConnectionView {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@type")]
    pub kind: &'static str,

    #[serde(rename = "lc:departureTime")]
    pub departure_time: String,

    #[serde(rename = "lc:departureDelay")]
    pub departure_delay: Option<i32>,

    #[serde(rename = "lc:departureStop")]
    pub departure_stop: StopView,

    #[serde(rename = "lc:arrivalTime")]
    pub arrival_time: String,

    #[serde(rename = "lc:arrivalDelay")]
    pub arrival_delay: Option<i32>,

    #[serde(rename = "lc:arrivalStop")]
    pub arrival_stop: StopView,

    #[serde(rename = "gtfs:trip")]
    pub trip: TripView,

    #[serde(rename = "gtfs:pickupType")]
    pub pickup_type: Option<u8>,

    #[serde(rename = "gtfs:dropOffType")]
    pub drop_off_type: Option<u8>,
}

impl ConnectionView {
    /// Render a connection, minting its identifier.
    pub fn from_connection(c: &Connection, base_url: &str) -> Result<Self, CodecError> {
        let token = codec::encode(&c.key())?;
        Ok(Self {
            id: format!("{base_url}/connections/{token}"),
            kind: "lc:Connection",
            departure_time: format_instant(c.t_departure),
            departure_delay: c.departure_delay,
            departure_stop: StopView::from_stop(&c.from_stop),
            arrival_time: format_instant(c.t_arrival),
            arrival_delay: c.arrival_delay,
            arrival_stop: StopView::from_stop(&c.to_stop),
            trip: TripView {
                id: c.trip_id.clone(),
                route: c.route_id.clone().map(|id| RouteRef { id }),
            },
            pickup_type: c.pickup_type,
            drop_off_type: c.drop_off_type,
        })
    }
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_instant;
    use serde_json::json;

    fn connection() -> Connection {
        Connection {
            trip_id: "foo".into(),
            route_id: Some("r1".into()),
            from_stop: Stop {
                stop_id: "bar".into(),
                stop_name: Some("Bar Platform 1".into()),
                stop_lon: Some(13.5),
                stop_lat: Some(52.25),
                platform_code: Some("1".into()),
                parent_station: Some(Box::new(Stop {
                    stop_name: Some("Bar".into()),
                    ..Stop::new("bar-station")
                })),
                ..Stop::new("bar")
            },
            t_departure: parse_instant("2022-09-09T09:09:09Z").unwrap(),
            departure_delay: Some(120),
            to_stop: Stop::new("baz"),
            t_arrival: parse_instant("2022-10-10T10:10:10Z").unwrap(),
            arrival_delay: None,
            pickup_type: Some(0),
            drop_off_type: Some(1),
        }
    }

    #[test]
    fn connection_representation() {
        let view = ConnectionView::from_connection(&connection(), "http://lc.test").unwrap();
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(
            value["@id"],
            "http://lc.test/connections/CgNmb28SA2Jhchi1heyYBiCC34+aBioDYmF6"
        );
        assert_eq!(value["@type"], "lc:Connection");
        assert_eq!(value["lc:departureTime"], "2022-09-09T09:09:09Z");
        assert_eq!(value["lc:departureDelay"], 120);
        assert_eq!(value["lc:arrivalDelay"], json!(null));
        assert_eq!(value["lc:departureStop"]["id"], "bar");
        assert_eq!(value["lc:departureStop"]["geosparql:asWkt"], "POINT (13.5 52.25)");
        assert_eq!(value["lc:departureStop"]["gtfs:platformCode"], "1");
        assert_eq!(
            value["lc:departureStop"]["gtfs:parentStation"]["rdfs:label"],
            "Bar"
        );
        assert_eq!(value["lc:arrivalStop"]["id"], "baz");
        assert_eq!(value["lc:arrivalStop"]["geosparql:asWkt"], json!(null));
        assert_eq!(value["gtfs:trip"], json!({"id": "foo", "gtfs:route": {"id": "r1"}}));
        assert_eq!(value["gtfs:pickupType"], 0);
        assert_eq!(value["gtfs:dropOffType"], 1);
    }

    #[test]
    fn unknown_stop_details_are_null() {
        let stop = Stop {
            stop_name: Some(String::new()),
            stop_code: Some(String::new()),
            platform_code: Some("4".into()),
            wheelchair_boarding: Some(0),
            ..Stop::new("bar")
        };
        let value = serde_json::to_value(StopView::from_stop(&stop)).unwrap();
        assert_eq!(value["rdfs:label"], json!(null));
        assert_eq!(value["gtfs:code"], json!(null));
        assert_eq!(value["gtfs:wheelchairBoarding"], json!(null));
        assert_eq!(value["gtfs:platformCode"], "4");

        let stop = Stop {
            wheelchair_boarding: Some(2),
            ..Stop::new("bar")
        };
        let value = serde_json::to_value(StopView::from_stop(&stop)).unwrap();
        assert_eq!(value["gtfs:wheelchairBoarding"], 2);
    }

    #[test]
    fn unrepresentable_connection_fails() {
        let mut c = connection();
        c.trip_id.clear();
        assert!(ConnectionView::from_connection(&c, "http://lc.test").is_err());
    }

    #[test]
    fn empty_page_omits_relations() {
        let view =
            ConnectionsPageView::new("http://lc.test", &QueryParams::new(), &Page::default(), &[])
                .unwrap();
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["@id"], "http://lc.test/connections");
        assert_eq!(value["@type"], "tree:Node");
        assert!(value.get("tree:relation").is_none());
        assert_eq!(value["@graph"], json!([]));
    }

    #[test]
    fn relation_representation() {
        let relation = Relation {
            kind: RelationKind::SmallerThanOrEqualTo,
            path: PathField::ArrivalTime,
            value: parse_instant("2022-10-10T10:10:10Z").unwrap(),
            next_query: QueryParams::from_pairs([("arrivalTime", "2022-10-10T10:10:10Z")]),
        };
        let view = RelationView::from_relation(&relation, "http://lc.test");
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(
            value,
            json!({
                "@type": "tree:LessThanOrEqualToRelation",
                "tree:node": "http://lc.test/connections?arrivalTime=2022-10-10T10%3A10%3A10Z",
                "tree:path": "lc:arrivalTime",
                "tree:value": "2022-10-10T10:10:10Z",
            })
        );
    }
}
