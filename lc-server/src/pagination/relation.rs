//! Continuation relations derived from a page boundary.

use chrono::{DateTime, Utc};

use crate::domain::format_instant;

use super::anchor::{ARRIVAL_TIME_PARAM, AnchorDescriptor, DEPARTURE_TIME_PARAM, QueryParams};
use super::fetch::Page;

/// Comparison a relation's target fragment satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    GreaterThanOrEqualTo,
    SmallerThanOrEqualTo,
}

/// The connection field a relation compares on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathField {
    DepartureTime,
    ArrivalTime,
}

/// A hypermedia link to the next fragment, with its comparison semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationKind,
    pub path: PathField,
    pub value: DateTime<Utc>,

    /// Query parameters of the linked fragment.
    pub next_query: QueryParams,
}

/// Build the forward and backward relations for a page.
///
/// Both are always emitted, whatever the direction of the original query:
/// forward by departure from the boundary's departure time, backward by
/// arrival from the boundary's arrival time. An empty page has no boundary
/// and gets no relations.
pub fn build_relations(page: &Page, original: &AnchorDescriptor) -> Vec<Relation> {
    let Some(boundary) = page.boundary() else {
        return Vec::new();
    };

    let forward = Relation {
        kind: RelationKind::GreaterThanOrEqualTo,
        path: PathField::DepartureTime,
        value: boundary.t_departure,
        next_query: original
            .extra_params
            .without(ARRIVAL_TIME_PARAM)
            .with(DEPARTURE_TIME_PARAM, format_instant(boundary.t_departure)),
    };

    let backward = Relation {
        kind: RelationKind::SmallerThanOrEqualTo,
        path: PathField::ArrivalTime,
        value: boundary.t_arrival,
        next_query: original
            .extra_params
            .without(DEPARTURE_TIME_PARAM)
            .with(ARRIVAL_TIME_PARAM, format_instant(boundary.t_arrival)),
    };

    vec![forward, backward]
}
