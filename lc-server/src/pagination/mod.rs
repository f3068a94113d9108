//! Stateless keyset pagination over the connection feed.
//!
//! A listing request carries a time anchor (`departureTime` or
//! `arrivalTime`). The anchor is resolved into an [`AnchorDescriptor`], the
//! [`PageFetcher`] turns that into one bounded store query, and
//! [`build_relations`] derives the forward and backward continuation links
//! from the last connection of the page. Nothing is remembered between
//! requests: a client reconstructs the next query from the links alone.
//!
//! Pages are defined by a time boundary, not a snapshot. Writes to the
//! dataset between two fetches can make a crawler see a connection twice or
//! miss one at a page boundary.

mod anchor;
mod config;
mod fetch;
mod relation;

pub use anchor::{
    ARRIVAL_TIME_PARAM, AnchorDescriptor, AnchorError, AnchorResolver, DEPARTURE_TIME_PARAM,
    Direction, QueryParams,
};
pub use config::{ConflictPolicy, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationConfig};
pub use fetch::{Page, PageFetcher};
pub use relation::{PathField, Relation, RelationKind, build_relations};
