//! Domain types for the linked connections server.
//!
//! A connection is a single directed hop between two stops on one trip.
//! Its natural key (trip, from stop, to stop, departure, arrival) is what
//! the opaque connection identifiers encode.

mod connection;
mod instant;
mod key;

pub use connection::{Connection, Stop};
pub use instant::{format_instant, parse_instant, truncate_to_seconds};
pub use key::{ConnectionKey, KeyField};
