//! In-process connection store.
//!
//! Holds the whole dataset in memory, sorted once at construction. Used by
//! the server binary for JSON datasets and as the injected store in tests.

use std::cmp::Ordering;
use std::path::Path;

use tracing::info;

use crate::domain::{Connection, ConnectionKey, truncate_to_seconds};
use crate::pagination::Direction;

use super::{ConnectionStore, PageQuery, StoreError};

/// Connections held in memory with a departure-ordered and an
/// arrival-ordered index.
///
/// No date-partition shortcut is applied: there is no partition column.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Rows ordered by departure time, ties broken by key.
    by_departure: Vec<Connection>,

    /// Indices into `by_departure`, ordered by arrival time, ties broken by key.
    by_arrival: Vec<usize>,
}

fn departure_order(a: &Connection, b: &Connection) -> Ordering {
    a.t_departure
        .cmp(&b.t_departure)
        .then_with(|| a.key().cmp(&b.key()))
}

fn arrival_order(a: &Connection, b: &Connection) -> Ordering {
    a.t_arrival
        .cmp(&b.t_arrival)
        .then_with(|| a.key().cmp(&b.key()))
}

impl InMemoryStore {
    /// Build a store from rows in any order.
    ///
    /// Duplicate keys are kept: exact lookups are where they get reported.
    pub fn new(mut rows: Vec<Connection>) -> Self {
        rows.sort_by(departure_order);
        let mut by_arrival: Vec<usize> = (0..rows.len()).collect();
        by_arrival.sort_by(|&a, &b| arrival_order(&rows[a], &rows[b]));

        Self {
            by_departure: rows,
            by_arrival,
        }
    }

    /// Load a JSON array of connections.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows: Vec<Connection> = serde_json::from_str(&json)?;
        info!(path = %path.display(), count = rows.len(), "loaded connections");
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.by_departure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_departure.is_empty()
    }

    fn departures_from(&self, query: &PageQuery) -> Vec<Connection> {
        let start = self
            .by_departure
            .partition_point(|c| c.t_departure < query.anchor_time);
        self.by_departure[start..]
            .iter()
            .take(query.limit)
            .cloned()
            .collect()
    }

    /// The `limit` latest arrivals at or before the anchor, oldest first.
    fn arrivals_until(&self, query: &PageQuery) -> Vec<Connection> {
        let end = self
            .by_arrival
            .partition_point(|&i| self.by_departure[i].t_arrival <= query.anchor_time);
        let start = end.saturating_sub(query.limit);
        self.by_arrival[start..end]
            .iter()
            .map(|&i| self.by_departure[i].clone())
            .collect()
    }
}

impl ConnectionStore for InMemoryStore {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Connection>, StoreError> {
        Ok(match query.direction {
            Direction::Departure => self.departures_from(query),
            Direction::Arrival => self.arrivals_until(query),
        })
    }

    async fn fetch_exact(&self, key: &ConnectionKey) -> Result<Vec<Connection>, StoreError> {
        // Rows match anywhere within the key's departure second.
        let second = truncate_to_seconds(key.departure_time);
        let start = self
            .by_departure
            .partition_point(|c| c.t_departure < second);
        Ok(self.by_departure[start..]
            .iter()
            .take_while(|c| truncate_to_seconds(c.t_departure) == second)
            .filter(|c| c.has_key(key))
            .cloned()
            .collect())
    }
}
