//! The connection store boundary.
//!
//! The core never talks to a database directly. It is handed a
//! [`ConnectionStore`] at construction time and treats it as a read-only
//! query surface: one bounded page query per listing request, one exact
//! match query per lookup.

mod error;
mod memory;

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::domain::{Connection, ConnectionKey};
use crate::pagination::Direction;

pub use error::StoreError;
pub use memory::InMemoryStore;

/// A bounded, time-anchored page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Which time field is filtered and ordered on.
    pub direction: Direction,

    /// Inclusive bound on that field.
    pub anchor_time: DateTime<Utc>,

    /// Maximum number of rows to return.
    pub limit: usize,
}

/// Source of connection rows.
///
/// Implementations must honour the page contract:
/// - `Departure`: every row has `t_departure >= anchor_time`, ordered by
///   `t_departure` ascending.
/// - `Arrival`: every row has `t_arrival <= anchor_time`, ordered by
///   `t_arrival` ascending.
/// - At most `limit` rows.
///
/// A store may narrow the scan with a coarse partition (for example a
/// service-date column) only if every row's partition is derivable from its
/// departure time by a fixed offset. Otherwise it must not.
pub trait ConnectionStore: Send + Sync + 'static {
    /// Fetch one page of connections.
    fn fetch_page(
        &self,
        query: &PageQuery,
    ) -> impl Future<Output = Result<Vec<Connection>, StoreError>> + Send;

    /// Fetch every connection whose key is exactly `key`.
    ///
    /// More than one row means the dataset breaks key uniqueness; callers
    /// decide what to do about that.
    fn fetch_exact(
        &self,
        key: &ConnectionKey,
    ) -> impl Future<Output = Result<Vec<Connection>, StoreError>> + Send;
}
