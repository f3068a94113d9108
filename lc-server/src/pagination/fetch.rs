//! Fetching one page of connections for a resolved anchor.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Connection;
use crate::store::{ConnectionStore, PageQuery, StoreError};

use super::anchor::AnchorDescriptor;
use super::config::PaginationConfig;

/// An ordered, bounded page of connections.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    items: Vec<Connection>,
}

impl Page {
    pub fn new(items: Vec<Connection>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Connection] {
        &self.items
    }

    /// The last connection, which continuation links are anchored on.
    pub fn boundary(&self) -> Option<&Connection> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Builds page queries and runs them against the injected store.
pub struct PageFetcher<S> {
    store: Arc<S>,
    page_size: usize,
}

impl<S: ConnectionStore> PageFetcher<S> {
    pub fn new(store: Arc<S>, config: &PaginationConfig) -> Self {
        Self {
            store,
            page_size: config.page_size(),
        }
    }

    /// The store query for an anchor.
    pub fn query_for(&self, anchor: &AnchorDescriptor) -> PageQuery {
        PageQuery {
            direction: anchor.direction,
            anchor_time: anchor.anchor_time,
            limit: self.page_size,
        }
    }

    /// Fetch the page for an anchor.
    ///
    /// A store returning more rows than asked for is cut down to the page
    /// size.
    pub async fn fetch(&self, anchor: &AnchorDescriptor) -> Result<Page, StoreError> {
        let query = self.query_for(anchor);
        let mut rows = self.store.fetch_page(&query).await?;

        if rows.len() > query.limit {
            warn!(
                returned = rows.len(),
                limit = query.limit,
                "store exceeded page size, truncating"
            );
            rows.truncate(query.limit);
        }

        debug!(direction = %query.direction, count = rows.len(), "fetched page");
        Ok(Page::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionKey, Stop};
    use crate::pagination::{ConflictPolicy, Direction, QueryParams};
    use crate::store::InMemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Mutex;

    fn at(mins: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 9, 8, 0, 0).unwrap() + Duration::minutes(mins)
    }

    fn conn(trip: &str, dep: i64) -> Connection {
        Connection {
            trip_id: trip.into(),
            route_id: None,
            from_stop: Stop::new("a"),
            t_departure: at(dep),
            departure_delay: None,
            to_stop: Stop::new("b"),
            t_arrival: at(dep + 5),
            arrival_delay: None,
            pickup_type: None,
            drop_off_type: None,
        }
    }

    fn anchor(direction: Direction, mins: i64) -> AnchorDescriptor {
        AnchorDescriptor {
            direction,
            anchor_time: at(mins),
            extra_params: QueryParams::new(),
        }
    }

    /// Store that ignores the limit and records the queries it saw.
    struct GreedyStore {
        rows: Vec<Connection>,
        queries: Mutex<Vec<PageQuery>>,
    }

    impl ConnectionStore for GreedyStore {
        async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<Connection>, StoreError> {
            self.queries.lock().unwrap().push(*query);
            Ok(self.rows.clone())
        }

        async fn fetch_exact(&self, _key: &ConnectionKey) -> Result<Vec<Connection>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn page_bounded_by_config() {
        let rows: Vec<_> = (0..25).map(|i| conn(&format!("t{i:02}"), i)).collect();
        let store = Arc::new(InMemoryStore::new(rows));
        let fetcher = PageFetcher::new(store, &PaginationConfig::default());

        let page = fetcher.fetch(&anchor(Direction::Departure, 0)).await.unwrap();
        assert_eq!(page.len(), 10);
        assert_eq!(page.boundary().map(|c| c.trip_id.as_str()), Some("t09"));
    }

    #[tokio::test]
    async fn greedy_store_is_truncated() {
        let rows: Vec<_> = (0..8).map(|i| conn(&format!("t{i}"), i)).collect();
        let store = Arc::new(GreedyStore {
            rows,
            queries: Mutex::new(Vec::new()),
        });
        let config = PaginationConfig::new(3, ConflictPolicy::default()).unwrap();
        let fetcher = PageFetcher::new(store.clone(), &config);

        let page = fetcher.fetch(&anchor(Direction::Arrival, 60)).await.unwrap();
        assert_eq!(page.len(), 3);

        let queries = store.queries.lock().unwrap();
        assert_eq!(
            *queries,
            vec![PageQuery {
                direction: Direction::Arrival,
                anchor_time: at(60),
                limit: 3,
            }]
        );
    }

    #[tokio::test]
    async fn empty_page_has_no_boundary() {
        let fetcher = PageFetcher::new(
            Arc::new(InMemoryStore::default()),
            &PaginationConfig::default(),
        );
        let page = fetcher.fetch(&anchor(Direction::Departure, 0)).await.unwrap();
        assert!(page.is_empty());
        assert!(page.boundary().is_none());
    }

    #[test]
    fn page_accessors() {
        let page = Page::new(vec![conn("a", 0), conn("b", 1)]);
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.boundary().map(|c| c.trip_id.as_str()), Some("b"));
        assert_eq!(page.items().len(), 2);
    }
}
