//! Pagination configuration.

use crate::config::ConfigError;

/// Number of connections per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size accepted.
pub const MAX_PAGE_SIZE: usize = 1000;

/// What to do when a request carries both a departure and an arrival anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Use the departure anchor and ignore the arrival anchor.
    #[default]
    PreferDeparture,

    /// Reject the request.
    Reject,
}

/// Configuration for the pagination engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    page_size: usize,
    conflicting_anchors: ConflictPolicy,
}

impl PaginationConfig {
    /// Create a validated configuration.
    ///
    /// `page_size` must be between 1 and [`MAX_PAGE_SIZE`].
    pub fn new(page_size: usize, conflicting_anchors: ConflictPolicy) -> Result<Self, ConfigError> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            conflicting_anchors,
        })
    }

    /// Maximum number of connections in one page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn conflicting_anchors(&self) -> ConflictPolicy {
        self.conflicting_anchors
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            conflicting_anchors: ConflictPolicy::PreferDeparture,
        }
    }
}
