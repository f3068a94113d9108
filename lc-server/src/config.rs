//! Server configuration from the command line and environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::pagination::{ConflictPolicy, DEFAULT_PAGE_SIZE, PaginationConfig};

/// Errors from building the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("page size must be between 1 and 1000, got {0}")]
    InvalidPageSize(usize),

    #[error("base URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

/// Serve a GTFS-derived connections dataset as Linked Connections.
#[derive(Debug, Clone, Parser)]
#[command(name = "lc-server", version, about)]
pub struct Args {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Public base URL used in links. Defaults to http://localhost:<port>.
    #[arg(long, env = "LC_BASE_URL")]
    pub base_url: Option<String>,

    /// JSON file holding an array of connections.
    #[arg(long, env = "LC_DATA")]
    pub data: Option<PathBuf>,

    /// Connections per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Reject requests giving both departureTime and arrivalTime instead of
    /// preferring departureTime.
    #[arg(long)]
    pub reject_conflicting_anchors: bool,
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,

    /// Base URL of the public API, without a trailing slash.
    pub base_url: String,

    /// Dataset to serve. `None` serves an empty feed.
    pub data_path: Option<PathBuf>,

    pub pagination: PaginationConfig,
}

impl ServerConfig {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let policy = if args.reject_conflicting_anchors {
            ConflictPolicy::Reject
        } else {
            ConflictPolicy::PreferDeparture
        };
        let base_url = args
            .base_url
            .unwrap_or_else(|| format!("http://localhost:{}", args.port));

        Ok(Self {
            bind: SocketAddr::new(args.host, args.port),
            base_url: normalize_base_url(&base_url)?,
            data_path: args.data,
            pagination: PaginationConfig::new(args.page_size, policy)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: "http://localhost:3000".to_string(),
            data_path: None,
            pagination: PaginationConfig::default(),
        }
    }
}

fn normalize_base_url(url: &str) -> Result<String, ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(url.to_string()));
    }
    Ok(url.trim_end_matches('/').to_string())
}
