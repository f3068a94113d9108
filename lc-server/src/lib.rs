//! Linked Connections server.
//!
//! Publishes a time-ordered dataset of public transport connections as a
//! hypermedia feed that crawlers can page through without any session
//! state on the server.

pub mod codec;
pub mod config;
pub mod domain;
pub mod logging;
pub mod lookup;
pub mod pagination;
pub mod store;
pub mod web;
