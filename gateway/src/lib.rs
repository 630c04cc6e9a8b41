//! Image Gateway service
//!
//! Accepts image uploads, stores them in an object store under a random
//! identifier and serves them back with immutable caching headers.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

pub mod edge_cache;
pub mod routes;
pub mod server;
pub mod state;

/// Configuration, errors and extractors
pub mod types;
