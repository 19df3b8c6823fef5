//! Congress.gov API client.
//!
//! This crate covers the network side of the ingestion pipeline: a transport
//! abstraction over the Congress.gov v3 REST API, a fixed-delay rate limiter,
//! a paginated list fetcher, and a detail enricher for abbreviated list
//! projections.
//!
//! # Architecture
//!
//! - [`transport`]: `Transport` trait and the reqwest-backed client
//! - [`limiter`]: fixed-delay throttle applied before every request
//! - [`page`]: pagination traversal to completion or a page cap
//! - [`detail`]: secondary fetch that completes abbreviated records
//! - [`endpoint`]: list/detail endpoint construction
//! - [`error`]: error types and Result alias

pub mod detail;
pub mod endpoint;
pub mod error;
pub mod limiter;
pub mod page;
pub mod transport;

pub use error::{ClientError, Result};
pub use limiter::RateLimiter;
pub use page::fetch_paginated;
pub use transport::{CongressClient, Transport};
