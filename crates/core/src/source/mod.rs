//! Remote source abstraction.
//!
//! This module provides a `SourceClient` trait for the upstream drama API,
//! with one HTTP implementation. Everything above it (aggregation, stream
//! resolution, preloading) only ever talks to the trait.

mod http;
mod types;

pub use http::HttpSourceClient;
pub use types::*;
