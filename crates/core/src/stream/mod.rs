//! Stream URL resolution and caching.
//!
//! Turns a catalog item id into a directly playable URL: episode metadata is
//! fetched through the shared rate limiter, the best rendition is selected,
//! and the result is cached. Concurrent requests for the same id share one
//! in-flight resolution.

mod resolver;
mod select;
mod types;

pub use resolver::StreamResolver;
pub use select::{best_url, HIGH_QUALITY, STANDARD_QUALITY};
pub use types::*;
