pub mod catalog;
pub mod config;
pub mod preload;
pub mod rate_limit;
pub mod service;
pub mod source;
pub mod stream;
pub mod testing;

pub use catalog::{Catalog, CatalogError, CatalogItem, FeedAggregator, RankInfo};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError,
};
pub use preload::Preloader;
pub use rate_limit::RateLimiter;
pub use service::{CatalogService, ServiceStats};
pub use source::{
    HttpSourceClient, RawCatalogRecord, RawEpisodeRecord, SourceClient, SourceError,
};
pub use stream::{Episode, Rendition, ResolveError, StreamResolver};
