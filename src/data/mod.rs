//! Raw series retrieval: FRED client, synthetic samples, and the fetch cache.

pub mod cache;
pub mod fred;
pub mod sample;

pub use cache::{CacheKey, SeriesCache};
pub use fred::FredClient;
pub use sample::generate_sample;
