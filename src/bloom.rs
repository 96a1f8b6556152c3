//! Standard Bloom Filter implementation
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod traits;

pub use codec::{Layout, load, load_from_path, save, save_to_path, save_with_layout};
pub use config::{BloomFilterConfig, BloomFilterConfigBuilder, BloomParams};
pub use error::{BloomError, BloomResult};
pub use filter::{BloomFilter, FilterSummary};
pub use traits::{BloomFilterOps, BloomFilterStats, BulkBloomFilterOps};
