//! Bloom filter with a compact, versioned binary file format.
//!
//! A filter is sized from the number of items it should hold and a target
//! false positive probability:
//!
//!    * size (bits):  m = ceil(-n * ln(p) / ln(2)^2)
//!    * hash rounds:  k = floor(m / n * ln(2))
//!
//! Both are clamped to at least 1 and stay fixed for the life of the filter.
//!
//! Insertion:
//!     * Hash the item once per round, with the round number appended to it,
//!       and set the bit at `hash % m`.
//! Query:
//!     * If any of the `k` bits is clear the item was never inserted.
//!     * If all are set the item was probably inserted.
//! Persistence:
//!     * Filters are saved as a 12-byte header plus the bit array, see
//!       [`bloom::codec`]. Planning inputs (`n`, `p`) are not stored, so a
//!       loaded filter only knows its size and hash count.
//!
//! ```
//! use ccbloom::bloom::{BloomFilter, BloomFilterOps};
//!
//! let mut filter = BloomFilter::with_rate(1000, 0.01).unwrap();
//! filter.insert(b"apple");
//! assert!(filter.contains(b"apple"));
//!
//! let mut bytes = Vec::new();
//! filter.save(&mut bytes, 1).unwrap();
//! let loaded = BloomFilter::load(bytes.as_slice(), 1).unwrap();
//! assert!(loaded.contains(b"apple"));
//! ```

pub mod bloom;
pub mod common;
#[cfg(feature = "cli")]
pub mod config;
mod hash;
pub mod wordlist;

pub use bloom::{
    BloomError, BloomFilter, BloomFilterConfig, BloomFilterConfigBuilder,
    BloomResult,
};
pub use hash::{bit_index, optimal_bit_vector_size, optimal_num_hashes};
