use super::{
    BloomError, BloomFilterConfig, BloomFilterOps, BloomFilterStats, BloomParams,
    BloomResult, BulkBloomFilterOps,
};
use crate::hash::bit_index;
use bitvec::{bitvec, order::Lsb0, vec::BitVec};
use serde::Serialize;
use tracing::debug;

/// A fixed-size Bloom filter backed by a packed bit vector.
///
/// `size` and `hash_count` are fixed for the lifetime of the filter. The
/// filter does no internal locking; share it behind a lock if several threads
/// need to write.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilter {
    /// Planning inputs. `None` when the filter was loaded from bytes, since
    /// the file format does not record them.
    config: Option<BloomFilterConfig>,
    params: BloomParams,
    bits: BitVec<usize, Lsb0>,
    insert_count: usize,
}

/// Snapshot of a filter's shape and fill, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    pub size: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub fill_ratio: f64,
    pub estimated_false_positive_rate: f64,
    pub estimated_count: f64,
    pub config: Option<BloomFilterConfig>,
}

impl BloomFilter {
    pub fn new(config: BloomFilterConfig) -> BloomResult<Self> {
        let params = BloomParams::try_from(&config)?;
        debug!(
            expected_items = config.expected_items,
            false_positive_probability = config.false_positive_probability,
            size = params.size,
            hash_count = params.hash_count,
            "creating bloom filter"
        );

        Ok(Self {
            config: Some(config),
            params,
            bits: bitvec![usize, Lsb0; 0; params.size],
            insert_count: 0,
        })
    }

    /// Shorthand for building a config and calling [`BloomFilter::new`].
    pub fn with_rate(
        expected_items: usize,
        false_positive_probability: f64,
    ) -> BloomResult<Self> {
        Self::new(BloomFilterConfig {
            expected_items,
            false_positive_probability,
        })
    }

    /// Rebuilds a filter from decoded parts. `bits.len()` must equal `size`.
    pub(crate) fn from_parts(
        size: usize,
        hash_count: usize,
        bits: BitVec<usize, Lsb0>,
    ) -> BloomResult<Self> {
        if size == 0 {
            return Err(BloomError::InvalidHeader("size must be > 0".into()));
        }
        if hash_count == 0 {
            return Err(BloomError::InvalidHeader(
                "hash count must be > 0".into(),
            ));
        }
        debug_assert_eq!(bits.len(), size);

        Ok(Self {
            config: None,
            params: BloomParams { size, hash_count },
            bits,
            insert_count: 0,
        })
    }

    pub fn config(&self) -> Option<&BloomFilterConfig> {
        self.config.as_ref()
    }

    pub fn params(&self) -> BloomParams {
        self.params
    }

    /// Planned item count, or 0 when unknown (loaded filters).
    pub fn expected_items(&self) -> usize {
        self.config.as_ref().map_or(0, |c| c.expected_items)
    }

    /// Planned false positive probability, or 0.0 when unknown (loaded filters).
    pub fn false_positive_probability(&self) -> f64 {
        self.config
            .as_ref()
            .map_or(0.0, |c| c.false_positive_probability)
    }

    /// Bit positions touched by `item`, one per hash round.
    pub fn indices<'a>(
        &'a self,
        item: &'a [u8],
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.params.hash_count)
            .map(move |round| bit_index(item, round, self.params.size))
    }

    /// Whether the bit at `index % size` is set.
    pub fn is_set(&self, index: usize) -> bool {
        self.bits[index % self.params.size]
    }

    pub(crate) fn bits(&self) -> &BitVec<usize, Lsb0> {
        &self.bits
    }

    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.params.size as f64
    }

    /// False positive rate implied by the current fill.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.params.hash_count as i32)
    }

    /// Estimates how many distinct items were inserted, from the fill ratio.
    pub fn estimated_count(&self) -> f64 {
        let bits_set = self.bits_set() as f64;
        let m = self.params.size as f64;
        let k = self.params.hash_count as f64;

        if bits_set >= m {
            return f64::INFINITY;
        }

        -(m / k) * (1.0 - bits_set / m).ln()
    }

    /// Bytes used by the in-memory bit storage.
    pub fn memory_usage(&self) -> usize {
        self.bits.as_raw_slice().len() * std::mem::size_of::<usize>()
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            size: self.params.size,
            hash_count: self.params.hash_count,
            bits_set: self.bits_set(),
            fill_ratio: self.fill_ratio(),
            estimated_false_positive_rate: self.estimated_false_positive_rate(),
            estimated_count: self.estimated_count(),
            config: self.config.clone(),
        }
    }
}

impl BloomFilterOps for BloomFilter {
    fn insert(&mut self, item: &[u8]) {
        for round in 0..self.params.hash_count {
            let idx = bit_index(item, round, self.params.size);
            self.bits.set(idx, true);
        }
        self.insert_count += 1;
    }

    fn contains(&self, item: &[u8]) -> bool {
        (0..self.params.hash_count)
            .all(|round| self.bits[bit_index(item, round, self.params.size)])
    }

    fn clear(&mut self) {
        self.bits.fill(false);
        self.insert_count = 0;
    }
}

impl BulkBloomFilterOps for BloomFilter {
    fn insert_bulk(&mut self, items: &[&[u8]]) {
        for item in items {
            self.insert(item);
        }
    }

    fn contains_bulk(&self, items: &[&[u8]]) -> Vec<bool> {
        items.iter().map(|item| self.contains(item)).collect()
    }
}

impl BloomFilterStats for BloomFilter {
    fn size(&self) -> usize {
        self.params.size
    }

    fn hash_count(&self) -> usize {
        self.params.hash_count
    }

    fn insert_count(&self) -> usize {
        self.insert_count
    }

    fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }
}
