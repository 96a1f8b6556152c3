use super::{BloomError, BloomResult};
use crate::hash::{optimal_bit_vector_size, optimal_num_hashes};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Largest bit count the file header can describe.
pub const MAX_SIZE: usize = u32::MAX as usize;
/// Largest hash round count the file header can describe.
pub const MAX_HASH_COUNT: usize = u16::MAX as usize;

/// Planning inputs for a fresh filter.
#[derive(Clone, Debug, PartialEq, Builder, Serialize, Deserialize)]
#[builder(pattern = "owned")]
pub struct BloomFilterConfig {
    /// Number of items the filter is sized for
    #[builder(default = "1_000_000")]
    pub expected_items: usize,

    /// Target false positive probability, strictly between 0 and 1
    #[builder(default = "0.0001")]
    pub false_positive_probability: f64,
}

impl BloomFilterConfig {
    pub fn validate(&self) -> BloomResult<()> {
        if self.expected_items == 0 {
            return Err(BloomError::InvalidConfig(
                "Expected items must be > 0".into(),
            ));
        }
        // Written as a negated range check so NaN is rejected too.
        if !(self.false_positive_probability > 0.0
            && self.false_positive_probability < 1.0)
        {
            return Err(BloomError::InvalidConfig(format!(
                "False positive probability must be between 0 and 1, got {}",
                self.false_positive_probability
            )));
        }
        Ok(())
    }
}

/// Derived parameters calculated from BloomFilterConfig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomParams {
    pub size: usize,
    pub hash_count: usize,
}

impl TryFrom<&BloomFilterConfig> for BloomParams {
    type Error = BloomError;

    fn try_from(config: &BloomFilterConfig) -> BloomResult<Self> {
        config.validate()?;

        let size = optimal_bit_vector_size(
            config.expected_items,
            config.false_positive_probability,
        );
        if size > MAX_SIZE {
            return Err(BloomError::InvalidConfig(format!(
                "Filter needs {size} bits, more than the {MAX_SIZE} a file can hold"
            )));
        }

        let hash_count = optimal_num_hashes(config.expected_items, size);
        if hash_count > MAX_HASH_COUNT {
            return Err(BloomError::InvalidConfig(format!(
                "Filter needs {hash_count} hash rounds, more than {MAX_HASH_COUNT}"
            )));
        }

        Ok(Self { size, hash_count })
    }
}
