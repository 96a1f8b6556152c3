use fnv::FnvHasher;
use std::hash::Hasher;

/// Maps `(item, round)` to a bit index in `[0, size)`.
///
/// One FNV-1a 64-bit pass runs over the item bytes followed by the ASCII
/// decimal digits of `round`, then the MurmurHash3 64-bit finalizer spreads
/// the result so rounds of the same item land independently.
///
/// The output is part of the on-disk contract: filters saved with one hash
/// can only be queried with the same hash, so this function must not change
/// without a new file format version.
///
/// `size` must be non-zero. Every `BloomFilter` guarantees that.
pub fn bit_index(item: &[u8], round: usize, size: usize) -> usize {
    let mut hasher = FnvHasher::default();
    hasher.write(item);
    hasher.write(round.to_string().as_bytes());
    (fmix64(hasher.finish()) % size as u64) as usize
}

// FNV-1a alone leaves the trailing round digits in the low bits only.
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Optimal number of bits for `n` items at false positive rate `fpr`:
/// `ceil(-n * ln(fpr) / ln(2)^2)`, never less than 1.
pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    let m = ((-(n as f64) * fpr.ln()) / (ln2 * ln2)).ceil() as usize;
    m.max(1)
}

/// Optimal number of hash rounds for `n` items in `m` bits:
/// `floor(m / n * ln(2))`, never less than 1.
pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    let k = ((m as f64 / n as f64) * std::f64::consts::LN_2).floor() as usize;
    k.max(1)
}
