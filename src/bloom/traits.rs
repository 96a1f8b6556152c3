pub trait BloomFilterOps {
    /// Sets the bit for every hash round of `item`.
    fn insert(&mut self, item: &[u8]);
    /// `false` means definitely absent, `true` means probably present.
    fn contains(&self, item: &[u8]) -> bool;
    /// Resets all bits; size and hash count are kept.
    fn clear(&mut self);
}

pub trait BloomFilterStats {
    fn size(&self) -> usize;
    fn hash_count(&self) -> usize;
    fn insert_count(&self) -> usize;
    fn bits_set(&self) -> usize;
}

pub trait BulkBloomFilterOps {
    fn insert_bulk(&mut self, items: &[&[u8]]);
    fn contains_bulk(&self, items: &[&[u8]]) -> Vec<bool>;
}
