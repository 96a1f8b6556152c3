use ccbloom::bit_index;
use ccbloom::bloom::{
    BloomFilter, BloomFilterConfigBuilder, BloomFilterOps, BloomFilterStats,
    BulkBloomFilterOps,
};
use rand::{Rng, distr::Alphanumeric};
use std::collections::HashSet;

// Helper function to create a filter for testing
fn create_test_filter(expected_items: usize, fpr: f64) -> BloomFilter {
    let config = BloomFilterConfigBuilder::default()
        .expected_items(expected_items)
        .false_positive_probability(fpr)
        .build()
        .expect("Failed to build test config");

    BloomFilter::new(config).expect("Failed to create test filter")
}

// Helper function to generate consistent test data
fn generate_test_items(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("test_item_{:06}", i).into_bytes())
        .collect()
}

fn generate_random_strings(count: usize, len: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(len)
                .map(char::from)
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod sizing_tests {
    use super::*;

    #[test]
    fn test_reference_sizes() {
        let filter = create_test_filter(1000, 0.1);
        assert_eq!(filter.size(), 4793);
        assert_eq!(filter.hash_count(), 3);

        let filter = create_test_filter(943_532, 0.0001);
        assert_eq!(filter.size(), 18_087_619);
        assert_eq!(filter.hash_count(), 13);
    }

    #[test]
    fn test_small_filter_sizes() {
        let filter = create_test_filter(5, 0.5);
        assert_eq!(filter.size(), 8);
        assert_eq!(filter.hash_count(), 1);
    }

    #[test]
    fn test_loose_rate_clamps_hash_count() {
        let filter = create_test_filter(1, 0.99);
        assert_eq!(filter.size(), 1);
        assert_eq!(filter.hash_count(), 1);
    }

    #[test]
    fn test_planning_inputs_are_kept() {
        let filter = create_test_filter(1000, 0.01);
        assert_eq!(filter.expected_items(), 1000);
        assert_eq!(filter.false_positive_probability(), 0.01);
        assert!(filter.config().is_some());
    }
}

#[cfg(test)]
mod basic_operations_tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut filter = create_test_filter(1000, 0.01);

        let item = b"hello_world";
        filter.insert(item);
        assert!(
            filter.contains(item),
            "Item should be found after insertion"
        );
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = create_test_filter(1000, 0.01);
        let test_items = generate_test_items(1000);

        for item in &test_items {
            filter.insert(item);
        }

        for item in &test_items {
            assert!(
                filter.contains(item),
                "No false negatives allowed for item: {:?}",
                String::from_utf8_lossy(item)
            );
        }
        assert_eq!(filter.insert_count(), test_items.len());
    }

    #[test]
    fn test_no_false_negatives_when_overfilled() {
        let mut filter = create_test_filter(10, 0.1);
        let words = generate_random_strings(500, 12);

        for word in &words {
            filter.insert(word.as_bytes());
        }
        for word in &words {
            assert!(filter.contains(word.as_bytes()));
        }
    }

    #[test]
    fn test_empty_filter_behavior() {
        let filter = create_test_filter(1000, 0.01);

        assert!(
            !filter.contains(b"anything"),
            "Empty filter should not contain any items"
        );
        assert_eq!(filter.bits_set(), 0);
        assert_eq!(filter.insert_count(), 0);
        assert_eq!(filter.estimated_count(), 0.0);
    }

    #[test]
    fn test_clear_functionality() {
        let mut filter = create_test_filter(1000, 0.01);
        let test_items = generate_test_items(5);

        for item in &test_items {
            filter.insert(item);
        }
        assert!(filter.bits_set() > 0);

        filter.clear();

        assert_eq!(filter.bits_set(), 0);
        assert_eq!(filter.insert_count(), 0);
        assert_eq!(filter.size(), 9586);
        assert_eq!(filter.hash_count(), 6);
        for item in &test_items {
            assert!(
                !filter.contains(item),
                "Items should not be found after clear"
            );
        }

        let new_item = b"new_item_after_clear";
        filter.insert(new_item);
        assert!(
            filter.contains(new_item),
            "Filter should work normally after clear"
        );
    }

    #[test]
    fn test_duplicate_insertions_do_not_change_bits() {
        let mut filter = create_test_filter(1000, 0.01);
        filter.insert(b"duplicate_item");
        let bits_after_first = filter.bits_set();

        for _ in 0..4 {
            filter.insert(b"duplicate_item");
        }

        assert_eq!(filter.bits_set(), bits_after_first);
        assert_eq!(filter.insert_count(), 5);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let items = generate_test_items(50);

        let mut forward = create_test_filter(100, 0.01);
        for item in &items {
            forward.insert(item);
        }

        let mut backward = create_test_filter(100, 0.01);
        for item in items.iter().rev() {
            backward.insert(item);
        }

        let forward_bits: Vec<bool> =
            (0..forward.size()).map(|i| forward.is_set(i)).collect();
        let backward_bits: Vec<bool> =
            (0..backward.size()).map(|i| backward.is_set(i)).collect();
        assert_eq!(forward_bits, backward_bits);
    }
}

#[cfg(test)]
mod bit_level_tests {
    use super::*;

    #[test]
    fn test_insert_sets_exactly_hashed_bits() {
        let mut filter = create_test_filter(5, 0.5);
        filter.insert(b"apple");

        let expected: HashSet<usize> = (0..filter.hash_count())
            .map(|round| bit_index(b"apple", round, filter.size()))
            .collect();
        assert_eq!(expected, HashSet::from([3]));

        for idx in 0..filter.size() {
            assert_eq!(filter.is_set(idx), expected.contains(&idx));
        }
        assert!(filter.contains(b"apple"));
    }

    #[test]
    fn test_indices_match_hash_rounds() {
        let filter = create_test_filter(1000, 0.0001);
        let indices: Vec<usize> = filter.indices(b"apple").collect();
        assert_eq!(indices.len(), 13);
        assert_eq!(&indices[..4], &[637, 13399, 15961, 8656]);
    }

    #[test]
    fn test_is_set_wraps_index() {
        let mut filter = create_test_filter(5, 0.5);
        filter.insert(b"apple");
        assert!(filter.is_set(3));
        assert!(filter.is_set(3 + filter.size()));
    }

    #[test]
    fn test_bits_never_reset_by_insert() {
        let mut filter = create_test_filter(20, 0.1);
        let mut previous = vec![false; filter.size()];

        for item in generate_test_items(100) {
            filter.insert(&item);
            for (idx, was_set) in previous.iter_mut().enumerate() {
                let now_set = filter.is_set(idx);
                assert!(!*was_set || now_set, "bit {idx} was reset");
                *was_set = now_set;
            }
        }
    }
}

#[cfg(test)]
mod statistics_tests {
    use super::*;

    #[test]
    fn test_false_positive_rate_near_target() {
        let mut filter = create_test_filter(10_000, 0.01);
        for item in generate_test_items(10_000) {
            filter.insert(&item);
        }

        let false_positives = (0..10_000)
            .filter(|i| filter.contains(format!("absent_item_{i}").as_bytes()))
            .count();
        let rate = false_positives as f64 / 10_000.0;

        assert!(rate < 0.03, "Observed false positive rate too high: {rate}");
        assert!(filter.estimated_false_positive_rate() < 0.03);
    }

    #[test]
    fn test_estimated_count() {
        let mut filter = create_test_filter(10_000, 0.01);
        for item in generate_test_items(5_000) {
            filter.insert(&item);
        }

        let estimate = filter.estimated_count();
        assert!(
            (4_500.0..5_500.0).contains(&estimate),
            "Estimate {estimate} too far from 5000"
        );
    }

    #[test]
    fn test_saturated_filter_estimate_is_infinite() {
        let mut filter = create_test_filter(1, 0.99);
        filter.insert(b"x");
        assert_eq!(filter.fill_ratio(), 1.0);
        assert!(filter.estimated_count().is_infinite());
    }

    #[test]
    fn test_summary() {
        let mut filter = create_test_filter(1000, 0.1);
        filter.insert(b"apple");

        let summary = filter.summary();
        assert_eq!(summary.size, 4793);
        assert_eq!(summary.hash_count, 3);
        assert!(summary.bits_set >= 1 && summary.bits_set <= 3);
        assert_eq!(summary.config.map(|c| c.expected_items), Some(1000));
    }

    #[test]
    fn test_memory_usage_is_packed() {
        let filter = create_test_filter(943_532, 0.0001);
        // Packed storage is about size / 8 bytes, rounded up to whole words.
        assert!(filter.memory_usage() < filter.size() / 8 + 16);
    }
}

#[cfg(test)]
mod bulk_operations_tests {
    use super::*;

    #[test]
    fn test_bulk_insert_and_contains() {
        let mut filter = create_test_filter(100, 0.01);
        let items: [&[u8]; 3] = [b"one", b"two", b"three"];

        filter.insert_bulk(&items);

        assert_eq!(filter.contains_bulk(&items), vec![true, true, true]);
        assert_eq!(filter.insert_count(), 3);
    }
}
