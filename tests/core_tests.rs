//! Sampler and sketch behaviour through the public API
//!
//! Run with: `cargo test --test core_tests`

use approx_query_engine::approx::{BloomFilter, CountMinSketch, ExponentialHistogram, HyperLogLog};
use approx_query_engine::core::sampling::{ReservoirSampler, SimpleRandomSampler};
use approx_query_engine::DataRow;

#[test]
fn reservoir_sample_size_is_exact() {
    let mut sampler = ReservoirSampler::new(100);
    for i in 0..1000u32 {
        sampler.add(i);
    }
    assert_eq!(sampler.sample().len(), 100);
}

#[test]
fn simple_random_sample_size_is_concentrated() {
    let mut sampler = SimpleRandomSampler::new(0.1);
    for i in 0..1000 {
        sampler.add(DataRow::from_pairs([("id", i.to_string())]));
    }
    let size = sampler.sample().len();
    assert!(size > 50 && size < 150, "sample size {} out of range", size);
}

#[test]
fn hyperloglog_estimates_cardinality() {
    let mut hll = HyperLogLog::new();
    for i in 0..1000 {
        hll.add(&format!("user-{}", i));
    }
    let estimate = hll.estimate();
    assert!(
        estimate > 800.0 && estimate < 1200.0,
        "estimate {} too far from 1000",
        estimate
    );
}

#[test]
fn count_min_overestimates_at_worst() {
    let mut sketch = CountMinSketch::new();
    for _ in 0..250 {
        sketch.add("hot-key", 1);
    }
    assert!(sketch.estimate("hot-key") >= 250);
}

#[test]
fn bloom_filter_has_no_false_negatives() {
    let mut filter = BloomFilter::default();
    for i in 0..500 {
        filter.add(&format!("member-{}", i));
    }
    for i in 0..500 {
        assert!(filter.might_contain(&format!("member-{}", i)));
    }
    assert!(filter.false_positive_rate() < 0.01);
}

#[test]
fn exponential_histogram_counts_the_window() {
    let mut histogram = ExponentialHistogram::new(1000, 0.01);
    for t in 0..100u64 {
        histogram.add(t * 10, 1);
    }
    assert_eq!(histogram.estimate(990), 100);
}
