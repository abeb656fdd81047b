/// Bloom filter for approximate membership testing
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const NUM_HASH_FUNCTIONS: usize = 3;
const DEFAULT_NUM_BITS: usize = 10_000;

pub struct BloomFilter {
    bits: Vec<bool>,
    num_bits: usize,
}

impl BloomFilter {
    pub fn new(num_bits: usize) -> Self {
        Self {
            bits: vec![false; num_bits],
            num_bits,
        }
    }

    fn index(&self, item: &str, hash_function: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        hash_function.hash(&mut hasher);
        item.hash(&mut hasher);
        hasher.finish() as usize % self.num_bits
    }

    pub fn add(&mut self, item: &str) {
        for i in 0..NUM_HASH_FUNCTIONS {
            let index = self.index(item, i);
            self.bits[index] = true;
        }
    }

    /// True when every probed bit is set; never false for an added item
    pub fn might_contain(&self, item: &str) -> bool {
        (0..NUM_HASH_FUNCTIONS).all(|i| self.bits[self.index(item, i)])
    }

    /// (set bits / total bits) ^ number of probes
    pub fn false_positive_rate(&self) -> f64 {
        let set_bits = self.bits.iter().filter(|&&b| b).count();
        (set_bits as f64 / self.num_bits as f64).powi(NUM_HASH_FUNCTIONS as i32)
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_BITS)
    }
}
