/// HyperLogLog for approximate distinct counting
/// Fixed 1024-register layout (precision 10), error around 3.3%
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const NUM_REGISTERS: usize = 1024;
const INDEX_BITS: u32 = 10;

pub struct HyperLogLog {
    registers: Vec<u8>,
}

impl HyperLogLog {
    pub fn new() -> Self {
        Self {
            registers: vec![0; NUM_REGISTERS],
        }
    }

    pub fn add(&mut self, item: &str) {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        let hash = hasher.finish();

        // Top bits select the register, the rest feed the zero count
        let register = (hash >> (64 - INDEX_BITS)) as usize;
        let remaining = hash << INDEX_BITS;
        let zeros = if remaining == 0 {
            (64 - INDEX_BITS) as u8
        } else {
            remaining.leading_zeros() as u8
        };
        self.registers[register] = self.registers[register].max(zeros);
    }

    /// Harmonic-mean estimate with small- and large-range corrections
    pub fn estimate(&self) -> f64 {
        let m = NUM_REGISTERS as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 1.0 / (1u64 << r) as f64)
            .sum();

        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let mut estimate = alpha * m * m / sum;

        if estimate <= 2.5 * m {
            let zeros = self.registers.iter().filter(|&&r| r == 0).count();
            if zeros != 0 {
                estimate = m * (m / zeros as f64).ln();
            }
        } else if estimate > (1u64 << 32) as f64 / 30.0 {
            let two_pow_32 = (1u64 << 32) as f64;
            estimate = -two_pow_32 * (1.0 - estimate / two_pow_32).ln();
        }

        estimate
    }

    pub fn clear(&mut self) {
        self.registers.fill(0);
    }
}

impl Default for HyperLogLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sketch_estimates_zero() {
        let hll = HyperLogLog::new();
        assert_eq!(hll.estimate(), 0.0);
    }

    #[test]
    fn estimate_tracks_distinct_count() {
        let mut hll = HyperLogLog::new();
        for i in 0..10_000 {
            hll.add(&format!("item-{}", i));
        }
        let estimate = hll.estimate();
        assert!(
            (estimate - 10_000.0).abs() / 10_000.0 < 0.15,
            "estimate {} too far from 10000",
            estimate
        );
    }

    #[test]
    fn duplicates_do_not_inflate_the_estimate() {
        let mut hll = HyperLogLog::new();
        for _ in 0..1000 {
            hll.add("same");
        }
        assert!(hll.estimate() < 10.0);
    }

    #[test]
    fn clear_resets_the_estimate() {
        let mut hll = HyperLogLog::new();
        for i in 0..100 {
            hll.add(&format!("item-{}", i));
        }
        hll.clear();
        assert_eq!(hll.estimate(), 0.0);
    }
}
