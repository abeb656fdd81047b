/// Streaming sample maintenance strategies
/// All strategies accept items one at a time and expose the same
/// snapshot / rate / clear contract the executor relies on
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-stratum reservoir capacity when none is configured
pub const DEFAULT_STRATUM_CAPACITY: usize = 100;

/// A streaming sampling strategy, dispatched by variant
pub enum Sampler<T> {
    SimpleRandom(SimpleRandomSampler<T>),
    Systematic(SystematicSampler<T>),
    Reservoir(ReservoirSampler<T>),
    Stratified(StratifiedSampler<T>),
}

impl<T: Clone> Sampler<T> {
    /// Streaming ingest, amortized O(1)
    pub fn add(&mut self, item: T) {
        match self {
            Sampler::SimpleRandom(s) => s.add(item),
            Sampler::Systematic(s) => s.add(item),
            Sampler::Reservoir(s) => s.add(item),
            Sampler::Stratified(s) => s.add(item),
        }
    }

    /// Snapshot of the current sample population
    pub fn sample(&self) -> Vec<T> {
        match self {
            Sampler::SimpleRandom(s) => s.sample(),
            Sampler::Systematic(s) => s.sample(),
            Sampler::Reservoir(s) => s.sample(),
            Sampler::Stratified(s) => s.sample(),
        }
    }

    /// Sampling rate in [0, 1], used for rescaling extensive aggregates
    pub fn rate(&self) -> f64 {
        match self {
            Sampler::SimpleRandom(s) => s.rate(),
            Sampler::Systematic(s) => s.rate(),
            Sampler::Reservoir(s) => s.rate(),
            Sampler::Stratified(s) => s.rate(),
        }
    }

    /// Reset to the empty initial state
    pub fn clear(&mut self) {
        match self {
            Sampler::SimpleRandom(s) => s.clear(),
            Sampler::Systematic(s) => s.clear(),
            Sampler::Reservoir(s) => s.clear(),
            Sampler::Stratified(s) => s.clear(),
        }
    }
}

/// Simple random sampling: each item is admitted independently
/// with the configured probability
pub struct SimpleRandomSampler<T> {
    rate: f64,
    admitted: Vec<T>,
    rng: StdRng,
}

impl<T: Clone> SimpleRandomSampler<T> {
    pub fn new(rate: f64) -> Self {
        Self::seeded(rate, rand::random())
    }

    /// Deterministic variant for tests
    pub fn seeded(rate: f64, seed: u64) -> Self {
        assert!(
            rate > 0.0 && rate <= 1.0,
            "Sampling rate must be between 0 and 1"
        );
        Self {
            rate,
            admitted: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn add(&mut self, item: T) {
        if self.rng.gen::<f64>() < self.rate {
            self.admitted.push(item);
        }
    }

    pub fn sample(&self) -> Vec<T> {
        self.admitted.clone()
    }

    /// The configured admission probability
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn clear(&mut self) {
        self.admitted.clear();
    }
}

/// Systematic sampling: admits every step-th item
pub struct SystematicSampler<T> {
    step: usize,
    seen: usize,
    admitted: Vec<T>,
}

impl<T: Clone> SystematicSampler<T> {
    pub fn new(step: usize) -> Self {
        assert!(step >= 1, "Step size must be at least 1");
        Self {
            step,
            seen: 0,
            admitted: Vec::new(),
        }
    }

    pub fn add(&mut self, item: T) {
        self.seen += 1;
        if self.seen % self.step == 0 {
            self.admitted.push(item);
        }
    }

    pub fn sample(&self) -> Vec<T> {
        self.admitted.clone()
    }

    pub fn rate(&self) -> f64 {
        1.0 / self.step as f64
    }

    pub fn clear(&mut self) {
        self.admitted.clear();
        self.seen = 0;
    }
}

/// Reservoir sampling (Algorithm R): a fixed-size uniform sample
/// maintained over a stream of unknown length
pub struct ReservoirSampler<T> {
    max_size: usize,
    total_seen: usize,
    buffer: Vec<T>,
    rng: StdRng,
}

impl<T: Clone> ReservoirSampler<T> {
    pub fn new(max_size: usize) -> Self {
        Self::seeded(max_size, rand::random())
    }

    /// Deterministic variant for tests
    pub fn seeded(max_size: usize, seed: u64) -> Self {
        assert!(max_size >= 1, "Reservoir size must be greater than 0");
        Self {
            max_size,
            total_seen: 0,
            buffer: Vec::with_capacity(max_size),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn add(&mut self, item: T) {
        self.total_seen += 1;
        if self.buffer.len() < self.max_size {
            self.buffer.push(item);
        } else {
            let j = self.rng.gen_range(0..self.total_seen);
            if j < self.max_size {
                self.buffer[j] = item;
            }
        }
    }

    pub fn sample(&self) -> Vec<T> {
        self.buffer.clone()
    }

    /// Observed rate: buffer size over total items seen, 0 before any input
    pub fn rate(&self) -> f64 {
        if self.total_seen == 0 {
            return 0.0;
        }
        self.buffer.len() as f64 / self.total_seen as f64
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.total_seen = 0;
    }
}

/// Stratified sampling: the stream is partitioned by a key function and
/// each stratum maintains its own fixed-capacity reservoir
pub struct StratifiedSampler<T> {
    rate: f64,
    capacity: usize,
    key_fn: Box<dyn Fn(&T) -> String>,
    strata: HashMap<String, ReservoirSampler<T>>,
    seed_rng: StdRng,
}

impl<T: Clone> StratifiedSampler<T> {
    pub fn new(rate: f64, capacity: usize, key_fn: Box<dyn Fn(&T) -> String>) -> Self {
        Self::seeded(rate, capacity, key_fn, rand::random())
    }

    /// Deterministic variant for tests
    pub fn seeded(
        rate: f64,
        capacity: usize,
        key_fn: Box<dyn Fn(&T) -> String>,
        seed: u64,
    ) -> Self {
        assert!(
            rate > 0.0 && rate <= 1.0,
            "Sampling rate must be between 0 and 1"
        );
        assert!(capacity >= 1, "Stratum capacity must be greater than 0");
        Self {
            rate,
            capacity,
            key_fn,
            strata: HashMap::new(),
            seed_rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn add(&mut self, item: T) {
        let key = (self.key_fn)(&item);
        let capacity = self.capacity;
        let seed_rng = &mut self.seed_rng;
        self.strata
            .entry(key)
            .or_insert_with(|| ReservoirSampler::seeded(capacity, seed_rng.gen()))
            .add(item);
    }

    /// Concatenates the per-stratum reservoirs; stratum order is unspecified
    pub fn sample(&self) -> Vec<T> {
        let mut result = Vec::new();
        for reservoir in self.strata.values() {
            result.extend(reservoir.sample());
        }
        result
    }

    /// The configured rate, not the observed per-stratum rate; COUNT and
    /// SUM rescaling uses this value even when a saturated stratum makes
    /// the observed rate differ
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn clear(&mut self) {
        self.strata.clear();
    }
}
