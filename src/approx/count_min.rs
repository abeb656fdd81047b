/// Count-Min sketch for approximate frequency estimation
/// Estimates never undercount; collisions only inflate them
use rand::Rng;

const DEFAULT_WIDTH: usize = 2048;
const DEFAULT_DEPTH: usize = 5;

pub struct CountMinSketch {
    cells: Vec<Vec<i64>>,
    seeds: Vec<u32>,
    width: usize,
    depth: usize,
}

impl CountMinSketch {
    pub fn new() -> Self {
        Self::with_dimensions(DEFAULT_WIDTH, DEFAULT_DEPTH)
    }

    /// width: buckets per row, depth: number of hashed rows
    pub fn with_dimensions(width: usize, depth: usize) -> Self {
        let mut rng = rand::thread_rng();
        let seeds = (0..depth).map(|_| rng.gen()).collect();
        Self {
            cells: vec![vec![0; width]; depth],
            seeds,
            width,
            depth,
        }
    }

    /// Polynomial rolling hash mixed with the row seed
    fn bucket(&self, item: &str, seed: u32) -> usize {
        let mut hash = seed;
        for byte in item.bytes() {
            hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
        }
        hash as usize % self.width
    }

    /// Counts may be negative; cells are signed
    pub fn add(&mut self, item: &str, count: i64) {
        for i in 0..self.depth {
            let bucket = self.bucket(item, self.seeds[i]);
            self.cells[i][bucket] += count;
        }
    }

    /// Minimum count across all rows
    pub fn estimate(&self, item: &str) -> i64 {
        let mut min_count = i64::MAX;
        for i in 0..self.depth {
            let bucket = self.bucket(item, self.seeds[i]);
            min_count = min_count.min(self.cells[i][bucket]);
        }
        min_count
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(0);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for CountMinSketch {
    fn default() -> Self {
        Self::new()
    }
}
