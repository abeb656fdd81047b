/// Exponential histogram for sliding-window counting
#[derive(Clone, Copy, Debug)]
struct Bucket {
    count: u64,
    timestamp: u64,
}

pub struct ExponentialHistogram {
    buckets: Vec<Bucket>,
    window: u64,
    epsilon: f64,
}

impl ExponentialHistogram {
    /// window: timestamp span covered, epsilon: relative error bound
    pub fn new(window: u64, epsilon: f64) -> Self {
        Self {
            buckets: Vec::new(),
            window,
            epsilon,
        }
    }

    pub fn add(&mut self, timestamp: u64, count: u64) {
        let cutoff = timestamp.saturating_sub(self.window);
        self.buckets.retain(|b| b.timestamp >= cutoff);
        self.buckets.push(Bucket { count, timestamp });
        self.merge_buckets();
    }

    /// Sum of every bucket still inside the window ending at `now`
    pub fn estimate(&self, now: u64) -> u64 {
        let cutoff = now.saturating_sub(self.window);
        self.buckets
            .iter()
            .filter(|b| b.timestamp >= cutoff)
            .map(|b| b.count)
            .sum()
    }

    fn merge_buckets(&mut self) {
        let k = (1.0 / self.epsilon).ceil() as usize;
        let max_buckets = k * (1 + (self.window as f64).log2().floor() as usize);

        while self.buckets.len() > max_buckets {
            // Prefer the first adjacent pair with equal counts; double the
            // left bucket and drop the right
            let equal_pair = self
                .buckets
                .windows(2)
                .position(|pair| pair[0].count == pair[1].count);
            match equal_pair {
                Some(i) => {
                    self.buckets[i].count *= 2;
                    self.buckets.remove(i + 1);
                }
                None if self.buckets.len() >= 2 => {
                    self.buckets[0].count += self.buckets[1].count;
                    self.buckets.remove(1);
                }
                None => break,
            }
        }
    }
}

impl Default for ExponentialHistogram {
    fn default() -> Self {
        Self::new(1000, 0.01)
    }
}
