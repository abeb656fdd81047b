/// Engine configuration
use serde::{Deserialize, Serialize};

use crate::core::sampling::DEFAULT_STRATUM_CAPACITY;

/// Tunables for the engine and its demo driver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dataset the demo driver loads
    pub data_path: String,

    /// Per-stratum reservoir capacity for stratified sampling
    pub stratum_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: "data/large_data.csv".to_string(),
            stratum_capacity: DEFAULT_STRATUM_CAPACITY,
        }
    }
}
