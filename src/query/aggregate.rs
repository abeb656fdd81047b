/// Incremental aggregation state, one scalar per column per group
use std::collections::HashMap;

use crate::query::parser::AggregationType;

/// Streaming scalar aggregator, dispatched by kind
#[derive(Clone, Debug, PartialEq)]
pub enum Aggregator {
    Count { n: u64 },
    Sum { total: f64 },
    Avg { total: f64, n: u64 },
    Min { value: f64, seen: bool },
    Max { value: f64, seen: bool },
}

impl Aggregator {
    /// No aggregator exists for a raw projection
    pub fn new(kind: AggregationType) -> Option<Self> {
        match kind {
            AggregationType::None => None,
            AggregationType::Count => Some(Aggregator::Count { n: 0 }),
            AggregationType::Sum => Some(Aggregator::Sum { total: 0.0 }),
            AggregationType::Avg => Some(Aggregator::Avg { total: 0.0, n: 0 }),
            AggregationType::Min => Some(Aggregator::Min {
                value: 0.0,
                seen: false,
            }),
            AggregationType::Max => Some(Aggregator::Max {
                value: 0.0,
                seen: false,
            }),
        }
    }

    pub fn add(&mut self, value: f64) {
        match self {
            Aggregator::Count { n } => *n += 1,
            Aggregator::Sum { total } => *total += value,
            Aggregator::Avg { total, n } => {
                *total += value;
                *n += 1;
            }
            Aggregator::Min { value: min, seen } => {
                *min = if *seen { min.min(value) } else { value };
                *seen = true;
            }
            Aggregator::Max { value: max, seen } => {
                *max = if *seen { max.max(value) } else { value };
                *seen = true;
            }
        }
    }

    pub fn result(&self) -> f64 {
        match self {
            Aggregator::Count { n } => *n as f64,
            Aggregator::Sum { total } => *total,
            Aggregator::Avg { total, n } => {
                if *n > 0 {
                    total / *n as f64
                } else {
                    0.0
                }
            }
            Aggregator::Min { value, seen } | Aggregator::Max { value, seen } => {
                if *seen {
                    *value
                } else {
                    0.0
                }
            }
        }
    }
}

/// The aggregators for one group, keyed by rendered column name, plus the
/// ordered group-by cell values identifying the group
#[derive(Clone, Debug, Default)]
pub struct AggregateBundle {
    aggregators: HashMap<String, Aggregator>,
    group_values: Vec<String>,
}

impl AggregateBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, kind: AggregationType) {
        if let Some(aggregator) = Aggregator::new(kind) {
            self.aggregators.insert(key.into(), aggregator);
        }
    }

    /// Unknown keys are ignored
    pub fn add_value(&mut self, key: &str, value: f64) {
        if let Some(aggregator) = self.aggregators.get_mut(key) {
            aggregator.add(value);
        }
    }

    /// 0.0 for keys that were never registered
    pub fn result(&self, key: &str) -> f64 {
        self.aggregators
            .get(key)
            .map(Aggregator::result)
            .unwrap_or(0.0)
    }

    pub fn set_group_values(&mut self, values: Vec<String>) {
        self.group_values = values;
    }

    pub fn group_values(&self) -> &[String] {
        &self.group_values
    }
}
