/// Query execution: optional sampling pass, per-group aggregation,
/// rescaling of extensive aggregates, result materialization
use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::core::sampling::{
    ReservoirSampler, Sampler, SimpleRandomSampler, StratifiedSampler, SystematicSampler,
    DEFAULT_STRATUM_CAPACITY,
};
use crate::query::aggregate::AggregateBundle;
use crate::query::parser::{AggregationType, Query, Sampling};

/// Group key used when the query has no GROUP BY clause
const DEFAULT_GROUP_KEY: &str = "default";

/// Placeholder for group-by columns absent from a row
const NULL_PLACEHOLDER: &str = "NULL";

/// A single input row: column name to uninterpreted cell text
#[derive(Clone, Debug, Default)]
pub struct DataRow {
    pub values: HashMap<String, String>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Materialized result table; every cell is a string
#[derive(Clone, Debug, Default, Serialize)]
pub struct QueryResult {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub is_approximate: bool,
}

/// Drives rows through an optional sampler into per-group aggregate
/// bundles, then materializes the result table
pub struct QueryExecutor {
    groups: HashMap<String, AggregateBundle>,
    sampler: Option<Sampler<DataRow>>,
    stratum_capacity: usize,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::with_stratum_capacity(DEFAULT_STRATUM_CAPACITY)
    }

    pub fn with_stratum_capacity(stratum_capacity: usize) -> Self {
        Self {
            groups: HashMap::new(),
            sampler: None,
            stratum_capacity,
        }
    }

    pub fn execute(&mut self, query: &Query, data: &[DataRow]) -> QueryResult {
        self.groups.clear();
        self.sampler = self.build_sampler(&query.sampling);

        let mut result = QueryResult::default();
        let mut scaling_factor = 1.0;

        let sampled;
        let processed: &[DataRow] = if let Some(sampler) = self.sampler.as_mut() {
            for row in data {
                sampler.add(row.clone());
            }
            sampled = sampler.sample();
            result.is_approximate = true;
            if sampler.rate() > 0.0 {
                scaling_factor = 1.0 / sampler.rate();
            }
            debug!(
                "sampled {} of {} rows, scaling factor {}",
                sampled.len(),
                data.len(),
                scaling_factor
            );
            &sampled
        } else {
            data
        };

        // Aggregate-only queries still produce one row over empty input
        if processed.is_empty() && query.group_by_columns.is_empty() {
            self.ensure_bundle(query, &DataRow::new());
        }

        for row in processed {
            self.process_row(query, row);
        }

        result.column_names = query
            .columns
            .iter()
            .map(|c| c.display_name().to_string())
            .collect();

        for bundle in self.groups.values() {
            let group_map: HashMap<&str, &str> = query
                .group_by_columns
                .iter()
                .zip(bundle.group_values())
                .map(|(column, value)| (column.as_str(), value.as_str()))
                .collect();

            let mut row = Vec::with_capacity(query.columns.len());
            for column in &query.columns {
                if column.is_aggregate() {
                    let mut value = bundle.result(column.display_name());
                    if result.is_approximate && column.aggregation.is_extensive() {
                        value *= scaling_factor;
                    }
                    row.push(value.to_string());
                } else {
                    let cell = group_map.get(column.name.as_str()).copied().unwrap_or("");
                    row.push(cell.to_string());
                }
            }
            result.rows.push(row);
        }

        debug!(
            "query over {} produced {} result rows",
            query.table_name,
            result.rows.len()
        );
        result
    }

    fn build_sampler(&self, sampling: &Sampling) -> Option<Sampler<DataRow>> {
        match sampling {
            Sampling::None => None,
            Sampling::Random { rate } => {
                Some(Sampler::SimpleRandom(SimpleRandomSampler::new(*rate)))
            }
            Sampling::Systematic { step } => {
                Some(Sampler::Systematic(SystematicSampler::new(*step)))
            }
            Sampling::Reservoir { size } => {
                Some(Sampler::Reservoir(ReservoirSampler::new(*size)))
            }
            Sampling::Stratified { rate, column } => {
                let column = column.clone();
                let key_fn = move |row: &DataRow| {
                    row.get(&column).unwrap_or(NULL_PLACEHOLDER).to_string()
                };
                Some(Sampler::Stratified(StratifiedSampler::new(
                    *rate,
                    self.stratum_capacity,
                    Box::new(key_fn),
                )))
            }
        }
    }

    fn group_key_and_values(query: &Query, row: &DataRow) -> (String, Vec<String>) {
        if query.group_by_columns.is_empty() {
            return (DEFAULT_GROUP_KEY.to_string(), Vec::new());
        }
        let values: Vec<String> = query
            .group_by_columns
            .iter()
            .map(|column| row.get(column).unwrap_or(NULL_PLACEHOLDER).to_string())
            .collect();
        let key = values.join("|");
        (key, values)
    }

    /// Creates the group's bundle on first sighting, registering one
    /// aggregator per aggregated column under its rendered key
    fn ensure_bundle(&mut self, query: &Query, row: &DataRow) -> &mut AggregateBundle {
        let (key, values) = Self::group_key_and_values(query, row);
        self.groups.entry(key).or_insert_with(|| {
            let mut bundle = AggregateBundle::new();
            for column in &query.columns {
                if column.is_aggregate() {
                    bundle.register(column.display_name(), column.aggregation);
                }
            }
            bundle.set_group_values(values);
            bundle
        })
    }

    fn process_row(&mut self, query: &Query, row: &DataRow) {
        let bundle = self.ensure_bundle(query, row);
        for column in &query.columns {
            if !column.is_aggregate() {
                continue;
            }
            if column.aggregation == AggregationType::Count {
                bundle.add_value(column.display_name(), 1.0);
            } else if let Some(cell) = row.get(&column.name) {
                // Non-numeric and empty cells contribute nothing
                if let Ok(value) = cell.parse::<f64>() {
                    bundle.add_value(column.display_name(), value);
                }
            }
        }
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}
