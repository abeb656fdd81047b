//! # Approximate Query Engine
//!
//! An approximate query engine that answers SQL-like aggregation queries
//! over an in-memory table, optionally replacing the exact scan with
//! probabilistic sampling. The sample method and rate are declared in the
//! query itself; results are marked approximate and COUNT/SUM values are
//! rescaled to the population.
//!
//! ## Quick Start
//!
//! ```rust
//! use approx_query_engine::{ApproxQueryEngine, DataRow};
//!
//! let data = vec![
//!     DataRow::from_pairs([("category", "A"), ("value", "100")]),
//!     DataRow::from_pairs([("category", "B"), ("value", "200")]),
//! ];
//!
//! let mut engine = ApproxQueryEngine::new();
//! let result = engine
//!     .execute_query("SELECT COUNT(value) FROM data", &data)
//!     .unwrap();
//!
//! assert_eq!(result.column_names, vec!["COUNT(VALUE)"]);
//! assert_eq!(result.rows, vec![vec!["2".to_string()]]);
//! assert!(!result.is_approximate);
//! ```
//!
//! ## Features
//!
//! - **Aggregation**: COUNT, SUM, AVG, MIN, MAX with GROUP BY
//! - **Declarative sampling**: `SAMPLE 10%`, `SAMPLE RESERVOIR 1000`,
//!   `SAMPLE SYSTEMATIC 10`, `SAMPLE STRATIFIED BY col 20%`
//! - **Approximate primitives**: Count-Min sketch, HyperLogLog, Bloom
//!   filter, exponential histogram as standalone streaming estimators

pub mod approx;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod query;

pub use config::EngineConfig;
pub use engine::ApproxQueryEngine;
pub use error::{EngineError, EngineResult};
pub use ingestion::load_csv;
pub use query::executor::{DataRow, QueryExecutor, QueryResult};
pub use query::parser::{AggregationType, Column, Query, QueryParser, Sampling};
