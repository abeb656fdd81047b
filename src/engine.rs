/// Engine facade joining the parser and the executor
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::query::executor::{DataRow, QueryExecutor, QueryResult};
use crate::query::parser::QueryParser;

/// Main engine interface: parse a query string and run it over
/// in-memory rows
pub struct ApproxQueryEngine {
    parser: QueryParser,
    executor: QueryExecutor,
}

impl ApproxQueryEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            parser: QueryParser::new(),
            executor: QueryExecutor::with_stratum_capacity(config.stratum_capacity),
        }
    }

    /// Parse, validate, and execute a query over the given rows
    pub fn execute_query(
        &mut self,
        query_str: &str,
        data: &[DataRow],
    ) -> EngineResult<QueryResult> {
        let query = self.parser.parse(query_str)?;
        Ok(self.executor.execute(&query, data))
    }
}

impl Default for ApproxQueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
