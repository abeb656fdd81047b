/// Query model and parser for the supported SQL subset
/// Keywords are case-insensitive; identifiers are case-sensitive
use std::fmt;

use regex::Regex;

use crate::error::{EngineError, EngineResult};

/// Aggregation applied to a projected column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationType {
    None,
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregationType {
    fn from_keyword(word: &str) -> Self {
        match word {
            "COUNT" => AggregationType::Count,
            "SUM" => AggregationType::Sum,
            "AVG" => AggregationType::Avg,
            "MIN" => AggregationType::Min,
            "MAX" => AggregationType::Max,
            _ => AggregationType::None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            AggregationType::None => "",
            AggregationType::Count => "COUNT",
            AggregationType::Sum => "SUM",
            AggregationType::Avg => "AVG",
            AggregationType::Min => "MIN",
            AggregationType::Max => "MAX",
        }
    }

    /// COUNT and SUM scale linearly with the sampling rate and are the
    /// only kinds the executor rescales
    pub fn is_extensive(&self) -> bool {
        matches!(self, AggregationType::Count | AggregationType::Sum)
    }
}

/// A projected column: a raw field or an aggregate over a source column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub alias: String,
    pub aggregation: AggregationType,
}

impl Column {
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: String::new(),
            aggregation: AggregationType::None,
        }
    }

    pub fn aggregate(
        name: impl Into<String>,
        alias: impl Into<String>,
        aggregation: AggregationType,
    ) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            aggregation,
        }
    }

    pub fn is_star(&self) -> bool {
        self.name == "*"
    }

    pub fn is_aggregate(&self) -> bool {
        self.aggregation != AggregationType::None
    }

    /// Rendered header and aggregator key: the alias when present,
    /// otherwise the source name
    pub fn display_name(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    fn canonical_alias(&self) -> String {
        format!(
            "{}({})",
            self.aggregation.keyword(),
            self.name.to_ascii_uppercase()
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_aggregate() {
            write!(f, "{}({})", self.aggregation.keyword(), self.name)?;
            if self.alias != self.canonical_alias() {
                write!(f, " AS {}", self.alias)?;
            }
            Ok(())
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Sampling clause attached to a query
#[derive(Clone, Debug, PartialEq)]
pub enum Sampling {
    None,
    Random { rate: f64 },
    Systematic { step: usize },
    Reservoir { size: usize },
    Stratified { rate: f64, column: String },
}

impl Sampling {
    pub fn is_none(&self) -> bool {
        matches!(self, Sampling::None)
    }

    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Sampling::None => Ok(()),
            Sampling::Random { rate } | Sampling::Stratified { rate, .. } => {
                if *rate <= 0.0 || *rate > 1.0 {
                    return Err(EngineError::parse(
                        "Sampling rate must be between 0 and 1",
                    ));
                }
                Ok(())
            }
            Sampling::Systematic { step } => {
                if *step < 1 {
                    return Err(EngineError::parse("Step size must be at least 1"));
                }
                Ok(())
            }
            Sampling::Reservoir { size } => {
                if *size == 0 {
                    return Err(EngineError::parse(
                        "Reservoir sample size must be greater than 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sampling::None => Ok(()),
            Sampling::Random { rate } => write!(f, "{}%", rate * 100.0),
            Sampling::Systematic { step } => write!(f, "SYSTEMATIC {}", step),
            Sampling::Reservoir { size } => write!(f, "RESERVOIR {}", size),
            Sampling::Stratified { rate, column } => {
                write!(f, "STRATIFIED BY {} {}%", column, rate * 100.0)
            }
        }
    }
}

/// A validated query over a single table
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub columns: Vec<Column>,
    pub table_name: String,
    pub group_by_columns: Vec<String>,
    pub sampling: Sampling,
}

impl Query {
    pub fn validate(&self) -> EngineResult<()> {
        if self.table_name.is_empty() {
            return Err(EngineError::parse("Table name cannot be empty"));
        }

        let has_aggregate = self.columns.iter().any(|c| c.is_aggregate());
        let has_raw = self.columns.iter().any(|c| !c.is_aggregate() && !c.is_star());
        if has_raw && has_aggregate && self.group_by_columns.is_empty() {
            return Err(EngineError::parse(
                "Queries with both aggregated and non-aggregated columns require a GROUP BY clause",
            ));
        }

        self.sampling.validate()
    }
}

impl fmt::Display for Query {
    /// Canonical rendering; re-parsing it yields an equal query
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", column)?;
        }
        write!(f, " FROM {}", self.table_name)?;
        if !self.group_by_columns.is_empty() {
            write!(f, " GROUP BY {}", self.group_by_columns.join(", "))?;
        }
        if !self.sampling.is_none() {
            write!(f, " SAMPLE {}", self.sampling)?;
        }
        Ok(())
    }
}

/// Regex-driven parser for the supported grammar
pub struct QueryParser {
    aggregate_re: Regex,
    sample_re: Regex,
}

impl QueryParser {
    pub fn new() -> Self {
        let aggregate_re =
            Regex::new(r"(?i)^(COUNT|SUM|AVG|MIN|MAX)\s*\(([^)]+)\)(?:\s+AS\s+(\w+))?$")
                .expect("aggregate column pattern is a valid regex");
        let sample_re = Regex::new(
            r"(?i)\s*(?:(RESERVOIR)\s+(\d+)|(SYSTEMATIC)\s+(\d+)|(STRATIFIED)\s+BY\s+(\w+)\s+(\d+(?:\.\d+)?)%|(\d+(?:\.\d+)?)%)",
        )
        .expect("sample clause pattern is a valid regex");
        Self {
            aggregate_re,
            sample_re,
        }
    }

    pub fn parse(&self, query_str: &str) -> EngineResult<Query> {
        // Keyword positions are located on an upper-cased copy; the
        // original text is kept for identifier extraction
        let upper = query_str.to_ascii_uppercase();
        let select_pos = find_keyword(&upper, "SELECT")?;
        let from_pos = find_keyword(&upper, "FROM")?;

        let columns_start = select_pos + "SELECT".len();
        if from_pos < columns_start {
            return Err(EngineError::parse("FROM clause must follow the SELECT clause"));
        }

        let columns = self.parse_columns(&query_str[columns_start..from_pos]);
        let rest = &query_str[from_pos + "FROM".len()..];
        let (table_name, group_by_columns, sampling) = self.parse_from_and_clauses(rest)?;

        let query = Query {
            columns,
            table_name,
            group_by_columns,
            sampling,
        };
        query.validate()?;
        Ok(query)
    }

    fn parse_columns(&self, columns_str: &str) -> Vec<Column> {
        let mut columns = Vec::new();
        for part in columns_str.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some(caps) = self.aggregate_re.captures(part) {
                let func = caps[1].to_ascii_uppercase();
                let aggregation = AggregationType::from_keyword(&func);
                if aggregation == AggregationType::None {
                    columns.push(Column::raw(part));
                    continue;
                }
                let name = caps[2].trim().to_string();
                let alias = match caps.get(3) {
                    Some(alias) => alias.as_str().to_string(),
                    None => format!("{}({})", func, name.to_ascii_uppercase()),
                };
                columns.push(Column::aggregate(name, alias, aggregation));
            } else {
                columns.push(Column::raw(part));
            }
        }
        columns
    }

    fn parse_from_and_clauses(
        &self,
        rest: &str,
    ) -> EngineResult<(String, Vec<String>, Sampling)> {
        let upper_rest = rest.to_ascii_uppercase();
        let group_by_pos = upper_rest.find("GROUP BY");
        let sample_pos = upper_rest.find("SAMPLE");

        let table_end = match (group_by_pos, sample_pos) {
            (Some(g), Some(s)) => g.min(s),
            (Some(g), None) => g,
            (None, Some(s)) => s,
            (None, None) => rest.len(),
        };
        let table_name = rest[..table_end].trim().to_string();

        let mut group_by_columns = Vec::new();
        if let Some(g) = group_by_pos {
            let clause_start = g + "GROUP BY".len();
            let clause_end = match sample_pos {
                Some(s) if s > g => s,
                _ => rest.len(),
            };
            for column in rest[clause_start..clause_end].split(',') {
                let column = column.trim();
                if !column.is_empty() {
                    group_by_columns.push(column.to_string());
                }
            }
        }

        let sampling = match sample_pos {
            Some(s) => self.parse_sampling(&rest[s + "SAMPLE".len()..])?,
            None => Sampling::None,
        };

        Ok((table_name, group_by_columns, sampling))
    }

    fn parse_sampling(&self, sample_str: &str) -> EngineResult<Sampling> {
        let caps = self
            .sample_re
            .captures(sample_str)
            .ok_or_else(|| EngineError::parse("Invalid SAMPLE clause format"))?;

        if caps.get(1).is_some() {
            let size = caps[2]
                .parse()
                .map_err(|_| EngineError::parse("Invalid reservoir size in SAMPLE clause"))?;
            Ok(Sampling::Reservoir { size })
        } else if caps.get(3).is_some() {
            let step = caps[4]
                .parse()
                .map_err(|_| EngineError::parse("Invalid step size in SAMPLE clause"))?;
            Ok(Sampling::Systematic { step })
        } else if caps.get(5).is_some() {
            let column = caps[6].to_string();
            let rate = parse_percentage(&caps[7])?;
            Ok(Sampling::Stratified { rate, column })
        } else {
            let rate = parse_percentage(&caps[8])?;
            Ok(Sampling::Random { rate })
        }
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_percentage(text: &str) -> EngineResult<f64> {
    let percent: f64 = text
        .parse()
        .map_err(|_| EngineError::parse("Invalid percentage in SAMPLE clause"))?;
    Ok(percent / 100.0)
}

fn find_keyword(upper_query: &str, keyword: &str) -> EngineResult<usize> {
    upper_query
        .find(keyword)
        .ok_or_else(|| EngineError::parse(format!("Missing {} clause", keyword)))
}
