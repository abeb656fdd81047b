//! Parser and executor behaviour over the public API
//!
//! Run with: `cargo test --test query_tests`

use approx_query_engine::{
    AggregationType, ApproxQueryEngine, DataRow, EngineError, QueryParser, QueryResult, Sampling,
};

fn sample_data() -> Vec<DataRow> {
    vec![
        DataRow::from_pairs([("category", "A"), ("value", "100")]),
        DataRow::from_pairs([("category", "B"), ("value", "200")]),
        DataRow::from_pairs([("category", "A"), ("value", "150")]),
        DataRow::from_pairs([("category", "B"), ("value", "250")]),
        DataRow::from_pairs([("category", "C"), ("value", "300")]),
    ]
}

/// Output row order across groups is unspecified, so tests sort first
fn sorted_rows(result: &QueryResult) -> Vec<Vec<String>> {
    let mut rows = result.rows.clone();
    rows.sort();
    rows
}

fn cell_as_f64(result: &QueryResult, row: usize, column: usize) -> f64 {
    result.rows[row][column].parse().unwrap()
}

// --- Parser ---

#[test]
fn parser_handles_simple_count() {
    let parser = QueryParser::new();
    let query = parser.parse("SELECT COUNT(value) FROM data").unwrap();
    assert_eq!(query.columns.len(), 1);
    assert_eq!(query.columns[0].name, "value");
    assert_eq!(query.columns[0].alias, "COUNT(VALUE)");
    assert_eq!(query.columns[0].aggregation, AggregationType::Count);
    assert_eq!(query.table_name, "data");
    assert!(query.sampling.is_none());
}

#[test]
fn parser_handles_multiple_aggregations_with_aliases() {
    let parser = QueryParser::new();
    let query = parser
        .parse("SELECT SUM(value) AS total, AVG(value) as average FROM my_table")
        .unwrap();
    assert_eq!(query.columns.len(), 2);
    assert_eq!(query.table_name, "my_table");
    assert_eq!(query.columns[0].name, "value");
    assert_eq!(query.columns[0].alias, "total");
    assert_eq!(query.columns[0].aggregation, AggregationType::Sum);
    assert_eq!(query.columns[1].name, "value");
    assert_eq!(query.columns[1].alias, "average");
    assert_eq!(query.columns[1].aggregation, AggregationType::Avg);
}

#[test]
fn parser_handles_group_by() {
    let parser = QueryParser::new();
    let query = parser
        .parse("SELECT category, AVG(value) FROM data GROUP BY category")
        .unwrap();
    assert_eq!(query.columns.len(), 2);
    assert_eq!(query.group_by_columns, vec!["category"]);
    assert!(!query.columns[0].is_aggregate());
    assert_eq!(query.columns[0].display_name(), "category");
}

#[test]
fn parser_handles_random_sampling_clause() {
    let parser = QueryParser::new();
    let query = parser.parse("SELECT COUNT(*) FROM data SAMPLE 15.5%").unwrap();
    assert_eq!(query.sampling, Sampling::Random { rate: 0.155 });
}

#[test]
fn parser_handles_reservoir_and_systematic_clauses() {
    let parser = QueryParser::new();
    let query = parser
        .parse("SELECT COUNT(value) FROM data SAMPLE RESERVOIR 500")
        .unwrap();
    assert_eq!(query.sampling, Sampling::Reservoir { size: 500 });

    let query = parser
        .parse("SELECT COUNT(value) FROM data SAMPLE SYSTEMATIC 10")
        .unwrap();
    assert_eq!(query.sampling, Sampling::Systematic { step: 10 });
}

#[test]
fn parser_handles_stratified_clause() {
    let parser = QueryParser::new();
    let query = parser
        .parse("SELECT category, AVG(value) FROM data GROUP BY category SAMPLE STRATIFIED BY category 20%")
        .unwrap();
    assert_eq!(
        query.sampling,
        Sampling::Stratified {
            rate: 0.2,
            column: "category".to_string()
        }
    );
    assert_eq!(query.group_by_columns, vec!["category"]);
}

#[test]
fn parser_rejects_missing_from_clause() {
    let parser = QueryParser::new();
    let err = parser.parse("SELECT value").unwrap_err();
    assert!(err.to_string().contains("Missing FROM"));
}

#[test]
fn parser_rejects_missing_select_clause() {
    let parser = QueryParser::new();
    let err = parser.parse("COUNT(value) FROM data").unwrap_err();
    assert!(err.to_string().contains("Missing SELECT"));
}

#[test]
fn parser_rejects_invalid_sample_clauses() {
    let parser = QueryParser::new();
    assert!(parser
        .parse("SELECT COUNT(value) FROM data SAMPLE oops")
        .is_err());
    assert!(parser
        .parse("SELECT COUNT(value) FROM data SAMPLE RESERVOIR 0")
        .is_err());
    assert!(parser
        .parse("SELECT COUNT(value) FROM data SAMPLE SYSTEMATIC 0")
        .is_err());
    assert!(parser
        .parse("SELECT COUNT(value) FROM data SAMPLE 150%")
        .is_err());
}

#[test]
fn parser_rejects_mixed_columns_without_group_by() {
    let parser = QueryParser::new();
    let err = parser.parse("SELECT category, COUNT(value) FROM data").unwrap_err();
    let EngineError::Parse { message } = err;
    assert!(message.contains("GROUP BY"));
}

#[test]
fn parsed_queries_survive_canonical_rendering() {
    let parser = QueryParser::new();
    let inputs = [
        "SELECT COUNT(value) FROM data",
        "SELECT category, AVG(value) AS average FROM data GROUP BY category SAMPLE 25%",
        "SELECT SUM(value) FROM data SAMPLE RESERVOIR 100",
        "SELECT MIN(value), MAX(value) FROM data SAMPLE SYSTEMATIC 4",
        "SELECT category, SUM(value) FROM data GROUP BY category SAMPLE STRATIFIED BY category 50%",
    ];
    for input in inputs {
        let query = parser.parse(input).unwrap();
        let reparsed = parser.parse(&query.to_string()).unwrap();
        assert_eq!(query, reparsed, "round trip failed for {}", input);
    }
}

// --- Executor ---

#[test]
fn executor_handles_exact_count() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query("SELECT COUNT(value) FROM data", &sample_data())
        .unwrap();
    assert_eq!(result.column_names, vec!["COUNT(VALUE)"]);
    assert_eq!(result.rows, vec![vec!["5".to_string()]]);
    assert!(!result.is_approximate);
}

#[test]
fn executor_handles_exact_sum() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query("SELECT SUM(value) FROM data", &sample_data())
        .unwrap();
    assert_eq!(result.rows, vec![vec!["1000".to_string()]]);
}

#[test]
fn executor_handles_min_and_max() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query("SELECT MIN(value), MAX(value) FROM data", &sample_data())
        .unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0], vec!["100".to_string(), "300".to_string()]);
}

#[test]
fn executor_handles_group_by_and_avg() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT category, AVG(value) FROM data GROUP BY category",
            &sample_data(),
        )
        .unwrap();
    assert_eq!(result.column_names, vec!["category", "AVG(VALUE)"]);
    assert_eq!(
        sorted_rows(&result),
        vec![
            vec!["A".to_string(), "125".to_string()],
            vec!["B".to_string(), "225".to_string()],
            vec!["C".to_string(), "300".to_string()],
        ]
    );
}

#[test]
fn executor_counts_zero_over_empty_input() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine.execute_query("SELECT COUNT(*) FROM data", &[]).unwrap();
    assert_eq!(result.rows, vec![vec!["0".to_string()]]);
}

#[test]
fn executor_substitutes_null_for_missing_group_columns() {
    let mut data = sample_data();
    data.push(DataRow::from_pairs([("value", "400")]));

    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT category, SUM(value) FROM data GROUP BY category",
            &data,
        )
        .unwrap();
    let rows = sorted_rows(&result);
    assert_eq!(rows.len(), 4);
    assert!(rows.contains(&vec!["NULL".to_string(), "400".to_string()]));
}

#[test]
fn executor_skips_non_numeric_aggregate_cells() {
    let data = vec![
        DataRow::from_pairs([("value", "10")]),
        DataRow::from_pairs([("value", "abc")]),
        DataRow::from_pairs([("value", "20")]),
    ];

    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT COUNT(value), SUM(value), AVG(value) FROM data",
            &data,
        )
        .unwrap();
    // COUNT sees every row; SUM and AVG only the numeric cells
    assert_eq!(
        result.rows,
        vec![vec!["3".to_string(), "30".to_string(), "15".to_string()]]
    );
}

#[test]
fn executor_rescales_sampled_count() {
    let data = sample_data();
    let mut engine = ApproxQueryEngine::new();

    let mut total = 0.0;
    let runs = 200;
    for _ in 0..runs {
        let result = engine
            .execute_query("SELECT COUNT(*) FROM data SAMPLE 15.5%", &data)
            .unwrap();
        assert!(result.is_approximate);
        let count = cell_as_f64(&result, 0, 0);
        assert!(count >= 0.0);
        assert!(count <= data.len() as f64 / 0.155 + 1e-9);
        total += count;
    }
    // Rescaling makes the estimator unbiased; the mean should sit near |D|
    let mean = total / runs as f64;
    assert!(
        (mean - data.len() as f64).abs() < 2.0,
        "mean {} too far from {}",
        mean,
        data.len()
    );
}

#[test]
fn executor_rescales_systematic_count_deterministically() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query("SELECT COUNT(value) FROM data SAMPLE SYSTEMATIC 2", &sample_data())
        .unwrap();
    // Rows 2 and 4 are admitted, count 2 rescaled by 1/0.5
    assert!(result.is_approximate);
    assert_eq!(result.rows, vec![vec!["4".to_string()]]);
}

#[test]
fn executor_with_saturating_reservoir_recovers_exact_count() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query("SELECT COUNT(value) FROM data SAMPLE RESERVOIR 10", &sample_data())
        .unwrap();
    // The reservoir holds every row, so the observed rate is 1
    assert!(result.is_approximate);
    assert_eq!(result.rows, vec![vec!["5".to_string()]]);
}

#[test]
fn executor_leaves_intensive_aggregates_unscaled() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT category, AVG(value) FROM data GROUP BY category SAMPLE STRATIFIED BY category 20%",
            &sample_data(),
        )
        .unwrap();
    // Every stratum fits its reservoir, so the grouped averages are exact
    assert!(result.is_approximate);
    assert_eq!(
        sorted_rows(&result),
        vec![
            vec!["A".to_string(), "125".to_string()],
            vec!["B".to_string(), "225".to_string()],
            vec!["C".to_string(), "300".to_string()],
        ]
    );
}

#[test]
fn executor_emits_one_row_per_distinct_group() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT category, COUNT(value) FROM data GROUP BY category",
            &sample_data(),
        )
        .unwrap();
    let mut groups: Vec<String> = result.rows.iter().map(|r| r[0].clone()).collect();
    groups.sort();
    assert_eq!(groups, vec!["A", "B", "C"]);
}

#[test]
fn executor_uses_aliases_as_headers_and_keys() {
    let mut engine = ApproxQueryEngine::new();
    let result = engine
        .execute_query(
            "SELECT SUM(value) AS total, COUNT(value) AS n FROM data",
            &sample_data(),
        )
        .unwrap();
    assert_eq!(result.column_names, vec!["total", "n"]);
    assert_eq!(
        result.rows,
        vec![vec!["1000".to_string(), "5".to_string()]]
    );
}
