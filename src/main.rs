use std::process::ExitCode;
use std::time::Instant;

use approx_query_engine::{load_csv, ApproxQueryEngine, EngineConfig, QueryResult};

fn print_result(result: &QueryResult) {
    let mut widths: Vec<usize> = result.column_names.iter().map(String::len).collect();
    for row in &result.rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header: Vec<String> = result
        .column_names
        .iter()
        .zip(widths.iter().copied())
        .map(|(name, width)| format!("{:<1$}", name, width))
        .collect();
    println!("{}", header.join("  "));
    println!(
        "{}",
        "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1))
    );

    for row in &result.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{:<1$}", cell, width))
            .collect();
        println!("{}", cells.join("  "));
    }

    if result.is_approximate {
        println!("\nNote: Results are approximate.");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::default();
    let data = match load_csv(&config.data_path) {
        Ok(data) if !data.is_empty() => data,
        Ok(_) => {
            eprintln!("Error: no rows in data file: {}", config.data_path);
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!(
                "Error: could not load data file {}: {}",
                config.data_path, err
            );
            return ExitCode::FAILURE;
        }
    };

    println!("Approximate Query Engine Demo");
    println!("-----------------------------");
    println!("Loaded {} rows from {}", data.len(), config.data_path);

    let queries = [
        ("Exact COUNT", "SELECT COUNT(value) FROM data"),
        (
            "Approximate COUNT (10% sample)",
            "SELECT COUNT(value) FROM data SAMPLE 10%",
        ),
        (
            "Group by with AVG",
            "SELECT category, AVG(value) FROM data GROUP BY category",
        ),
        (
            "Stratified sampling",
            "SELECT category, AVG(value) FROM data GROUP BY category SAMPLE STRATIFIED BY category 20%",
        ),
        (
            "Reservoir sampling",
            "SELECT SUM(value) FROM data SAMPLE RESERVOIR 1000",
        ),
        (
            "Systematic sampling",
            "SELECT COUNT(value), SUM(value) FROM data SAMPLE SYSTEMATIC 10",
        ),
    ];

    let mut engine = ApproxQueryEngine::with_config(config);
    for (description, query) in queries {
        println!("\nExecuting: {}...", description);
        let start = Instant::now();
        match engine.execute_query(query, &data) {
            Ok(result) => {
                print_result(&result);
                println!(
                    "Execution time: {:.2}ms",
                    start.elapsed().as_secs_f64() * 1000.0
                );
            }
            Err(err) => eprintln!("Error: {}", err),
        }
    }

    ExitCode::SUCCESS
}
