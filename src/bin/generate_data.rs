/// Synthetic dataset generator for the demo driver
/// Writes data/large_data.csv with a category column (A-E) and an
/// integer value column (50..=500)
use std::env;
use std::fs;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;

const CATEGORIES: [&str; 5] = ["A", "B", "C", "D", "E"];
const DEFAULT_ROWS: usize = 1_000_000;
const OUTPUT_PATH: &str = "data/large_data.csv";

fn main() -> Result<()> {
    let rows = match env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_ROWS,
    };

    println!("Generating {} rows...", rows);
    fs::create_dir_all("data")?;
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)?;
    writer.write_record(["category", "value"])?;

    let mut rng = rand::thread_rng();
    for _ in 0..rows {
        let category = CATEGORIES.choose(&mut rng).unwrap_or(&CATEGORIES[0]);
        let value = rng.gen_range(50..=500u32).to_string();
        writer.write_record([*category, value.as_str()])?;
    }
    writer.flush()?;

    println!("Wrote {} rows to {}", rows, OUTPUT_PATH);
    Ok(())
}
