/// CSV ingestion into in-memory rows
use std::path::Path;

use anyhow::Result;
use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::query::executor::DataRow;

/// Load a headered CSV file into rows
/// Fields are trimmed and assigned positionally to the header names;
/// short records leave their trailing columns absent rather than empty
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<DataRow>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut data = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = DataRow::new();
        for (i, field) in record.iter().enumerate() {
            if let Some(header) = headers.get(i) {
                row.values.insert(header.to_string(), field.to_string());
            }
        }
        data.push(row);
    }

    info!("loaded {} rows from {}", data.len(), path.display());
    Ok(data)
}
