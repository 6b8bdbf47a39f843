//! CSV input and output of pipeline tables.

use anyhow::Context;
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

pub fn read_table<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<T>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.with_context(|| format!("Bad row in {}", path.display()))?;
        rows.push(row);
    }
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn write_table<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
