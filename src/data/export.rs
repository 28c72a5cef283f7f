use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Record;

/// Write `rows` as CSV with the same header the loader expects.
pub fn write_csv<W: Write>(writer: W, rows: &[&Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, row) in rows.iter().enumerate() {
        wtr.serialize(row).with_context(|| format!("writing row {i}"))?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_csv(path: &Path, rows: &[&Record]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, rows)
}
