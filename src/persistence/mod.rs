// Flat-file export of backtest output
use crate::error::Result;
use crate::models::ResultTable;
use csv::Writer;
use std::fs;
use std::path::Path;

fn create_writer(path: &Path) -> Result<Writer<fs::File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(Writer::from_path(path)?)
}

/// Write a single indexed column as `index,<header>` rows
pub fn write_column_csv(path: &Path, header: &str, values: &[f64]) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["index", header])?;

    for (i, value) in values.iter().enumerate() {
        writer.write_record([i.to_string(), value.to_string()])?;
    }

    writer.flush()?;
    tracing::debug!("Wrote {} rows to {}", values.len(), path.display());
    Ok(())
}

/// Write the `close` column of a result table
pub fn write_prices_csv(path: &Path, table: &ResultTable) -> Result<()> {
    write_column_csv(path, "close", &table.close())
}

/// Write the `equity` column of a result table
pub fn write_equity_csv(path: &Path, table: &ResultTable) -> Result<()> {
    write_column_csv(path, "equity", &table.equity())
}

/// Write every column of a result table, one row per step
pub fn write_table_csv(path: &Path, table: &ResultTable) -> Result<()> {
    let mut writer = create_writer(path)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
