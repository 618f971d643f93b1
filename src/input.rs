//! Address list reader

use crate::config::defaults::ADDRESS_COLUMN;
use crate::error::{InputError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read the `Address` column of the CSV at `path`
pub fn read_addresses(path: &Path) -> Result<Vec<String>> {
    let file =
        File::open(path).map_err(|e| InputError::FileOpen(format!("{}: {}", path.display(), e)))?;
    read_addresses_from(file)
}

/// Read the `Address` column from any CSV source
///
/// Blank cells are skipped and surrounding whitespace is dropped. Order and
/// duplicates are preserved.
pub fn read_addresses_from<R: Read>(source: R) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| InputError::Parse(e.to_string()))?;
    let column = headers
        .iter()
        .position(|h| h == ADDRESS_COLUMN)
        .ok_or_else(|| InputError::MissingColumn(ADDRESS_COLUMN.to_string()))?;

    let mut addresses = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| InputError::Parse(e.to_string()))?;
        match record.get(column) {
            Some(address) if !address.is_empty() => addresses.push(address.to_string()),
            _ => {}
        }
    }

    tracing::debug!("Read {} addresses", addresses.len());
    Ok(addresses)
}
