//! Output writers

mod csv;

pub use self::csv::CsvWriter;

use crate::error::Result;
use crate::transfer::TransferRecord;
use std::path::Path;

/// Sink for completed addresses
pub trait OutputWriter: Send {
    /// Write every record of one address
    fn write_records(&mut self, records: &[TransferRecord]) -> Result<()>;

    /// Flush everything still buffered
    fn finalize(&mut self) -> Result<()>;
}

/// Open the CSV output at `path` with its header written
pub fn create_writer(path: &Path) -> Result<Box<dyn OutputWriter>> {
    Ok(Box::new(CsvWriter::new(path)?))
}
