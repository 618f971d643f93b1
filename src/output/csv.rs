//! CSV output writer

use crate::config::defaults::OUTPUT_HEADER;
use crate::error::{OutputError, Result};
use crate::output::OutputWriter;
use crate::transfer::TransferRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV output writer
///
/// The header is written as soon as the writer is created, so an empty run
/// still produces a valid file.
pub struct CsvWriter {
    /// CSV writer
    writer: csv::Writer<Box<dyn Write + Send>>,
}

impl CsvWriter {
    /// Create (or truncate) the file at `path`
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| OutputError::FileCreate(format!("{}: {}", path.display(), e)))?;

        Self::from_writer(Box::new(BufWriter::new(file)))
    }

    /// Create a writer on any sink
    pub fn from_writer(output: Box<dyn Write + Send>) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(output);
        writer
            .write_record(OUTPUT_HEADER)
            .map_err(|e| OutputError::CsvWrite(e.to_string()))?;

        Ok(Self { writer })
    }
}

impl OutputWriter for CsvWriter {
    fn write_records(&mut self, records: &[TransferRecord]) -> Result<()> {
        for record in records {
            self.writer
                .write_record(record.to_row())
                .map_err(|e| OutputError::CsvWrite(e.to_string()))?;
        }

        // Completed addresses must survive a killed run
        self.writer
            .flush()
            .map_err(|e| OutputError::CsvWrite(e.to_string()))?;

        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::CsvWrite(e.to_string()))?;

        Ok(())
    }
}
