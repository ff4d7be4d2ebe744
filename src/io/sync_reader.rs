//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over bank commands from a replay script.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<BankCommand, CommandError>` for each CSV row:
//!
//! ```no_run
//! use toy_bank_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Applying command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row parsing and validation errors are yielded as Err variants
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_csv_command, CsvCommand};
use crate::types::{BankCommand, CommandError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory usage does not grow with the script size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(CommandError::Io)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, CommandError> {
        let file = File::open(path).map_err(|e| CommandError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<BankCommand, CommandError>;

    /// Get the next command from the script
    ///
    /// # Returns
    ///
    /// * `Some(Ok(BankCommand))` - Successfully parsed and validated row
    /// * `Some(Err(CommandError::Parse))` - Malformed row, with line number
    /// * `Some(Err(CommandError::InvalidInput))` - Row failed validation, with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvCommand>();
        let row = deserializer.next()?;
        self.line_num += 1;
        let line = Some(self.line_num);

        match row {
            Ok(csv_command) => Some(convert_csv_command(csv_command).map_err(|e| e.at_line(self.line_num))),
            Err(e) => Some(Err(CommandError::Parse {
                line,
                message: e.to_string(),
            })),
        }
    }
}
