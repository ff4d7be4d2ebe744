//! I/O module
//!
//! Handles replay-script parsing and balance output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, input validation, output serialization)
//! - `sync_reader` - Synchronous CSV reader with iterator interface

pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{convert_csv_command, write_balances_csv, BalanceRow, CsvCommand};
pub use sync_reader::SyncReader;
