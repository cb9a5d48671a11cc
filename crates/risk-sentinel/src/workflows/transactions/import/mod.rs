//! CSV adapters for the transaction source and the denylist store.

mod parser;

use std::io::Read;
use std::path::Path;

use super::domain::{Denylist, TransactionEvent};

pub use parser::parse_timestamp;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidAmount { row: usize, value: String },
    InvalidTimestamp { row: usize, value: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read import file: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::InvalidAmount { row, value } => {
                write!(f, "row {}: '{}' is not a decimal amount", row, value)
            }
            ImportError::InvalidTimestamp { row, value } => write!(
                f,
                "row {}: '{}' is not an RFC 3339 timestamp or YYYY-MM-DD date",
                row, value
            ),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidAmount { .. } | ImportError::InvalidTimestamp { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Read `amount,timestamp,location` rows, keeping file order.
pub fn history_from_reader<R: Read>(reader: R) -> Result<Vec<TransactionEvent>, ImportError> {
    parser::parse_history(reader)
}

pub fn history_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TransactionEvent>, ImportError> {
    let file = std::fs::File::open(path)?;
    history_from_reader(file)
}

/// Read a single `location` column; blank rows are skipped.
pub fn denylist_from_reader<R: Read>(reader: R) -> Result<Denylist, ImportError> {
    Ok(parser::parse_denylist(reader)?.into_iter().collect())
}

pub fn denylist_from_path<P: AsRef<Path>>(path: P) -> Result<Denylist, ImportError> {
    let file = std::fs::File::open(path)?;
    denylist_from_reader(file)
}
