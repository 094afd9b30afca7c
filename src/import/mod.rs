//! Loading record sets from JSON snapshots and meeting rows from CSV exports.

mod parser;

use crate::playbook::domain::{Meeting, RecordSet};
use std::io::Read;
use std::path::Path;

pub use parser::parse_datetime;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read import source: {}", err),
            ImportError::Csv(err) => write!(f, "invalid meeting CSV data: {}", err),
            ImportError::Json(err) => write!(f, "invalid record snapshot: {}", err),
            ImportError::InvalidRow { line, reason } => {
                write!(f, "meeting CSV line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Json(err) => Some(err),
            ImportError::InvalidRow { .. } => None,
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

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Reads meeting rows exported with the
/// `Profile ID,Type,Amount,Base,Rating,Performance Rating,Date,Notes` header.
pub struct MeetingCsvImporter;

impl MeetingCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Meeting>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Meeting>, ImportError> {
        parser::parse_meetings(reader)
    }

    /// Append imported meetings to an existing record set.
    pub fn merge_into<R: Read>(records: &mut RecordSet, reader: R) -> Result<usize, ImportError> {
        let meetings = Self::from_reader(reader)?;
        let imported = meetings.len();
        records.meetings.extend(meetings);
        Ok(imported)
    }
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<RecordSet, ImportError> {
    let file = std::fs::File::open(path)?;
    snapshot_from_reader(file)
}

pub fn snapshot_from_reader<R: Read>(reader: R) -> Result<RecordSet, ImportError> {
    Ok(serde_json::from_reader(reader)?)
}
