pub mod hourly_reader;
pub mod station_reader;
pub mod wide_row_reader;

pub use hourly_reader::{HourlyFile, HourlyReader, StationScan};
pub use station_reader::{StationReader, StationTable};
pub use wide_row_reader::{DecodedFile, WideRowDecoder};

use crate::error::ProcessingError;

/// A row dropped for a structural problem. `line` is 1-based; 0 stands for
/// the whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub kind: &'static str,
    pub reason: String,
}

impl SkippedRow {
    pub fn new(line: u64, error: &ProcessingError) -> Self {
        Self {
            line,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}
