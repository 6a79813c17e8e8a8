use crate::error::{ProcessingError, Result};
use crate::models::{HourlyReading, StationReadings};
use crate::readers::SkippedRow;
use crate::utils::constants::{CSV_EXTENSION, WBGT_DATE_COLUMN, WBGT_TIME_COLUMN, WBGT_VALUE_COLUMN};
use crate::utils::dates::{parse_date, parse_hour};
use crate::utils::filename::{matches_pattern, station_id_from_dir_name};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads one station directory of hourly WBGT files
pub struct HourlyReader {
    file_prefix: String,
    expected_files: usize,
}

/// Outcome of scanning a station directory
#[derive(Debug, Clone)]
pub enum StationScan {
    Complete {
        readings: StationReadings,
        skipped: Vec<SkippedRow>,
        missing_values: usize,
    },
    /// Wrong number of hourly files; nothing is aggregated for the station
    Incomplete {
        station_id: String,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct HourlyFile {
    pub readings: Vec<HourlyReading>,
    pub skipped: Vec<SkippedRow>,
    /// Rows whose WBGT cell was blank or not a number
    pub missing_values: usize,
}

struct HourlyColumns {
    date: usize,
    time: Option<usize>,
    value: usize,
}

impl HourlyReader {
    pub fn new(file_prefix: &str, expected_files: usize) -> Self {
        Self {
            file_prefix: file_prefix.to_string(),
            expected_files,
        }
    }

    /// Station subdirectories of `base_dir`, sorted by name
    pub fn station_dirs(base_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(base_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Hourly files in a station directory, sorted by name
    pub fn station_files(&self, station_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(station_dir)? {
            let path = entry?.path();
            if path.is_file() && matches_pattern(&path, &self.file_prefix, CSV_EXTENSION) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load a station directory, enforcing the expected file count first
    pub fn read_station(&self, station_dir: &Path) -> Result<StationScan> {
        let station_id = station_id_from_dir_name(station_dir)?;
        let files = self.station_files(station_dir)?;

        if files.len() != self.expected_files {
            return Ok(StationScan::Incomplete {
                station_id,
                found: files.len(),
                expected: self.expected_files,
            });
        }

        let mut readings = Vec::new();
        let mut skipped = Vec::new();
        let mut missing_values = 0;

        for path in &files {
            match self.read_file(path) {
                Ok(file) => {
                    readings.extend(file.readings);
                    skipped.extend(file.skipped);
                    missing_values += file.missing_values;
                }
                Err(e) if e.is_structural() => {
                    warn!("Skipping hourly file {}: {}", path.display(), e);
                    skipped.push(SkippedRow::new(0, &e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(StationScan::Complete {
            readings: StationReadings {
                station_id,
                file_count: files.len(),
                readings,
            },
            skipped,
            missing_values,
        })
    }

    /// Read one hourly file. Columns are located by header name.
    pub fn read_file(&self, path: &Path) -> Result<HourlyFile> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let columns = Self::locate_columns(reader.headers()?)?;
        let mut file = HourlyFile::default();

        for (index, record_result) in reader.records().enumerate() {
            // header is line 1
            let line = index as u64 + 2;

            let record = match record_result {
                Ok(record) => record,
                Err(e) => {
                    let e = ProcessingError::from(e);
                    debug!("{}:{}: skipping row: {}", path.display(), line, e);
                    file.skipped.push(SkippedRow::new(line, &e));
                    continue;
                }
            };

            if record.iter().all(|f| f.is_empty()) {
                continue;
            }

            let date = match record.get(columns.date).map(parse_date) {
                Some(Ok(date)) => date,
                Some(Err(e)) => {
                    debug!("{}:{}: skipping row: {}", path.display(), line, e);
                    file.skipped.push(SkippedRow::new(line, &e));
                    continue;
                }
                None => {
                    let e = ProcessingError::MissingColumn(WBGT_DATE_COLUMN.to_string());
                    file.skipped.push(SkippedRow::new(line, &e));
                    continue;
                }
            };

            let value = record
                .get(columns.value)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite());

            let Some(value) = value else {
                file.missing_values += 1;
                continue;
            };

            let hour = columns
                .time
                .and_then(|i| record.get(i))
                .and_then(parse_hour);

            file.readings.push(HourlyReading::new(date, hour, value));
        }

        Ok(file)
    }

    fn locate_columns(headers: &csv::StringRecord) -> Result<HourlyColumns> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        Ok(HourlyColumns {
            date: position(WBGT_DATE_COLUMN)
                .ok_or_else(|| ProcessingError::MissingColumn(WBGT_DATE_COLUMN.to_string()))?,
            time: position(WBGT_TIME_COLUMN),
            value: position(WBGT_VALUE_COLUMN)
                .ok_or_else(|| ProcessingError::MissingColumn(WBGT_VALUE_COLUMN.to_string()))?,
        })
    }
}
