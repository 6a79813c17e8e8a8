use crate::config::StationIndexLayout;
use crate::error::{ProcessingError, Result};
use crate::models::StationRow;
use crate::readers::SkippedRow;
use crate::utils::coordinates::parse_coordinate_pair;
use crate::utils::dates::parse_date;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;
use tracing::{debug, warn};

/// Reads the station metadata table: one row per station and validity period
pub struct StationReader {
    layout: StationIndexLayout,
}

#[derive(Debug, Clone, Default)]
pub struct StationTable {
    pub rows: Vec<StationRow>,
    pub skipped: Vec<SkippedRow>,
}

impl StationReader {
    pub fn new(layout: StationIndexLayout) -> Self {
        Self { layout }
    }

    /// Read the metadata file, decoding it with the configured encoding
    pub fn read_stations(&self, path: &Path) -> Result<StationTable> {
        let bytes = std::fs::read(path)?;
        let encoding = Encoding::for_label(self.layout.encoding.as_bytes()).unwrap_or(UTF_8);
        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            warn!(
                "{} contained bytes invalid in {}; they were replaced",
                path.display(),
                encoding.name()
            );
        }

        self.read_stations_from_str(&text)
    }

    /// Parse already-decoded table text. Line 1 is the header and the unit
    /// label row sits at `unit_row_line`; both are dropped before parsing.
    pub fn read_stations_from_str(&self, text: &str) -> Result<StationTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut table = StationTable::default();

        for (index, record_result) in reader.records().enumerate() {
            let line = index as u64 + 1;
            if line == 1 || line == self.layout.unit_row_line as u64 {
                continue;
            }

            let parsed = record_result
                .map_err(ProcessingError::from)
                .and_then(|record| {
                    if record.iter().all(|f| f.is_empty()) {
                        return Ok(None);
                    }
                    let fields: Vec<&str> = record.iter().collect();
                    self.parse_station_row(&fields).map(Some)
                });

            match parsed {
                Ok(Some(row)) => table.rows.push(row),
                Ok(None) => {}
                Err(e) if e.is_structural() => {
                    debug!("station index line {}: skipping row: {}", line, e);
                    table.skipped.push(SkippedRow::new(line, &e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(table)
    }

    /// Parse a single metadata row. Text fields are trimmed; a coordinate
    /// pair with a blank side counts as not populated. Descriptive columns
    /// past the end of a short row read as blank.
    pub fn parse_station_row(&self, fields: &[&str]) -> Result<StationRow> {
        let layout = &self.layout;
        let expected = layout.min_columns();
        if fields.len() < expected {
            return Err(ProcessingError::ColumnCount {
                expected,
                found: fields.len(),
            });
        }

        let field = |i: usize| fields[i].trim();
        let optional = |column: Option<usize>| {
            column
                .and_then(|i| fields.get(i))
                .map_or("", |f| f.trim())
        };

        let station_id = field(layout.id_column);
        if station_id.is_empty() {
            return Err(ProcessingError::InvalidFormat("Empty station ID".to_string()));
        }

        let precipitation = parse_coordinate_pair(
            field(layout.precipitation_latitude_column),
            field(layout.precipitation_longitude_column),
        )?;
        let snow = parse_coordinate_pair(
            field(layout.snow_latitude_column),
            field(layout.snow_longitude_column),
        )?;

        let end_date = match field(layout.end_date_column) {
            "" => None,
            raw => Some(parse_date(raw)?),
        };

        let altitude = match optional(layout.altitude_column) {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|_| ProcessingError::InvalidNumber {
                field: "altitude".to_string(),
                value: raw.to_string(),
            })?),
        };

        Ok(StationRow {
            station_id: station_id.to_string(),
            station_name: field(layout.name_column).to_string(),
            prefecture_subprefecture: optional(layout.prefecture_column).to_string(),
            long_name: optional(layout.long_name_column).to_string(),
            address: optional(layout.address_column).to_string(),
            altitude,
            precipitation,
            snow,
            end_date,
        })
    }
}
