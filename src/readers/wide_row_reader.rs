use crate::error::{ProcessingError, Result};
use crate::models::{ElementCode, Granularity, RawCell, WideRow};
use crate::readers::SkippedRow;
use crate::utils::constants::{
    COL_DATA_YEARS, COL_ELEMENT, COL_END_YEAR, COL_MONTH, COL_PERIOD_TYPE, COL_START_YEAR,
    COL_STATION, REMARK_MISSING,
};
use crate::utils::filename::station_id_from_file_name;
use csv::StringRecord;
use std::path::Path;
use tracing::debug;

/// Decodes rows of the fixed-layout normals tables
#[derive(Debug, Clone, Copy)]
pub struct WideRowDecoder {
    granularity: Granularity,
}

/// Every row decoded from one normals file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    pub station_id: String,
    pub granularity: Granularity,
    pub rows: Vec<WideRow>,
    pub skipped: Vec<SkippedRow>,
}

impl WideRowDecoder {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    /// Decode one row. `station_id` comes from the file name and is the key
    /// the row is filed under.
    pub fn decode(&self, fields: &[&str], station_id: &str) -> Result<WideRow> {
        let expected = self.granularity.expected_columns();
        if fields.len() < expected {
            return Err(ProcessingError::ColumnCount {
                expected,
                found: fields.len(),
            });
        }

        let element = ElementCode::from_code(fields[COL_ELEMENT])?;

        let row_station = fields[COL_STATION].trim();
        if row_station != station_id {
            debug!(
                "Row station '{}' differs from file station '{}'",
                row_station, station_id
            );
        }

        let month = match self.granularity {
            Granularity::Daily => {
                let month = parse_number::<u32>(fields[COL_MONTH], "month")?.ok_or_else(|| {
                    ProcessingError::InvalidNumber {
                        field: "month".to_string(),
                        value: String::new(),
                    }
                })?;
                if !(1..=12).contains(&month) {
                    return Err(ProcessingError::InvalidNumber {
                        field: "month".to_string(),
                        value: month.to_string(),
                    });
                }
                Some(month)
            }
            Granularity::Monthly => None,
        };

        let cells = self
            .granularity
            .decode_table()
            .iter()
            .map(|columns| {
                let value = parse_number::<f64>(fields[columns.value], "value")?;
                let flag = parse_number::<i32>(fields[columns.flag], "remark")?
                    .unwrap_or(REMARK_MISSING);
                Ok(RawCell {
                    unit: columns.unit,
                    value,
                    flag,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(WideRow {
            station_id: station_id.to_string(),
            element,
            period_type: fields[COL_PERIOD_TYPE].trim().to_string(),
            data_years: parse_number(fields[COL_DATA_YEARS], "data_years")?,
            start_year: parse_number(fields[COL_START_YEAR], "start_year")?,
            end_year: parse_number(fields[COL_END_YEAR], "end_year")?,
            month,
            cells,
        })
    }

    pub fn decode_record(&self, record: &StringRecord, station_id: &str) -> Result<WideRow> {
        let fields: Vec<&str> = record.iter().collect();
        self.decode(&fields, station_id)
    }

    /// Read a whole normals file. Rows that fail to decode are collected in
    /// `skipped`; only I/O failures abort the file.
    pub fn read_file(&self, path: &Path) -> Result<DecodedFile> {
        let station_id = station_id_from_file_name(path)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for (index, record_result) in reader.records().enumerate() {
            let line = index as u64 + 1;

            let decoded = record_result
                .map_err(ProcessingError::from)
                .and_then(|record| {
                    if record.iter().all(|f| f.is_empty()) {
                        return Ok(None);
                    }
                    self.decode_record(&record, &station_id).map(Some)
                });

            match decoded {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => {}
                Err(e) if e.is_structural() => {
                    debug!("{}:{}: skipping row: {}", path.display(), line, e);
                    skipped.push(SkippedRow::new(line, &e));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(DecodedFile {
            station_id,
            granularity: self.granularity,
            rows,
            skipped,
        })
    }
}

/// Blank cells are `None`; anything else must parse
fn parse_number<T: std::str::FromStr>(raw: &str, field: &str) -> Result<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|_| ProcessingError::InvalidNumber {
            field: field.to_string(),
            value: trimmed.to_string(),
        })
}
