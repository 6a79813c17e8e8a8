//! Pipeline configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `AMEDAS_*` environment variables. The CLI applies its own flags on top and
//! hands the finished [`PipelineConfig`] to the pipeline entry point.

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    DAILY_NORMALS_DIR, DAILY_NORMALS_PREFIX, DEFAULT_EXPECTED_HOURLY_FILES,
    DEFAULT_STATION_INDEX_ENCODING, DEFAULT_UNIT_ROW_LINE, HOURLY_WBGT_PREFIX, MONTHLY_NORMALS_DIR,
    MONTHLY_NORMALS_PREFIX, MONTHLY_UNITS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

const ENV_PREFIX: &str = "AMEDAS";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root of the normals tables; holds `daily/` and `monthly/`
    pub normals_dir: PathBuf,

    /// One subdirectory of hourly WBGT files per station
    pub wbgt_dir: PathBuf,

    pub station_index_file: PathBuf,

    pub output_dir: PathBuf,

    pub daily_prefix: String,
    pub monthly_prefix: String,
    pub hourly_prefix: String,

    /// Hourly files a station directory must hold to be aggregated
    #[validate(range(min = 1))]
    pub expected_hourly_files: usize,

    /// Monthly columns kept in the monthly series. 12 keeps every month;
    /// older exports of this dataset were sliced to 11.
    #[validate(range(min = 1, max = 12))]
    pub monthly_units: usize,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    #[validate(nested)]
    pub station_index: StationIndexLayout,
}

/// Column positions (0-based) and framing of the station metadata table
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StationIndexLayout {
    pub id_column: usize,
    pub name_column: usize,
    pub precipitation_latitude_column: usize,
    pub precipitation_longitude_column: usize,
    pub snow_latitude_column: usize,
    pub snow_longitude_column: usize,
    pub end_date_column: usize,

    /// Descriptive columns; a row too short to reach one reads as blank
    pub prefecture_column: Option<usize>,
    pub long_name_column: Option<usize>,
    pub address_column: Option<usize>,
    pub altitude_column: Option<usize>,

    /// 1-based physical line of the unit-label row; line 1 is the header
    #[validate(range(min = 2))]
    pub unit_row_line: usize,

    #[validate(length(min = 1))]
    pub encoding: String,
}

impl StationIndexLayout {
    fn required_columns(&self) -> [usize; 7] {
        [
            self.id_column,
            self.name_column,
            self.precipitation_latitude_column,
            self.precipitation_longitude_column,
            self.snow_latitude_column,
            self.snow_longitude_column,
            self.end_date_column,
        ]
    }

    /// Every configured column, required ones first
    pub fn columns(&self) -> Vec<usize> {
        let optional = [
            self.prefecture_column,
            self.long_name_column,
            self.address_column,
            self.altitude_column,
        ];
        self.required_columns()
            .into_iter()
            .chain(optional.into_iter().flatten())
            .collect()
    }

    /// Narrowest row that still holds every required column
    pub fn min_columns(&self) -> usize {
        self.required_columns().iter().max().map_or(0, |c| c + 1)
    }
}

impl Default for StationIndexLayout {
    fn default() -> Self {
        Self {
            id_column: 0,
            name_column: 1,
            precipitation_latitude_column: 2,
            precipitation_longitude_column: 3,
            snow_latitude_column: 4,
            snow_longitude_column: 5,
            end_date_column: 6,
            prefecture_column: Some(7),
            long_name_column: Some(8),
            address_column: Some(9),
            altitude_column: Some(10),
            unit_row_line: DEFAULT_UNIT_ROW_LINE,
            encoding: DEFAULT_STATION_INDEX_ENCODING.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        let normals_dir = data_dir.join("raw").join("jma-normal");

        Self {
            station_index_file: normals_dir.join("station").join("amedas_station_index.csv"),
            normals_dir,
            wbgt_dir: data_dir.join("raw").join("env-wbgt"),
            output_dir: data_dir.join("processed"),
            daily_prefix: DAILY_NORMALS_PREFIX.to_string(),
            monthly_prefix: MONTHLY_NORMALS_PREFIX.to_string(),
            hourly_prefix: HOURLY_WBGT_PREFIX.to_string(),
            expected_hourly_files: DEFAULT_EXPECTED_HOURLY_FILES,
            monthly_units: MONTHLY_UNITS,
            max_workers: num_cpus::get(),
            station_index: StationIndexLayout::default(),
        }
    }
}

impl PipelineConfig {
    /// Load defaults, then `file` (when given), then `AMEDAS_*` variables
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Range checks plus the cross-field rules `validator` can't express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        let columns = self.station_index.columns();
        let distinct: HashSet<usize> = columns.iter().copied().collect();
        if distinct.len() != columns.len() {
            return Err(ProcessingError::Config(format!(
                "Station index columns must be distinct, got {:?}",
                columns
            )));
        }

        if encoding_rs::Encoding::for_label(self.station_index.encoding.as_bytes()).is_none() {
            return Err(ProcessingError::Config(format!(
                "Unknown station index encoding: '{}'",
                self.station_index.encoding
            )));
        }

        Ok(())
    }

    pub fn daily_normals_dir(&self) -> PathBuf {
        self.normals_dir.join(DAILY_NORMALS_DIR)
    }

    pub fn monthly_normals_dir(&self) -> PathBuf {
        self.normals_dir.join(MONTHLY_NORMALS_DIR)
    }
}
