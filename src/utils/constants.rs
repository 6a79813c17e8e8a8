/// Element codes used by the JMA normals tables
pub const ELEMENT_TEMPERATURE: u16 = 500;
pub const ELEMENT_SUNSHINE_DURATION: u16 = 3500;
pub const ELEMENT_PRECIPITATION: u16 = 4000;

/// Every physical quantity in the normals tables is stored in tenths
pub const VALUE_SCALE: f64 = 10.0;

/// Remark code marking a missing value
pub const REMARK_MISSING: i32 = 0;

/// Fixed row layout of the normals tables
pub const DAILY_HEADER_COLUMNS: usize = 7;
pub const DAILY_UNITS: usize = 31;
pub const MONTHLY_HEADER_COLUMNS: usize = 6;
pub const MONTHLY_UNITS: usize = 12;

/// Header column positions shared by both normals layouts
pub const COL_PERIOD_TYPE: usize = 0;
pub const COL_STATION: usize = 1;
pub const COL_ELEMENT: usize = 2;
pub const COL_DATA_YEARS: usize = 3;
pub const COL_START_YEAR: usize = 4;
pub const COL_END_YEAR: usize = 5;
pub const COL_MONTH: usize = 6;

/// Input file name conventions
pub const DAILY_NORMALS_DIR: &str = "daily";
pub const MONTHLY_NORMALS_DIR: &str = "monthly";
pub const DAILY_NORMALS_PREFIX: &str = "nml_amd_d_";
pub const MONTHLY_NORMALS_PREFIX: &str = "nml_amd_m_";
pub const HOURLY_WBGT_PREFIX: &str = "final_wbgt_";
pub const CSV_EXTENSION: &str = "csv";

/// Hourly WBGT table column names
pub const WBGT_DATE_COLUMN: &str = "Date";
pub const WBGT_TIME_COLUMN: &str = "Time";
pub const WBGT_VALUE_COLUMN: &str = "WBGT";

/// 5 years x 7 months (April to October)
pub const DEFAULT_EXPECTED_HOURLY_FILES: usize = 35;

/// Output artifact names
pub const DAILY_NORMAL_FILE: &str = "daily_normal.json";
pub const MONTHLY_YEARLY_NORMAL_FILE: &str = "monthly_yearly_normal.json";
pub const DAILY_WBGT_FILE: &str = "daily_wbgt.json";
pub const MONTHLY_YEARLY_WBGT_FILE: &str = "monthly_yearly_wbgt.json";
pub const STATION_INDEX_FILE: &str = "station_index.json";

/// Station index defaults
pub const DEFAULT_STATION_INDEX_ENCODING: &str = "shift_jis";
pub const DEFAULT_UNIT_ROW_LINE: usize = 2;

/// Decimal places kept in WBGT aggregates
pub const WBGT_DECIMALS: usize = 1;
