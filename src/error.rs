use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Could not persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Expected at least {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("Unrecognized element code: '{0}'")]
    UnknownElement(String),

    #[error("Invalid number in {field}: '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    /// Errors confined to a single row or file; the run carries on past them.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ProcessingError::Csv(_)
                | ProcessingError::DateParse(_)
                | ProcessingError::ColumnCount { .. }
                | ProcessingError::UnknownElement(_)
                | ProcessingError::InvalidNumber { .. }
                | ProcessingError::InvalidCoordinate(_)
                | ProcessingError::MissingColumn(_)
                | ProcessingError::InvalidFormat(_)
        )
    }

    /// Short label used when tallying skipped rows in the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessingError::Io(_) => "io",
            ProcessingError::Csv(_) => "csv",
            ProcessingError::Json(_) => "json",
            ProcessingError::DateParse(_) => "date",
            ProcessingError::Config(_) | ProcessingError::ConfigSource(_) => "config",
            ProcessingError::Validation(_) => "validation",
            ProcessingError::Persist(_) => "persist",
            ProcessingError::ColumnCount { .. } => "column_count",
            ProcessingError::UnknownElement(_) => "unknown_element",
            ProcessingError::InvalidNumber { .. } => "invalid_number",
            ProcessingError::InvalidCoordinate(_) => "invalid_coordinate",
            ProcessingError::MissingColumn(_) => "missing_column",
            ProcessingError::InvalidFormat(_) => "invalid_format",
        }
    }
}
