use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A header the loader needs is not present
    #[error("{source_name}: missing column '{column}'")]
    MissingColumn { source_name: String, column: String },

    /// A row lacks a value the loader needs (strict mode only)
    #[error("{source_name}: row {row} has no value for '{column}'")]
    MissingField {
        source_name: String,
        row: usize,
        column: String,
    },

    /// Compatibility table is not a well-formed square table
    #[error("Invalid compatibility table: {0}")]
    InvalidTable(String),

    /// Invalid loader configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CatalogError {
    pub fn missing_column(source_name: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            source_name: source_name.into(),
            column: column.into(),
        }
    }

    pub fn missing_field(
        source_name: impl Into<String>,
        row: usize,
        column: impl Into<String>,
    ) -> Self {
        Self::MissingField {
            source_name: source_name.into(),
            row,
            column: column.into(),
        }
    }

    /// Create an invalid table error
    pub fn invalid_table(msg: impl Into<String>) -> Self {
        Self::InvalidTable(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
