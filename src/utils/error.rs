use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Schema error: {message}")]
    SchemaError { message: String },

    #[error("Removal config row {row}: {message}")]
    ConfigError { row: usize, message: String },

    #[error("Spreadsheet read failed: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Workbook write failed: {0}")]
    WorkbookWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Config,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CleanerError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SchemaError { .. } | Self::SpreadsheetError(_) | Self::CsvError(_) => {
                ErrorCategory::Schema
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::IoError(_) => ErrorCategory::Io,
            Self::WorkbookWriteError(_)
            | Self::SerializationError(_)
            | Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // skipped record, the run carries on
            Self::ConfigError { .. } => ErrorSeverity::Low,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Medium,
            Self::SchemaError { .. }
            | Self::SpreadsheetError(_)
            | Self::CsvError(_)
            | Self::ProcessingError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::WorkbookWriteError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::SchemaError { .. } => {
                "Check that the order sheet's first row contains the supplier header and that the template has a 'shop_code' column"
            }
            Self::ConfigError { .. } => {
                "Fix or remove the reported row in the removal template"
            }
            Self::SpreadsheetError(_) => {
                "Make sure the file is a valid Excel/ODS workbook and is not password protected"
            }
            Self::CsvError(_) => "Make sure the CSV template has a header row and UTF-8 content",
            Self::IoError(_) => "Check that the paths exist and are readable/writable",
            Self::WorkbookWriteError(_) | Self::SerializationError(_) => {
                "Check free disk space and the output file name"
            }
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the command line flags and settings file"
            }
            Self::ProcessingError { .. } => "Re-run with --verbose and inspect the log output",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SchemaError { message } => format!("The input layout is not as expected: {}", message),
            Self::ConfigError { row, message } => {
                format!("Template row {} was skipped: {}", row, message)
            }
            Self::SpreadsheetError(e) => format!("Could not read the spreadsheet: {}", e),
            Self::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_is_low_severity() {
        let err = CleanerError::ConfigError {
            row: 4,
            message: "shop_code is missing".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(err.user_friendly_message().contains("row 4"));
    }

    #[test]
    fn test_schema_error_is_fatal() {
        let err = CleanerError::schema("supplier column not found");
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.to_string(), "Schema error: supplier column not found");
    }
}
