use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiffError {
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

    #[error("Failed to parse {file} line {line}: {message}")]
    ParseError {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Order size {ordered} exceeds the configured cap of {cap}")]
    CapacityExceeded { ordered: u32, cap: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Input,
    Planning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DiffError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DiffError::IoError(_) => ErrorCategory::Io,
            DiffError::ConfigValidationError { .. } | DiffError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            DiffError::CsvError(_)
            | DiffError::SerializationError(_)
            | DiffError::ParseError { .. } => ErrorCategory::Input,
            DiffError::ValidationError { .. } | DiffError::CapacityExceeded { .. } => {
                ErrorCategory::Planning
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DiffError::CapacityExceeded { .. } => ErrorSeverity::Medium,
            DiffError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            DiffError::IoError(_) => {
                "Check that the decklist and output directories exist and are writable".to_string()
            }
            DiffError::CsvError(_) => {
                "Re-export the collection csv; the first column must be count and the third name"
                    .to_string()
            }
            DiffError::SerializationError(_) => {
                "Remove the previous output files and run again".to_string()
            }
            DiffError::ConfigValidationError { .. } | DiffError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and run again".to_string()
            }
            DiffError::ParseError { file, line, .. } => {
                format!("Fix line {} of {} (expected '<count> <card name>')", line, file)
            }
            DiffError::ValidationError { .. } => {
                "Keep exactly one collection export under the Collection directory".to_string()
            }
            DiffError::CapacityExceeded { .. } => {
                "Split the brews across runs, raise --max-order-size, or drop --enforce-order-cap"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DiffError::IoError(e) => format!("Could not read or write a file: {}", e),
            DiffError::ValidationError { message } => format!("Decklists are not usable: {}", message),
            DiffError::CapacityExceeded { ordered, cap } => format!(
                "The plan orders {} cards but a single order holds at most {}",
                ordered, cap
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_is_medium_severity() {
        let err = DiffError::CapacityExceeded {
            ordered: 700,
            cap: 612,
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.category(), ErrorCategory::Planning);
        assert!(err.user_friendly_message().contains("700"));
    }

    #[test]
    fn test_parse_error_suggestion_names_location() {
        let err = DiffError::ParseError {
            file: "BrewingNew/Zoo.txt".to_string(),
            line: 4,
            message: "missing count".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.recovery_suggestion().contains("line 4 of BrewingNew/Zoo.txt"));
    }
}
