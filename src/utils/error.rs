use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Storage,
    Format,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RosterError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        RosterError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        RosterError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RosterError::InvalidArgument { .. } => ErrorCategory::Validation,
            RosterError::IoError(_) => ErrorCategory::Storage,
            RosterError::ParseError(_) | RosterError::CsvError(_) => ErrorCategory::Format,
            RosterError::ConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RosterError::InvalidArgument { .. } => ErrorSeverity::High,
            RosterError::ConfigError { .. } => ErrorSeverity::High,
            RosterError::IoError(_) => ErrorSeverity::Critical,
            RosterError::ParseError(_) => ErrorSeverity::Critical,
            RosterError::CsvError(_) => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RosterError::InvalidArgument { .. } => {
                "Check the values you entered: ids must be positive and names cannot be blank"
            }
            RosterError::IoError(_) => {
                "Check that the data file path exists and is readable/writable"
            }
            RosterError::ParseError(_) => {
                "The data file is not a valid school roster; fix or remove it and try again"
            }
            RosterError::CsvError(_) => "Check the report output path and try again",
            RosterError::ConfigError { .. } => {
                "Check the configuration file and the environment variables it references"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RosterError::InvalidArgument { message } => format!("Invalid input: {}", message),
            RosterError::IoError(e) => format!("Could not access the data file: {}", e),
            RosterError::ParseError(e) => format!("The data file is corrupt: {}", e),
            RosterError::CsvError(e) => format!("Could not write the report: {}", e),
            RosterError::ConfigError { message } => format!("Configuration problem: {}", message),
        }
    }

    /// 依嚴重程度決定 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = RosterError::invalid_argument("Student ID must be positive.");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.user_friendly_message().contains("Student ID must be positive."));

        let parse: RosterError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert_eq!(parse.category(), ErrorCategory::Format);
        assert_eq!(parse.exit_code(), 3);

        let io: RosterError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(io.category(), ErrorCategory::Storage);
        assert!(io.to_string().contains("disk full"));
    }
}
