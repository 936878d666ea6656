use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No projects found in source data")]
    EmptyInput,

    #[error("Time units are not recognised for projects with id: {}", ids.join(", "))]
    UnknownTimeUnits { ids: Vec<String> },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    InputData,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PlannerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlannerError::ConfigError { .. }
            | PlannerError::ConfigValidationError { .. }
            | PlannerError::InvalidConfigValueError { .. }
            | PlannerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlannerError::SerializationError(_)
            | PlannerError::EmptyInput
            | PlannerError::UnknownTimeUnits { .. } => ErrorCategory::InputData,
            PlannerError::IoError(_) => ErrorCategory::Io,
            PlannerError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::InputData => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PlannerError::IoError(_) => {
                "Check that the source file exists and the target directory is writable".to_string()
            }
            PlannerError::SerializationError(_) => {
                "Make sure the source file is a JSON array of project objects".to_string()
            }
            PlannerError::ConfigError { .. } | PlannerError::ConfigValidationError { .. } => {
                "Review the configuration file or command line flags".to_string()
            }
            PlannerError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            PlannerError::MissingConfigError { field } => {
                format!("Set '{}' on the command line or in the configuration file", field)
            }
            PlannerError::EmptyInput => "Add at least one project to the source file".to_string(),
            PlannerError::UnknownTimeUnits { .. } => {
                "Use one of the supported time units: year, month, day".to_string()
            }
            PlannerError::ProcessingError { .. } => {
                "Retry the run; if it keeps failing, lower --iterations or --workers".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::InputData => format!("Source data problem: {}", self),
            ErrorCategory::Io => format!("File access problem: {}", self),
            ErrorCategory::Processing => format!("Planning failed: {}", self),
        }
    }

    /// Process exit code matching the severity of the failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_time_units_lists_ids() {
        let err = PlannerError::UnknownTimeUnits {
            ids: vec!["p1".to_string(), "p7".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Time units are not recognised for projects with id: p1, p7"
        );
        assert_eq!(err.category(), ErrorCategory::InputData);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_io_errors_are_medium_severity() {
        let err: PlannerError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().starts_with("File access problem"));
    }
}
