use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApigeeError {
    #[error("Invalid value for field '{field}': {value} ({reason})")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown field '{field}' for {kind}")]
    UnknownFieldError { kind: String, field: String },

    #[error("HTTP request to {endpoint} failed: {source}")]
    TransportError {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unparseable response from {endpoint}: {message}")]
    FormatError { endpoint: String, message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Remote,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApigeeError {
    pub fn validation(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::UnknownFieldError { .. } => {
                ErrorCategory::Validation
            }
            Self::TransportError { .. } => ErrorCategory::Network,
            Self::ApiError { .. } | Self::FormatError { .. } => ErrorCategory::Remote,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TransportError { .. } => ErrorSeverity::Medium,
            Self::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::UnknownFieldError { .. }
            | Self::ApiError { .. }
            | Self::FormatError { .. }
            | Self::ConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    /// HTTP status of a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::TransportError { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, value, .. } => {
                format!("'{}' is not an accepted value for {}", value, field)
            }
            Self::UnknownFieldError { kind, field } => {
                format!("{} has no field named '{}'", kind, field)
            }
            Self::TransportError { endpoint, .. } => {
                format!("Could not reach {}", endpoint)
            }
            Self::ApiError { status: 401, .. } | Self::ApiError { status: 403, .. } => {
                "The management API rejected the supplied credentials".to_string()
            }
            Self::ApiError { status: 404, endpoint, .. } => {
                format!("Resource not found: {}", endpoint)
            }
            Self::ApiError { status, .. } => format!("The management API answered with HTTP {}", status),
            Self::FormatError { endpoint, .. } => {
                format!("The response from {} could not be read", endpoint)
            }
            Self::ConfigError { field, message } => format!("Configuration problem ({}): {}", field, message),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(e) => format!("JSON error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApigeeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_severity_depends_on_status() {
        let server_side = ApigeeError::ApiError {
            endpoint: "/limits".to_string(),
            status: 503,
            body: String::new(),
        };
        let client_side = ApigeeError::ApiError {
            endpoint: "/limits".to_string(),
            status: 404,
            body: String::new(),
        };

        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.severity(), ErrorSeverity::High);
        assert_eq!(client_side.status(), Some(404));
        assert_eq!(client_side.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_validation_error_message() {
        let err = ApigeeError::validation("quotaType", "Bogus", "not an allowed value");
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'quotaType': Bogus (not an allowed value)"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.user_friendly_message().contains("quotaType"));
    }
}
