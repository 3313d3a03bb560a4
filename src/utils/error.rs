use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpbitError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Token signing error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Authentication error: {message}")]
    AuthError { message: String },

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

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Configuration,
    Request,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl UpbitError {
    pub fn auth(message: impl Into<String>) -> Self {
        UpbitError::AuthError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        UpbitError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            UpbitError::ApiError(_) => ErrorCategory::Network,
            UpbitError::AuthError { .. } | UpbitError::TokenError(_) => {
                ErrorCategory::Authentication
            }
            UpbitError::ConfigError { .. }
            | UpbitError::ConfigValidationError { .. }
            | UpbitError::InvalidConfigValueError { .. }
            | UpbitError::MissingConfigError { .. }
            | UpbitError::UrlError(_) => ErrorCategory::Configuration,
            UpbitError::ValidationError { .. } | UpbitError::SerializationError(_) => {
                ErrorCategory::Request
            }
            UpbitError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Request => ErrorSeverity::High,
            ErrorCategory::Authentication | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            UpbitError::ApiError(e) if e.is_timeout() => {
                "Increase timeout_seconds or check network latency to the exchange"
            }
            UpbitError::ApiError(_) => "Check network connectivity and the configured base URL",
            UpbitError::AuthError { .. } | UpbitError::TokenError(_) => {
                "Set UPBIT_ACCESS_KEY and UPBIT_SECRET_KEY to a valid API key pair"
            }
            UpbitError::MissingConfigError { .. } => {
                "Provide the missing value via the config file or environment"
            }
            UpbitError::ConfigError { .. }
            | UpbitError::ConfigValidationError { .. }
            | UpbitError::InvalidConfigValueError { .. }
            | UpbitError::UrlError(_) => "Review the configuration file syntax and values",
            UpbitError::ValidationError { .. } => "Check the request parameters",
            UpbitError::SerializationError(_) => "Check the request struct contents",
            UpbitError::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the exchange: {}", self),
            ErrorCategory::Authentication => format!("Authentication failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Request => format!("Invalid request: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, UpbitError>;
