use thiserror::Error;

#[derive(Error, Debug)]
pub enum BriefError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParseError(#[from] feed_rs::parser::ParseFeedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {service}: {message}")]
    ResponseShapeError { service: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Message delivery failed after {attempts} attempt(s): {message}")]
    DeliveryError { attempts: u32, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Data,
    Configuration,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BriefError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BriefError::ApiError(_) => ErrorCategory::Network,
            BriefError::UpstreamError { .. } => ErrorCategory::Upstream,
            BriefError::FeedParseError(_)
            | BriefError::SerializationError(_)
            | BriefError::ResponseShapeError { .. } => ErrorCategory::Data,
            BriefError::ConfigError { .. }
            | BriefError::MissingConfigError { .. }
            | BriefError::InvalidConfigValueError { .. }
            | BriefError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BriefError::DeliveryError { .. } => ErrorCategory::Delivery,
            BriefError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 資料階段會降級為錯誤文字，不會中斷流程
            ErrorCategory::Network | ErrorCategory::Upstream | ErrorCategory::Data => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::High,
            ErrorCategory::Delivery => ErrorSeverity::Critical,
        }
    }

    /// 是否值得重試（逾時、連線錯誤、5xx、429）
    pub fn is_transient(&self) -> bool {
        match self {
            BriefError::ApiError(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            BriefError::UpstreamError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BriefError::ApiError(_) => "Check network connectivity and the endpoint URL",
            BriefError::UpstreamError { status, .. } if *status == 401 || *status == 403 => {
                "Check that the API key or bot token is valid"
            }
            BriefError::UpstreamError { status, .. } if *status == 429 => {
                "The service is rate limiting requests; wait before running again"
            }
            BriefError::UpstreamError { .. } => "The remote service rejected the request; retry later",
            BriefError::FeedParseError(_) => "Check that the feed URL serves RSS or Atom",
            BriefError::SerializationError(_) | BriefError::ResponseShapeError { .. } => {
                "The remote API changed its response format; check the endpoint version"
            }
            BriefError::ConfigError { .. }
            | BriefError::InvalidConfigValueError { .. }
            | BriefError::ConfigValidationError { .. } => "Fix the settings file and run again",
            BriefError::MissingConfigError { .. } => {
                "Set TELEGRAM_TOKEN, TELEGRAM_CHAT_ID and GEMINI_API_KEY in the environment"
            }
            BriefError::DeliveryError { .. } => {
                "Check the bot token, the chat id and that the bot can post to the chat"
            }
            BriefError::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Upstream => format!("A remote service returned an error: {}", self),
            ErrorCategory::Data => format!("Received data in an unexpected format: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Delivery => format!("The brief could not be sent: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BriefError>;
