//! Centralized Error Handling Module
//!
//! Every failure carries a unique code so logs and banners can be matched
//! back to their cause.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - NET_xxx: transport failures (unreachable, timeout, non-2xx)
//! - DECODE_xxx / WRITE_UNCONFIRMED: unreadable response bodies
//! - VALIDATION_xxx: client-side form validation
//! - FLOW_xxx / PROPERTY_xxx / SETTINGS_xxx: misuse of a state component
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Cloneable summary stored in component state
    pub fn failure(&self) -> Failure {
        Failure {
            code: self.code,
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Code + message snapshot of an [`AppError`].
///
/// Component state is cloned into views, and `AppError` holds a boxed
/// source, so state keeps this instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code,
            message: err.message,
        }
    }
}

/// Broad failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Validation,
    Flow,
    Config,
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Transport Errors
    // ============================================
    /// Backend unreachable
    TransportConnectFailed,
    /// Request exceeded the configured timeout
    TransportTimeout,
    /// Backend answered with a non-2xx status
    TransportStatus,
    /// Any other transport failure
    TransportFailed,

    // ============================================
    // Decode Errors
    // ============================================
    /// Response body did not match the expected shape
    DecodeFailed,
    /// A write succeeded but its response could not be read
    WriteUnconfirmed,

    // ============================================
    // Validation Errors
    // ============================================
    /// Offer amount is not a positive number
    ValidationAmount,
    /// Required form field left empty
    ValidationMissingField,
    /// Email address is malformed
    ValidationEmail,

    // ============================================
    // Flow Errors
    // ============================================
    /// Offer form is not open
    FlowNotOpen,
    /// An offer is still being submitted
    FlowBusy,
    /// Property id is not in the loaded listing
    UnknownProperty,
    /// Settings edited or saved before they loaded
    SettingsNotLoaded,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportConnectFailed => "NET_CONNECT_FAILED",
            Self::TransportTimeout => "NET_TIMEOUT",
            Self::TransportStatus => "NET_BAD_STATUS",
            Self::TransportFailed => "NET_FAILED",

            Self::DecodeFailed => "DECODE_FAILED",
            Self::WriteUnconfirmed => "WRITE_UNCONFIRMED",

            Self::ValidationAmount => "VALIDATION_AMOUNT",
            Self::ValidationMissingField => "VALIDATION_MISSING_FIELD",
            Self::ValidationEmail => "VALIDATION_EMAIL",

            Self::FlowNotOpen => "FLOW_NOT_OPEN",
            Self::FlowBusy => "FLOW_BUSY",
            Self::UnknownProperty => "PROPERTY_UNKNOWN",
            Self::SettingsNotLoaded => "SETTINGS_NOT_LOADED",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Category of this code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransportConnectFailed
            | Self::TransportTimeout
            | Self::TransportStatus
            | Self::TransportFailed => ErrorKind::Transport,
            Self::DecodeFailed | Self::WriteUnconfirmed => ErrorKind::Decode,
            Self::ValidationAmount | Self::ValidationMissingField | Self::ValidationEmail => {
                ErrorKind::Validation
            }
            Self::FlowNotOpen | Self::FlowBusy | Self::UnknownProperty | Self::SettingsNotLoaded => {
                ErrorKind::Flow
            }
            Self::ConfigInvalidValue => ErrorKind::Config,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Backend answered with a non-2xx status
    pub fn bad_status(method: &str, path: &str, status: u16) -> Self {
        Self::new(
            ErrorCode::TransportStatus,
            format!("{} {} returned HTTP {}", method, path, status),
        )
    }

    /// Response body could not be decoded
    pub fn decode(path: &str, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        let message = format!("Malformed response from {}: {}", path, err);
        Self::with_source(ErrorCode::DecodeFailed, message, err)
    }

    /// Offer amount rejected
    pub fn invalid_amount(raw: &str) -> Self {
        Self::new(
            ErrorCode::ValidationAmount,
            format!("Offer amount must be a positive number, got {:?}", raw),
        )
    }

    /// Required field empty
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::ValidationMissingField,
            format!("{} is required", field),
        )
    }

    /// Email rejected
    pub fn invalid_email(raw: &str) -> Self {
        Self::new(
            ErrorCode::ValidationEmail,
            format!("{:?} is not a valid email address", raw),
        )
    }

    /// Offer form not open
    pub fn flow_not_open() -> Self {
        Self::new(ErrorCode::FlowNotOpen, "No property selected for an offer")
    }

    /// Offer flow cannot change property mid-submit
    pub fn flow_busy() -> Self {
        Self::new(ErrorCode::FlowBusy, "An offer is still being submitted")
    }

    /// The backend accepted a write but the reply was unreadable. The
    /// record most likely exists, so callers must not resubmit blindly.
    pub fn write_unconfirmed(method: &str, path: &str, err: AppError) -> Self {
        let message = format!(
            "{} {} succeeded but the response could not be read: {}",
            method, path, err.message
        );
        Self::with_source(ErrorCode::WriteUnconfirmed, message, err)
    }

    /// Property not in the loaded listing
    pub fn unknown_property(id: &str) -> Self {
        Self::new(
            ErrorCode::UnknownProperty,
            format!("Property {} is not in the current listing", id),
        )
    }

    /// Settings not available yet
    pub fn settings_not_loaded() -> Self {
        Self::new(
            ErrorCode::SettingsNotLoaded,
            "Settings have not loaded from the backend",
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::with_source(ErrorCode::TransportTimeout, "Request timeout", err)
        } else if err.is_connect() {
            Self::with_source(ErrorCode::TransportConnectFailed, "Connection failed", err)
        } else if err.is_decode() {
            let message = format!("Malformed response: {}", err);
            Self::with_source(ErrorCode::DecodeFailed, message, err)
        } else if let Some(status) = err.status() {
            let message = format!("Backend returned HTTP {}", status.as_u16());
            Self::with_source(ErrorCode::TransportStatus, message, err)
        } else {
            let message = err.to_string();
            Self::with_source(ErrorCode::TransportFailed, message, err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::DecodeFailed, "JSON parse error", err)
    }
}
