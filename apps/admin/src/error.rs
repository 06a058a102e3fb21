//! # API Error Type
//!
//! Unified error type for editor commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Product Editor                     │
//! │                                                                         │
//! │  Console / Frontend             Rust Backend                            │
//! │  ──────────────────             ────────────                            │
//! │                                                                         │
//! │  {"cmd":"submit"}                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<EditorView, ApiError>                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Form invalid? ──── FieldErrors ───────────────── ApiError ─────►│  │
//! │  │         │                                   (VALIDATION_ERROR)   │  │
//! │  │         ▼                                                        │  │
//! │  │  Backend rejected? ── ClientError::Rejected ───── ApiError ─────►│  │
//! │  │         │                                       (SAVE_FAILED)    │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use stockroom_client::ClientError;
use stockroom_core::FieldErrors;

/// API error returned from editor commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Product form has 1 invalid field(s)",
///   "fieldErrors": { "name": "name is required" }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field messages, present only for form validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product not found on the backend (404)
    NotFound,

    /// The form failed validation; see `fieldErrors`
    ValidationError,

    /// The backend refused or never received the save
    SaveFailed,

    /// Malformed console input
    InvalidCommand,

    /// A backend call other than save failed
    RemoteError,

    /// Bad configuration
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field_errors: None,
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a form validation error carrying the field map.
    pub fn invalid_form(errors: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: format!("Product form has {} invalid field(s)", errors.len()),
            field_errors: Some(errors),
        }
    }

    /// Creates a save failure with the message shown in the general banner.
    pub fn save_failed(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::SaveFailed, message)
    }

    /// Creates an invalid command error.
    pub fn invalid_command(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidCommand, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts client errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected { status: 404, .. } => {
                ApiError::new(ErrorCode::NotFound, err.user_message())
            }
            ClientError::NotApplicable(reason) => {
                tracing::error!("Strategy not applicable outside fallback: {}", reason);
                ApiError::internal("Operation not available")
            }
            ref e if e.is_config_error() => {
                tracing::error!("Configuration error: {}", e);
                ApiError::new(ErrorCode::ConfigError, "Invalid configuration")
            }
            ref e if e.is_transport_error() => {
                tracing::warn!("Backend unreachable: {}", e);
                ApiError::new(ErrorCode::RemoteError, e.user_message())
            }
            ClientError::Rejected { .. } => ApiError::new(ErrorCode::RemoteError, err.user_message()),
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Backend call failed: {}", other);
                ApiError::new(ErrorCode::RemoteError, other.user_message())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
