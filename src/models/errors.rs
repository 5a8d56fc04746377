//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so operators can grep the
//! platform logs for it.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - API_xxx: request-level errors
//! - INPUT_xxx: field validation
//! - STAFF_xxx / SCHEDULE_xxx: registry and booking rules
//! - STORE_xxx: CSV storage
//! - CFG_xxx: configuration errors

use axum::{
    extract::rejection::{FormRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use tracing::{error, warn};

use crate::api::types::{ApiError, ApiResponse};

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

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // API Errors
    // ============================================
    /// Malformed request body
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Route or resource not found
    ApiNotFound,

    // ============================================
    // Validation
    // ============================================
    /// A field failed validation
    InputInvalid,

    // ============================================
    // Registry & Booking
    // ============================================
    /// Booking references an unknown staff email
    StaffNotFound,
    /// Staff email already registered
    StaffDuplicate,
    /// Staff member already booked for the slot
    ScheduleConflict,

    // ============================================
    // Storage
    // ============================================
    /// Reading or writing a data file failed
    StoreIo,
    /// Data file header lacks a required column
    StoreDataCorrupt,

    // ============================================
    // Configuration
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::InputInvalid => "INPUT_INVALID",

            Self::StaffNotFound => "STAFF_NOT_FOUND",
            Self::StaffDuplicate => "STAFF_DUPLICATE",
            Self::ScheduleConflict => "SCHEDULE_CONFLICT",

            Self::StoreIo => "STORE_IO",
            Self::StoreDataCorrupt => "STORE_DATA_CORRUPT",

            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest => 400,
            Self::ApiNotFound | Self::StaffNotFound => 404,
            Self::StaffDuplicate | Self::ScheduleConflict => 409,
            Self::InputInvalid => 422,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }

    /// Client mistakes are logged at warn, everything else at error
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Field validation failed
    pub fn invalid_input(field: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InputInvalid, format!("{}: {}", field, msg))
    }

    /// Unknown staff email
    pub fn staff_not_found(email: &str) -> Self {
        Self::new(
            ErrorCode::StaffNotFound,
            format!("Staff not found: {}", email),
        )
    }

    /// Email already registered
    pub fn staff_duplicate(email: &str) -> Self {
        Self::new(
            ErrorCode::StaffDuplicate,
            format!("Staff already registered: {}", email),
        )
    }

    /// Slot already taken
    pub fn schedule_conflict(staff_name: &str, date: &str, time: &str) -> Self {
        Self::new(
            ErrorCode::ScheduleConflict,
            format!("{} is already booked on {} at {}", staff_name, date, time),
        )
    }

    /// Data file header is missing columns
    pub fn data_corrupt(file: &str, missing: &[&str]) -> Self {
        Self::new(
            ErrorCode::StoreDataCorrupt,
            format!("{} is missing columns: {}", file, missing.join(", ")),
        )
    }

    /// IO failure on a data file
    pub fn store_io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::with_source(ErrorCode::StoreIo, context, source)
    }

    /// Missing environment variable
    pub fn missing_env(name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingEnv,
            format!("Missing environment variable: {}", name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_config(name: &str, msg: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, format!("{}: {}", name, msg))
    }

    /// No route matched
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorCode::ApiNotFound, format!("No route for {}", path))
    }

    /// Rate limit exceeded
    pub fn rate_limited(retry_after: u64) -> Self {
        Self::new(
            ErrorCode::ApiRateLimited,
            format!("Rate limit exceeded. Retry after {} seconds", retry_after),
        )
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

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::StoreIo, "IO error", err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        Self::bad_request(err.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        Self::bad_request(err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        Self::bad_request(err.body_text())
    }
}

// ============================================
// HTTP rendering
// ============================================

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        ApiError {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: err.source.as_ref().map(|s| s.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.code.is_client_error() {
            warn!(code = self.code_str(), "{}", self.message);
        } else {
            error!(code = self.code_str(), error = ?self.source, "{}", self.message);
        }

        let status =
            StatusCode::from_u16(self.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ApiResponse::error(ApiError::from(&self), 0.0);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::staff_not_found("ghost@truck.io");
        assert_eq!(err.code, ErrorCode::StaffNotFound);
        assert_eq!(err.code_str(), "STAFF_NOT_FOUND");
        assert!(err.to_string().contains("ghost@truck.io"));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::StaffNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ScheduleConflict.http_status(), 409);
        assert_eq!(ErrorCode::InputInvalid.http_status(), 422);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::StoreIo.http_status(), 500);
    }

    #[test]
    fn test_client_error_split() {
        assert!(ErrorCode::ScheduleConflict.is_client_error());
        assert!(!ErrorCode::StoreDataCorrupt.is_client_error());
    }

    #[test]
    fn test_source_surfaces_in_details() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let err = AppError::store_io("append users.csv", io);
        let api: ApiError = (&err).into();
        assert_eq!(api.code, "STORE_IO");
        assert_eq!(api.details.as_deref(), Some("read-only fs"));
    }
}
