//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard error response format
//! - ServiceError to HTTP status code mapping
//! - Validation error formatting helpers
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `error`: Human-readable message
//! - `error_type`: Machine-readable error category
//! - `details`: Optional field-specific validation errors
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `service_error_to_http` converts to appropriate HTTP response
//! 3. Validation errors are automatically formatted with field details
//!
//! Domain errors (validation, duplicate user, unknown user, bad credentials)
//! are client errors and map to 400. Store and signing failures map to 500
//! with a generic message; the underlying error is logged, never returned.

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Request timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    let (status, error_type, message) = match error {
        ServiceError::Validation { message } => {
            (StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ServiceError::NotFound { entity, identifier } => (
            StatusCode::BAD_REQUEST,
            "not_found",
            format!("{} '{}' not found", entity, identifier),
        ),
        ServiceError::AlreadyExists { entity, identifier } => (
            StatusCode::BAD_REQUEST,
            "already_exists",
            format!("{} '{}' already exists", entity, identifier),
        ),
        ServiceError::InvalidCredentials { message } => {
            (StatusCode::BAD_REQUEST, "invalid_credentials", message)
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {}", source);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error".to_string(),
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            )
        }
    };

    let error_response = ApiResponse::<()>::error(message, error_type, None);
    (status, serde_json::to_string(&error_response).unwrap())
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(errors: validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .unwrap_or(&"Invalid value".into())
                    .to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::RegisterRequest;
    use validator::Validate;

    #[test]
    fn domain_errors_map_to_bad_request() {
        let cases = vec![
            ServiceError::validation("bad input"),
            ServiceError::not_found("User", "a@b.com"),
            ServiceError::already_exists("User", "a@b.com"),
            ServiceError::invalid_credentials("Wrong password, try again"),
        ];

        for error in cases {
            let (status, _) = service_error_to_http(error);
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn internal_errors_map_to_500_with_generic_message() {
        let (status, body) =
            service_error_to_http(ServiceError::internal_error("bcrypt blew up: cost=12"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let parsed: ApiResponse<()> = serde_json::from_str(&body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message, "Internal server error");
        // The underlying detail must never reach the caller.
        assert!(!body.contains("bcrypt"));
    }

    #[test]
    fn error_body_carries_error_type() {
        let (_, body) = service_error_to_http(ServiceError::invalid_credentials("nope"));
        let parsed: ApiResponse<()> = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.error.unwrap().error_type, "invalid_credentials");
    }

    #[test]
    fn field_errors_report_each_failed_field() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "abc".to_string(),
        };
        let errors = request.validate().unwrap_err();

        let field_errors = validation_errors_to_field_errors(errors);
        assert_eq!(field_errors.len(), 2);

        let fields: Vec<&str> = field_errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
    }
}
