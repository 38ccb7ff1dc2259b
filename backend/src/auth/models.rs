//! Data structures for authentication-related entities.
//!
//! This module defines the request and response payloads for user
//! registration and login, used for data transfer within the
//! authentication flow.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Incorrect e-mail"))]
    pub email: String,

    #[validate(length(min = 6, message = "Minimum password length 6 characters"))]
    pub password: String,
}

/// Registration confirmation, carries no sensitive data
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Login request payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter correct e-mail"))]
    pub email: String,

    #[validate(length(min = 1, message = "Enter your password"))]
    pub password: String,
}

/// Login response containing the session token and the user's id.
/// `userId` is camelCase on the wire per the public API contract.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}
