//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for user registration and
//! login, parse request data, and interact with the `auth::service` for core
//! business logic.

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, ResponseJson<RegisterResponse>), (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.register(payload).await {
        Ok(response) => Ok((StatusCode::CREATED, ResponseJson(response))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    let auth_service = AuthService::new(&pool, &config);

    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}
