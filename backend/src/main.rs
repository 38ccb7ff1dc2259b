//! Main entry point for the credential service backend.
//!
//! This file initializes the Axum web server, sets up the database connection,
//! and registers all API routes.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use crate::api::common::ApiResponse;
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting auth server on port {}", config.server_port);
    axum::serve(listener, app(pool, config)).await.unwrap();
}

/// Assembles the application router with its shared state layers.
fn app(pool: SqlitePool, config: Config) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/api/auth", auth::routes::auth_router())
        .layer(Extension(pool))
        .layer(Extension(config))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "Auth Backend",
            "version": "0.1.0"
        }),
        "Welcome to the Auth API",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::util::ServiceExt;

    async fn test_app() -> Router {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 3000,
        };

        app(pool, config)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_returns_service_banner() {
        let app = test_app().await;

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn register_returns_201_with_message() {
        let app = test_app().await;

        let request = post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "a@b.com", "password": "secret1" }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["message"], "User has been created");
    }

    #[tokio::test]
    async fn register_rejects_invalid_payload_with_400() {
        let app = test_app().await;

        let request = post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "not-an-email", "password": "abc" }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("Incorrect e-mail"));
        assert!(message.contains("Minimum password length 6 characters"));
    }

    #[tokio::test]
    async fn duplicate_registration_returns_400() {
        let app = test_app().await;

        let request = post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "a@b.com", "password": "secret1" }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let request = post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "a@b.com", "password": "secret1" }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["error_type"], "already_exists");
    }

    #[tokio::test]
    async fn login_round_trip_with_case_different_email() {
        let app = test_app().await;

        let request = post_json(
            "/api/auth/register",
            serde_json::json!({ "email": "a@b.com", "password": "secret1" }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // Wrong password is a client error, distinct from unknown user.
        let request = post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "a@b.com", "password": "wrong" }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["error_type"], "invalid_credentials");

        // Case-different email logs into the same account.
        let request = post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "A@B.com", "password": "secret1" }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json["userId"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn login_against_unknown_email_returns_400() {
        let app = test_app().await;

        let request = post_json(
            "/api/auth/login",
            serde_json::json!({ "email": "nobody@example.com", "password": "whatever" }),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["error_type"], "not_found");
    }
}
