//! Core business logic for the authentication system.

use crate::auth::models::*;
use crate::config::Config;
use crate::database::models::CreateUser;
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::JwtUtils;
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

/// Authentication service for handling registration, login, and token issuance
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt_utils: JwtUtils,
}

/// Normalizes an email for lookup and storage: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService instance
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            jwt_utils: JwtUtils::new(config),
        }
    }

    /// Register a new user: validate the payload, hash the password, and
    /// persist the credential record.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<RegisterResponse> {
        // Validate input
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let email = normalize_email(&request.email);

        let repo = UserRepository::new(self.pool);
        if repo.get_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::already_exists("User", &email));
        }

        let password_hash = Self::hash_password(request.password).await?;

        let data = CreateUser {
            id: Uuid::now_v7().to_string(),
            email: email.clone(),
            password_hash,
        };

        // The pre-check above is racy; the UNIQUE index on users.email is the
        // actual guarantee, so its violation maps to the same duplicate error.
        repo.create_user(data).await.map_err(|e| {
            let error_msg = e.to_string();
            if error_msg.contains("UNIQUE constraint failed: users.email") {
                ServiceError::already_exists("User", &email)
            } else {
                ServiceError::Database { source: e }
            }
        })?;

        Ok(RegisterResponse {
            message: "User has been created".to_string(),
        })
    }

    /// Authenticate a user and issue a session token.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        // Validate input
        if let Err(validation_errors) = request.validate() {
            let error_messages: Vec<String> = validation_errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| {
                        format!(
                            "{}: {}",
                            field,
                            error.message.as_ref().unwrap_or(&"Invalid value".into())
                        )
                    })
                })
                .collect();
            return Err(ServiceError::validation(error_messages.join(", ")));
        }

        let email = normalize_email(&request.email);

        let repo = UserRepository::new(self.pool);
        // Unknown account and wrong password are reported as distinct errors
        // by the public contract.
        let user = repo
            .get_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", &email))?;

        let is_match = Self::verify_password(request.password, user.password_hash.clone()).await?;
        if !is_match {
            return Err(ServiceError::invalid_credentials("Wrong password, try again"));
        }

        let token = self.jwt_utils.generate_token(user.id.clone())?;

        Ok(LoginResponse {
            token,
            user_id: user.id,
        })
    }

    /// Derives the salted bcrypt hash for a password on the blocking pool.
    /// Cost 12 keeps each call off the latency-sensitive path.
    async fn hash_password(password: String) -> ServiceResult<String> {
        tokio::task::spawn_blocking(move || hash(&password, DEFAULT_COST))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Verifies a password against the stored hash on the blocking pool.
    async fn verify_password(password: String, password_hash: String) -> ServiceResult<bool> {
        tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Verification task failed: {}", e)))?
            .map_err(|e| {
                ServiceError::internal_error(format!("Password verification failed: {}", e))
            })
    }
}
