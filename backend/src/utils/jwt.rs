//! JWT token utilities for session token issuance.
//!
//! Provides signed, time-limited token creation for authenticated users.
//! Tokens are stateless; nothing is persisted server-side and validity is
//! determined solely by signature and expiry at verification time.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ServiceError;

/// JWT Claims structure binding a user id to an expiry timestamp
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating session tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the application config
    pub fn new(config: &Config) -> Self {
        JwtUtils {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Generate a new signed token bound to the given user id
    pub fn generate_token(&self, user_id: String) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}
