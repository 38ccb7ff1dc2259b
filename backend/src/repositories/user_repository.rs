//! Database repository for user credential records.
//!
//! Provides persistence operations for the User entity

use crate::database::models::{CreateUser, User};
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for user database operations.
///
/// Handles all persistence operations for the User entity. Email uniqueness
/// is guaranteed by the UNIQUE index on `users.email`, not by this layer.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser DTO containing the id, email, and password hash
    ///
    /// # Returns
    /// The newly created User with all fields populated
    ///
    /// # Errors
    /// A duplicate email surfaces as a UNIQUE-constraint violation from the
    /// store; callers translate it rather than treating it as fatal.
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let created_at = Utc::now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Retrieves a user by their email.
    ///
    /// # Arguments
    /// * `email` - Email to search for, already normalized by the caller
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn record(id: &str, email: &str) -> CreateUser {
        CreateUser {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: "$2b$12$fakefakefakefakefakefakefakefakefakefakefakefakefake".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_email() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo.create_user(record("u1", "a@b.com")).await.unwrap();
        assert_eq!(created.id, "u1");

        let found = repo.get_user_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(found.id, "u1");
        assert_eq!(found.email, "a@b.com");

        assert!(repo.get_user_by_email("c@d.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_insert_with_same_email_hits_unique_constraint() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create_user(record("u1", "a@b.com")).await.unwrap();

        let err = repo.create_user(record("u2", "a@b.com")).await.unwrap_err();
        assert!(err.to_string().contains("UNIQUE constraint failed: users.email"));
    }
}
