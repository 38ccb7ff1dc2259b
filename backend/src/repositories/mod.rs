//! Module for database repositories.
//!
//! Each repository encapsulates the persistence operations for one entity.

pub mod user_repository;
