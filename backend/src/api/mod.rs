//! Central module for organizing the application's API plumbing.
//!
//! This module holds the response envelope and error translation shared by
//! the HTTP surface, excluding core authentication routes which are handled
//! separately.

pub mod common;
