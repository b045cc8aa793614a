//! Shared utilities for the Kiln build tool.
//!
//! This crate provides cross-cutting concerns used by all other Kiln crates:
//! error types and filesystem helpers.

pub mod errors;
pub mod fs;
