//! Shared types, errors, and configuration for Buchfink.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for type-safe entity references
//! - IBAN handling in normalized electronic format
//! - The application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::ErrorCategory;
