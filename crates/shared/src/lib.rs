//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list queries
//! - Deadline handling for long-running reads
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
