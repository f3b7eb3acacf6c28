//! Shared types, errors, and configuration for the kinder workspace.

pub mod config;
pub mod error;
pub mod types;
