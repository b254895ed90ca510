//! # Jobcast Core
//! Shared types for the jobcast notifier: error type, YAML notification
//! config, GitHub Actions input collection, and step-outcome filtering.

pub mod config;
pub mod error;
pub mod github;
pub mod steps;
