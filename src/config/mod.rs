//! Configuration module
//!
//! This module provides configuration management including:
//! - Base directory resolution
//! - Report settings persistence

pub mod paths;
pub mod settings;

pub use paths::BudgetPaths;
pub use settings::Settings;
