//! Municipal budget report
//!
//! Reads a town's general-account budget (category totals plus revenue and
//! expenditure line items) and derives the figures a resident-facing report
//! needs: totals, rankings, year-over-year changes, funding sources, category
//! drill-downs and keyword search.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Typed rows and the thousand-yen `Amount`
//! - `storage`: SQLite and CSV loading, validation and the dataset snapshot
//! - `format`: 億円/万円 amount formatting
//! - `reports`: Aggregations over the snapshot
//! - `search`: Keyword search over line items
//! - `display`: Terminal tables and bars
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers for the `mbudget` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use municipal_budget::config::{BudgetPaths, Settings};
//! use municipal_budget::storage::DatasetLoader;
//!
//! let paths = BudgetPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let loader = DatasetLoader::new(settings.dataset_location(&paths, None));
//! let dataset = loader.get()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod reports;
pub mod search;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
