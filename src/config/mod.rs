//! Configuration module for Gleaner
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use gleaner::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("gleaner.toml")).unwrap();
//! println!("Collecting up to {} records", config.run.max_records);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BudgetConfig, Config, LlmConfig, OutputConfig, RunConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, mask_secret, parse_config,
    resolve_api_key,
};
pub use validation::validate;
