//! Configuration module for tsubuyaki
//!
//! File, environment and CLI settings are folded into one `AppConfig`,
//! which hands the pipeline its options.

pub mod app_config;
pub mod path_resolver;

pub use app_config::AppConfig;
