//! Configuration Module
//!
//! Provides file-based configuration for apexdoc, allowing projects to
//! override paths, category tables and validation rule sets via
//! `.apexdoc.toml` and `APEXDOC_*` environment variables.

mod file_config;

pub use file_config::{
    CategoryConfig, ConformanceConfig, DEFAULT_CONFIG_FILENAME, DemoConfig, ENV_PREFIX,
    FileConfig, GeneralConfig, LayoutConfig, LoggingConfig,
};
