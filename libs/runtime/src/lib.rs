//! Runtime support shared by the dashboard binaries: layered configuration,
//! home directory resolution and logging initialization.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, ApiConfig, AppConfig, CliArgs, LoggingConfig, Section, StorageConfig,
};
