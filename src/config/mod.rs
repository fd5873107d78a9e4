#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{parse_params, CliConfig, Command};
pub use toml_config::AppConfig;
