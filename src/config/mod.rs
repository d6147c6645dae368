//! Configuration module.
//!
//! Settings resolve through a precedence chain (defaults, then the TOML
//! config file, then environment variables, then CLI arguments) with each
//! step an explicit function so the chain is testable piecewise.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};
