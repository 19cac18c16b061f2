// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Hubdesk helpdesk service.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and miette diagnostic rendering.
//!
//! # Usage
//!
//! ```no_run
//! use hubdesk_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Service name: {}", config.service.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::HubdeskConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid `HubdeskConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<HubdeskConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<HubdeskConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_toml_passes_end_to_end() {
        let config = load_and_validate_str(
            r#"
            [service]
            log_level = "debug"

            [gateway]
            auth_secret = "0123456789abcdef0123"
            "#,
        )
        .expect("config should be valid");
        assert_eq!(config.service.log_level, "debug");
    }

    #[test]
    fn invalid_value_yields_diagnostics() {
        let errors = load_and_validate_str(
            r#"
            [service]
            log_level = "shouting"
            "#,
        )
        .expect_err("bad log level should fail validation");
        assert!(!errors.is_empty());
    }
}
