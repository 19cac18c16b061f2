// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use crate::diagnostic::ConfigError;
use crate::model::HubdeskConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate semantic constraints figment cannot express.
///
/// Collects all problems rather than stopping at the first.
pub fn validate_config(config: &HubdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::with_help(
            format!("unknown log level `{}`", config.service.log_level),
            format!("expected one of: {}", LOG_LEVELS.join(", ")),
        ));
    }

    if !config.messenger.graph_api_version.starts_with('v') {
        errors.push(ConfigError::with_help(
            format!(
                "invalid graph_api_version `{}`",
                config.messenger.graph_api_version
            ),
            "Graph API versions look like `v19.0`",
        ));
    }

    if let Some(secret) = &config.gateway.auth_secret {
        if secret.len() < 16 {
            errors.push(ConfigError::with_help(
                "gateway.auth_secret is too short",
                "use at least 16 characters",
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::new("storage.database_path cannot be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
