// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic rendering for configuration errors.

use miette::Diagnostic;
use thiserror::Error;

/// A single configuration problem, rendered through miette.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{message}")]
pub struct ConfigError {
    pub message: String,
    #[help]
    pub help: Option<String>,
}

impl ConfigError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Convert a figment extraction error into per-key diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| {
            let path = e.path.join(".");
            let message = e.to_string();
            if path.is_empty() {
                ConfigError::new(message)
            } else {
                ConfigError::with_help(message, format!("config key: {path}"))
            }
        })
        .collect()
}

/// Render all diagnostics to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }
}
