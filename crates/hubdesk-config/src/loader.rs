// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hubdesk.toml` > `~/.config/hubdesk/hubdesk.toml`
//! > `/etc/hubdesk/hubdesk.toml` with environment variable overrides via the
//! `HUBDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HubdeskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hubdesk/hubdesk.toml` (system-wide)
/// 3. `~/.config/hubdesk/hubdesk.toml` (user XDG config)
/// 4. `./hubdesk.toml` (local directory)
/// 5. `HUBDESK_*` environment variables
pub fn load_config() -> Result<HubdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubdeskConfig::default()))
        .merge(Toml::file("/etc/hubdesk/hubdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hubdesk/hubdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hubdesk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HubdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HubdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HubdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `HUBDESK_GATEWAY_AUTH_SECRET` must map
/// to `gateway.auth_secret`, not `gateway.auth.secret`.
fn env_provider() -> Env {
    Env::prefixed("HUBDESK_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("messenger_", "messenger.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
