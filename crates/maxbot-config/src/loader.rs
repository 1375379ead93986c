// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/maxbot/maxbot.toml`
//! 3. `~/.config/maxbot/maxbot.toml`
//! 4. `./maxbot.toml`
//! 5. `MAXBOT_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::debug;

use crate::model::MaxbotConfig;

/// Config sections addressable from the environment. `MAXBOT_<SECTION>_<KEY>`
/// maps to `<section>.<key>`, with the key keeping its own underscores.
const ENV_SECTIONS: &[&str] = &["api", "polling", "webhook", "debug", "logging"];

pub(crate) const SYSTEM_CONFIG_PATH: &str = "/etc/maxbot/maxbot.toml";
pub(crate) const LOCAL_CONFIG_PATH: &str = "maxbot.toml";

pub(crate) fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("maxbot/maxbot.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<MaxbotConfig, figment::Error> {
    debug!(
        system = SYSTEM_CONFIG_PATH,
        user = %user_config_path().display(),
        local = LOCAL_CONFIG_PATH,
        "loading layered configuration"
    );
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MaxbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MaxbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MaxbotConfig, figment::Error> {
    debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(MaxbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full Figment before extraction, for callers that inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MaxbotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Splitting on `_` would turn `MAXBOT_WEBHOOK_BIND_ADDRESS` into
/// `webhook.bind.address`, so only the first separator after a known section
/// name becomes a dot.
pub fn env_provider() -> Env {
    Env::prefixed("MAXBOT_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
