// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express. Every failing rule is
//! reported; validation does not stop at the first error.

use crate::diagnostic::ConfigError;
use crate::model::MaxbotConfig;

/// Largest page size the Bot API accepts for `GET /updates`.
pub const MAX_POLL_LIMIT: u32 = 1000;

/// Largest long-poll timeout the Bot API accepts, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 90;

pub const MAX_RETRIES_CEILING: u32 = 10;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &MaxbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "api.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.api.version.trim().is_empty() {
        fail("api.version must not be empty".to_string());
    }

    if config.api.timeout_secs == 0 {
        fail("api.timeout_secs must be greater than 0".to_string());
    } else if config.api.timeout_secs > MAX_TIMEOUT_SECS {
        fail(format!(
            "api.timeout_secs must be at most {MAX_TIMEOUT_SECS}, got {}",
            config.api.timeout_secs
        ));
    }

    if !(1..=MAX_POLL_LIMIT).contains(&config.polling.limit) {
        fail(format!(
            "polling.limit must be between 1 and {MAX_POLL_LIMIT}, got {}",
            config.polling.limit
        ));
    }

    if config.polling.pause_ms == 0 {
        fail("polling.pause_ms must be greater than 0".to_string());
    }

    if config.polling.queue_capacity == 0 {
        fail("polling.queue_capacity must be greater than 0".to_string());
    }

    if config.polling.max_retries > MAX_RETRIES_CEILING {
        fail(format!(
            "polling.max_retries must be at most {MAX_RETRIES_CEILING}, got {}",
            config.polling.max_retries
        ));
    }

    for (i, tag) in config.polling.types.iter().enumerate() {
        if tag.trim().is_empty() {
            fail(format!("polling.types[{i}] must not be empty"));
        }
    }

    let addr = config.webhook.bind_address.trim();
    if addr.is_empty() {
        fail("webhook.bind_address must not be empty".to_string());
    } else {
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "webhook.bind_address `{addr}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.webhook.port == 0 {
        fail("webhook.port must not be 0".to_string());
    }

    if config.webhook.max_body_bytes == 0 {
        fail("webhook.max_body_bytes must be greater than 0".to_string());
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &MaxbotConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&MaxbotConfig::default()).is_ok());
    }

    #[test]
    fn limit_outside_range_fails() {
        let mut config = MaxbotConfig::default();
        config.polling.limit = 0;
        assert!(messages(&config)[0].contains("polling.limit"));
        config.polling.limit = 1001;
        assert!(messages(&config)[0].contains("polling.limit"));
        config.polling.limit = 1000;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn non_http_base_url_fails() {
        let mut config = MaxbotConfig::default();
        config.api.base_url = "ftp://botapi.max.ru/".into();
        assert!(messages(&config)[0].contains("api.base_url"));
    }

    #[test]
    fn zero_timeout_fails() {
        let mut config = MaxbotConfig::default();
        config.api.timeout_secs = 0;
        let messages = messages(&config);
        assert_eq!(messages.len(), 1, "{messages:#?}");
        assert!(messages[0].contains("api.timeout_secs must be greater than 0"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = MaxbotConfig::default();
        config.api.timeout_secs = 120;
        config.polling.queue_capacity = 0;
        config.polling.pause_ms = 0;
        config.polling.max_retries = 11;
        config.webhook.bind_address = " ".into();
        config.webhook.port = 0;
        config.logging.level = "loud".into();
        let messages = messages(&config);
        assert_eq!(messages.len(), 7, "{messages:#?}");
        for key in [
            "api.timeout_secs",
            "polling.queue_capacity",
            "polling.pause_ms",
            "polling.max_retries",
            "webhook.bind_address",
            "webhook.port",
            "logging.level",
        ] {
            assert!(messages.iter().any(|m| m.contains(key)), "missing {key}");
        }
    }

    #[test]
    fn bad_bind_address_characters_fail() {
        let mut config = MaxbotConfig::default();
        config.webhook.bind_address = "local host!".into();
        assert!(messages(&config)[0].contains("not a valid IP address"));
        config.webhook.bind_address = "::1".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = MaxbotConfig::default();
        config.logging.level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
