// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the maxbot client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level maxbot configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MaxbotConfig {
    /// Bot API endpoint and credentials.
    #[serde(default)]
    pub api: ApiConfig,

    /// Long-polling retrieval loop.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Inbound webhook server.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Raw payload capture and debug chat forwarding.
    #[serde(default)]
    pub debug: DebugConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot API configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Bot access token. Falls back to the `TOKEN` environment variable when unset.
    #[serde(default)]
    pub token: Option<String>,

    /// Base URL of the Bot API, with trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version sent as the `v` query parameter.
    #[serde(default = "default_version")]
    pub version: String,

    /// Per-request timeout in seconds. Also the server-side long-poll timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            version: default_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Per-request timeout. Zero falls back to the default.
    pub fn timeout(&self) -> Duration {
        match self.timeout_secs {
            0 => Duration::from_secs(default_timeout_secs()),
            secs => Duration::from_secs(secs),
        }
    }
}

fn default_base_url() -> String {
    "https://botapi.max.ru/".to_string()
}

fn default_version() -> String {
    "1.2.5".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Long-polling configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollingConfig {
    /// Interval between polls, in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Maximum number of updates requested per poll.
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Update type tags to subscribe to. Empty means all types.
    #[serde(default)]
    pub types: Vec<String>,

    /// Retries after the initial attempt of a failed request.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Wait before the first retry, in milliseconds. Doubles on every retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Capacity of the delivery queue between the poller and the consumer.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            limit: default_limit(),
            types: Vec::new(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl PollingConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

fn default_pause_ms() -> u64 {
    1000
}

fn default_limit() -> u32 {
    50
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_queue_capacity() -> usize {
    100
}

/// Webhook server configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Debug mode configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Capture the raw payload of every decoded update.
    #[serde(default)]
    pub enabled: bool,

    /// Chat that receives raw payloads and errors while debug mode is on.
    #[serde(default)]
    pub chat_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
