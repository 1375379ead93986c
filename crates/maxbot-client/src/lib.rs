// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client facade for the MAX Bot API.
//!
//! [`MaxApi`] owns the HTTP transport and hands out the pieces built on it:
//! subscription management, the debug reporter and the long-polling
//! [`Poller`]. Webhook ingestion lives in `maxbot-ingest`; the facade only
//! supplies a decoder configured the same way.

pub mod debugs;
pub mod http;
pub mod subscriptions;

use std::sync::Arc;

use maxbot_config::MaxbotConfig;
use maxbot_core::{MaxbotError, Transport, UpdateDecoder};
use maxbot_ingest::{Poller, PollerConfig, UpdateSender, UpdateStream, WebhookState};
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

pub use debugs::Debugs;
pub use http::HttpTransport;
pub use subscriptions::Subscriptions;

/// Environment variable read when no token is configured.
pub const TOKEN_ENV_VAR: &str = "TOKEN";

/// Entry point of the client.
#[derive(Clone)]
pub struct MaxApi {
    transport: Arc<dyn Transport>,
    decoder: UpdateDecoder,
    version: String,
    debug_chat_id: Option<i64>,
    poller_config: PollerConfig,
    queue_capacity: usize,
    max_body_bytes: usize,
}

impl MaxApi {
    /// Client with default settings. A blank `token` is a config error;
    /// `$TOKEN` is not consulted.
    pub fn new(token: &str) -> Result<Self, MaxbotError> {
        let mut config = MaxbotConfig::default();
        config.api.token = Some(token.to_string());
        Self::build(&config, None)
    }

    /// Client built from a loaded configuration. A missing or blank
    /// `api.token` falls back to `$TOKEN`.
    pub fn from_config(config: &MaxbotConfig) -> Result<Self, MaxbotError> {
        let env_token = std::env::var(TOKEN_ENV_VAR).ok();
        Self::build(config, env_token.as_deref())
    }

    fn build(config: &MaxbotConfig, env_token: Option<&str>) -> Result<Self, MaxbotError> {
        let token = pick_token(config.api.token.as_deref(), env_token)?;
        let transport = HttpTransport::new(
            &config.api.base_url,
            token,
            config.api.version.clone(),
            config.api.timeout(),
        )?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Client over an arbitrary transport, e.g. a scripted one in tests.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &MaxbotConfig) -> Self {
        Self {
            transport,
            decoder: UpdateDecoder::new(config.debug.enabled),
            version: config.api.version.clone(),
            debug_chat_id: config.debug.enabled.then_some(config.debug.chat_id).flatten(),
            poller_config: PollerConfig::from_config(config),
            queue_capacity: config.polling.queue_capacity,
            max_body_bytes: config.webhook.max_body_bytes,
        }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn decoder(&self) -> UpdateDecoder {
        self.decoder
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn poller_config(&self) -> &PollerConfig {
        &self.poller_config
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn subscriptions(&self) -> Subscriptions {
        Subscriptions::new(self.transport(), self.version.clone())
    }

    /// The debug reporter, when debug mode is on and a chat is configured.
    pub fn debugs(&self) -> Option<Debugs> {
        self.debug_chat_id
            .map(|chat_id| Debugs::new(self.transport(), chat_id))
    }

    /// A poller feeding `sender`, not yet started.
    pub fn poller(&self, sender: UpdateSender) -> Poller {
        Poller::new(
            self.transport(),
            self.decoder(),
            self.poller_config.clone(),
            sender,
        )
    }

    /// Start polling in the background and return the update stream.
    pub fn start_polling(
        &self,
        cancel: CancellationToken,
    ) -> (tokio::task::JoinHandle<()>, UpdateStream) {
        maxbot_ingest::start_polling(
            self.transport(),
            self.decoder(),
            self.poller_config.clone(),
            self.queue_capacity,
            cancel,
        )
    }

    /// Handler state for a webhook endpoint feeding `sender`.
    pub fn webhook_state(&self, sender: UpdateSender) -> WebhookState {
        WebhookState::new(self.decoder(), sender).with_max_body_bytes(self.max_body_bytes)
    }
}

impl std::fmt::Debug for MaxApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaxApi")
            .field("version", &self.version)
            .field("debug", &self.decoder.debug())
            .field("debug_chat_id", &self.debug_chat_id)
            .finish_non_exhaustive()
    }
}

/// Choose the configured token, else the environment one. Blank counts as unset.
fn pick_token(configured: Option<&str>, env: Option<&str>) -> Result<SecretString, MaxbotError> {
    [configured, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_string()))
        .ok_or_else(|| {
            MaxbotError::Config(format!(
                "bot token is empty: set api.token or the {TOKEN_ENV_VAR} environment variable"
            ))
        })
}

pub(crate) fn encode_json<T: Serialize>(op: &str, value: &T) -> Result<Vec<u8>, MaxbotError> {
    serde_json::to_vec(value).map_err(|source| MaxbotError::Serialization {
        op: op.to_string(),
        source,
    })
}

pub(crate) fn decode_json<T: DeserializeOwned>(op: &str, body: &[u8]) -> Result<T, MaxbotError> {
    serde_json::from_slice(body).map_err(|source| MaxbotError::Serialization {
        op: op.to_string(),
        source,
    })
}
