// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling retrieval loop.
//!
//! One poller runs as a background task for the lifetime of a
//! [`CancellationToken`]. Every tick it drains `GET /updates` until the
//! server returns an empty batch, decoding each update and pushing it onto
//! the delivery queue in order.
//!
//! The cursor (`marker`) lives in the poller only. It starts at zero, which
//! the API reads as "from the current position", and never moves backwards.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use maxbot_config::MaxbotConfig;
use maxbot_core::types::HttpMethod;
use maxbot_core::{MaxbotError, Query, Transport, UpdateDecoder, UpdateList};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics::{self, Source};
use crate::queue::{PushError, UpdateSender};

/// Exponential backoff for failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (zero-based): `initial * 2^attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Settings of a [`Poller`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Interval between polls when the previous drain came back empty.
    pub pause: Duration,
    /// Maximum updates per request.
    pub limit: u32,
    /// Server-side long-poll timeout.
    pub timeout: Duration,
    /// Update types to request. Empty means all.
    pub types: Vec<String>,
    pub retry: RetryPolicy,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            pause: Duration::from_secs(1),
            limit: 50,
            timeout: Duration::from_secs(30),
            types: Vec::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PollerConfig {
    pub fn from_config(config: &MaxbotConfig) -> Self {
        Self {
            pause: config.polling.pause(),
            limit: config.polling.limit,
            timeout: config.api.timeout(),
            types: config.polling.types.clone(),
            retry: RetryPolicy {
                max_retries: config.polling.max_retries,
                initial_backoff: config.polling.initial_backoff(),
            },
        }
    }
}

/// Query parameters of `GET /updates`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatesParams {
    pub limit: u32,
    pub timeout_secs: u64,
    pub marker: i64,
    pub types: Vec<String>,
}

impl UpdatesParams {
    /// Zero values are omitted; `types` is repeated once per tag.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if self.limit > 0 {
            query.push(("limit".into(), self.limit.to_string()));
        }
        if self.timeout_secs > 0 {
            query.push(("timeout".into(), self.timeout_secs.to_string()));
        }
        if self.marker > 0 {
            query.push(("marker".into(), self.marker.to_string()));
        }
        query.extend(self.types.iter().map(|t| ("types".to_string(), t.clone())));
        query
    }
}

/// Why [`Poller::fetch_with_retry`] gave up.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("polling cancelled")]
    Cancelled,

    #[error("giving up after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: MaxbotError,
    },
}

/// The long-polling retrieval loop.
pub struct Poller {
    transport: Arc<dyn Transport>,
    decoder: UpdateDecoder,
    config: PollerConfig,
    sender: UpdateSender,
    marker: i64,
}

impl Poller {
    pub fn new(
        transport: Arc<dyn Transport>,
        decoder: UpdateDecoder,
        config: PollerConfig,
        sender: UpdateSender,
    ) -> Self {
        Self {
            transport,
            decoder,
            config,
            sender,
            marker: 0,
        }
    }

    /// Current cursor. Zero until the server has reported one.
    pub fn marker(&self) -> i64 {
        self.marker
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Run the loop on a background task.
    ///
    /// The task drops its queue sender when it ends, so the consumer's
    /// stream terminates once no other producer holds one.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Poll until `cancel` fires or the consumer goes away.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            pause_ms = self.config.pause.as_millis() as u64,
            limit = self.config.limit,
            "long polling started"
        );

        // `interval` panics on a zero period.
        let mut ticker = interval(self.config.pause.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            if self.drain(&cancel).await.is_break() {
                break;
            }
        }

        info!(marker = self.marker, "long polling stopped");
    }

    /// Fetch and deliver batches until one comes back empty.
    async fn drain(&mut self, cancel: &CancellationToken) -> ControlFlow<()> {
        loop {
            let list = match self.fetch_with_retry(cancel).await {
                Ok(list) => list,
                Err(FetchError::Cancelled) => return ControlFlow::Break(()),
                Err(FetchError::Exhausted { attempts, source }) => {
                    error!(attempts, error = %source, "failed to fetch updates");
                    metrics::record_poll_failure();
                    return ControlFlow::Continue(());
                }
            };

            let received = list.updates.len();
            debug!(received, marker = ?list.marker, "update batch received");

            for raw in &list.updates {
                let update = match self.decoder.decode_update(raw.as_bytes()) {
                    Ok(update) => update,
                    Err(e) => {
                        warn!(error = %e, "skipping undecodable update");
                        metrics::record_decode_failure(Source::Poll);
                        continue;
                    }
                };
                match self.sender.push(update, cancel).await {
                    Ok(()) => metrics::record_update(Source::Poll),
                    Err(PushError::Cancelled) => return ControlFlow::Break(()),
                    Err(e) => {
                        info!(error = %e, "consumer is gone, stopping");
                        return ControlFlow::Break(());
                    }
                }
            }

            self.adopt_marker(list.marker);

            if received == 0 {
                return ControlFlow::Continue(());
            }
        }
    }

    fn adopt_marker(&mut self, reported: Option<i64>) {
        let Some(marker) = reported else {
            return;
        };
        if marker < self.marker {
            warn!(
                current = self.marker,
                reported = marker,
                "server reported a lower marker, keeping current"
            );
            return;
        }
        self.marker = marker;
    }

    /// One `GET /updates` request with the current cursor.
    ///
    /// A transport timeout is the normal outcome of an idle long poll and
    /// yields an empty batch.
    pub async fn fetch_updates(&self) -> Result<UpdateList, MaxbotError> {
        let params = UpdatesParams {
            limit: self.config.limit,
            timeout_secs: self.config.timeout.as_secs(),
            marker: self.marker,
            types: self.config.types.clone(),
        };

        match self
            .transport
            .request(HttpMethod::Get, "updates", params.to_query(), None)
            .await
        {
            Ok(body) => serde_json::from_slice(&body).map_err(|e| MaxbotError::Serialization {
                op: "decode update list".into(),
                source: e,
            }),
            Err(e) if e.is_timeout() => {
                debug!("long poll timed out without updates");
                Ok(UpdateList::default())
            }
            Err(e) => Err(e),
        }
    }

    /// [`fetch_updates`](Self::fetch_updates) with retries and exponential
    /// backoff. Both the request and the backoff wait stop on cancellation.
    pub async fn fetch_with_retry(
        &self,
        cancel: &CancellationToken,
    ) -> Result<UpdateList, FetchError> {
        let retry = self.config.retry;
        let mut attempt = 0;

        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                result = self.fetch_updates() => result,
            };

            let err = match result {
                Ok(list) => return Ok(list),
                Err(e) => e,
            };

            if attempt >= retry.max_retries {
                return Err(FetchError::Exhausted {
                    attempts: attempt + 1,
                    source: err,
                });
            }

            let delay = retry.delay(attempt);
            attempt += 1;
            warn!(
                error = %err,
                retry = attempt,
                delay_ms = delay.as_millis() as u64,
                "update request failed, backing off"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_from_initial() {
        let retry = RetryPolicy::default();
        let delays: Vec<_> = (0..3).map(|a| retry.delay(a)).collect();
        assert_eq!(delays, [1, 2, 4].map(Duration::from_secs).to_vec());
    }

    #[test]
    fn backoff_saturates() {
        let retry = RetryPolicy {
            max_retries: 100,
            initial_backoff: Duration::from_secs(1),
        };
        assert_eq!(retry.delay(64), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn query_omits_zero_values() {
        let params = UpdatesParams {
            limit: 50,
            timeout_secs: 30,
            marker: 0,
            types: vec![],
        };
        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("limit".to_string(), "50".to_string()),
                ("timeout".to_string(), "30".to_string()),
            ]
        );
        assert!(UpdatesParams::default().to_query().is_empty());
    }

    #[test]
    fn query_repeats_types_and_carries_marker() {
        let params = UpdatesParams {
            limit: 0,
            timeout_secs: 0,
            marker: 77,
            types: vec!["message_created".into(), "bot_started".into()],
        };
        let query = params.to_query();
        assert_eq!(query[0], ("marker".to_string(), "77".to_string()));
        let types: Vec<_> = query.iter().filter(|(k, _)| k == "types").collect();
        assert_eq!(types.len(), 2);
        assert_eq!(types[1].1, "bot_started");
    }

    #[test]
    fn config_maps_from_file_settings() {
        let mut file = MaxbotConfig::default();
        file.polling.pause_ms = 250;
        file.polling.max_retries = 5;
        file.polling.types = vec!["bot_added".into()];
        file.api.timeout_secs = 45;

        let config = PollerConfig::from_config(&file);
        assert_eq!(config.pause, Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.types, vec!["bot_added"]);
        assert_eq!(PollerConfig::from_config(&MaxbotConfig::default()), PollerConfig::default());
    }
}
