// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic poller and client tests.
//!
//! Outcomes are served in the order they were queued. Once the script runs
//! out, requests never complete, which parks a poller until its token is
//! cancelled.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use maxbot_core::types::HttpMethod;
use maxbot_core::{MaxbotError, Query, Transport};

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Query,
    pub body: Option<Vec<u8>>,
    /// Tokio time at which the request started. Meaningful under paused time.
    pub at: Instant,
}

impl RecordedCall {
    /// All values of a query parameter, in order.
    pub fn query_values(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query_values(key).into_iter().next()
    }
}

struct Scripted {
    delay: Duration,
    outcome: Result<Bytes, MaxbotError>,
}

/// A scripted transport.
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    called: Arc<Notify>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw outcome, served after `delay`.
    pub async fn push_delayed(&self, delay: Duration, outcome: Result<Bytes, MaxbotError>) {
        self.script.lock().await.push_back(Scripted { delay, outcome });
    }

    /// Queue a raw outcome, served immediately.
    pub async fn push(&self, outcome: Result<Bytes, MaxbotError>) {
        self.push_delayed(Duration::ZERO, outcome).await;
    }

    /// Queue a successful JSON response.
    pub async fn push_json(&self, value: serde_json::Value) {
        self.push(Ok(Bytes::from(value.to_string()))).await;
    }

    /// Queue an idle long-poll timeout.
    pub async fn push_timeout(&self) {
        self.push(Err(MaxbotError::Timeout {
            op: "GET updates".into(),
            reason: "operation timed out".into(),
        }))
        .await;
    }

    /// Queue a connectivity failure.
    pub async fn push_network_error(&self) {
        self.push(Err(MaxbotError::Network {
            op: "GET updates".into(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )),
        }))
        .await;
    }

    /// Queue a non-success API status.
    pub async fn push_api_error(&self, code: u16, message: &str) {
        self.push(Err(MaxbotError::Api {
            code,
            message: message.into(),
        }))
        .await;
    }

    /// Every request seen so far.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    /// Number of outcomes not yet served.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }

    /// Wait until at least `n` requests have been made.
    pub async fn wait_for_calls(&self, n: usize) {
        loop {
            let notified = self.called.notified();
            if self.call_count().await >= n {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, MaxbotError> {
        self.calls.lock().await.push(RecordedCall {
            method,
            path: path.to_string(),
            query,
            body,
            at: Instant::now(),
        });
        self.called.notify_waiters();

        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted { delay, outcome }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => std::future::pending().await,
        }
    }
}
