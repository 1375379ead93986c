// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook subscription management (`/subscriptions`).

use std::sync::Arc;

use maxbot_core::types::HttpMethod;
use maxbot_core::types::requests::{
    GetSubscriptionsResult, SimpleQueryResult, Subscription, SubscriptionRequestBody,
};
use maxbot_core::{MaxbotError, Transport};
use tracing::info;

use crate::{decode_json, encode_json};

/// Lists, creates and removes webhook subscriptions of the bot.
#[derive(Clone)]
pub struct Subscriptions {
    transport: Arc<dyn Transport>,
    version: String,
}

impl Subscriptions {
    pub fn new(transport: Arc<dyn Transport>, version: impl Into<String>) -> Self {
        Self {
            transport,
            version: version.into(),
        }
    }

    /// All subscriptions currently registered for the bot.
    pub async fn list(&self) -> Result<Vec<Subscription>, MaxbotError> {
        let body = self
            .transport
            .request(HttpMethod::Get, "subscriptions", Vec::new(), None)
            .await?;
        let result: GetSubscriptionsResult = decode_json("decode subscriptions", &body)?;
        Ok(result.subscriptions)
    }

    /// Register `url` to receive pushes. Empty `update_types` means all types.
    pub async fn subscribe(
        &self,
        url: &str,
        update_types: &[String],
    ) -> Result<SimpleQueryResult, MaxbotError> {
        let request = SubscriptionRequestBody {
            url: url.to_string(),
            update_types: update_types.to_vec(),
            version: self.version.clone(),
        };
        let body = encode_json("encode subscription request", &request)?;
        let response = self
            .transport
            .request(HttpMethod::Post, "subscriptions", Vec::new(), Some(body))
            .await?;
        let result: SimpleQueryResult = decode_json("decode subscribe result", &response)?;
        info!(url, success = result.success, "webhook subscription requested");
        Ok(result)
    }

    /// Remove the subscription for `url`.
    pub async fn unsubscribe(&self, url: &str) -> Result<SimpleQueryResult, MaxbotError> {
        let query = vec![("url".to_string(), url.to_string())];
        let response = self
            .transport
            .request(HttpMethod::Delete, "subscriptions", query, None)
            .await?;
        let result: SimpleQueryResult = decode_json("decode unsubscribe result", &response)?;
        info!(url, success = result.success, "webhook subscription removed");
        Ok(result)
    }
}
