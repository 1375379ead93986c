// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies of the outbound calls the client makes.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A registered webhook subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    /// Unix time in milliseconds when the subscription was created.
    #[serde(deserialize_with = "null_as_default")]
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSubscriptionsResult {
    #[serde(deserialize_with = "null_as_default")]
    pub subscriptions: Vec<Subscription>,
}

/// Body of `POST /subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRequestBody {
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub update_types: Vec<String>,
    pub version: String,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimpleQueryResult {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of `POST /messages`, reduced to what the debug reporter sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessageBody {
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notify: bool,
}
