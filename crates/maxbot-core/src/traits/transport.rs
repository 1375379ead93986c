// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for talking to the MAX Bot API.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::MaxbotError;
use crate::types::HttpMethod;

/// Query parameters in request order. Keys may repeat (e.g. `types`).
pub type Query = Vec<(String, String)>;

/// Executes authenticated requests against the API.
///
/// Implementations attach credentials and map failures onto the error
/// taxonomy the ingestion loop relies on:
/// - a request that hits its timeout is [`MaxbotError::Timeout`]
/// - a connectivity failure is [`MaxbotError::Network`]
/// - a non-success status is [`MaxbotError::Api`]
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one request and returns the full response body.
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, MaxbotError>;
}
