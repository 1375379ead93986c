// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`Transport`] for the MAX Bot API.
//!
//! Every request carries the bot token as the `access_token` query
//! parameter and the API version as `v`. Errors are classified so callers
//! can tell an idle long poll (timeout) from a real failure.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use maxbot_core::types::{ApiErrorBody, HttpMethod};
use maxbot_core::{MaxbotError, Query, Transport};

/// HTTP transport talking to the Bot API over reqwest.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: SecretString,
    version: String,
}

impl HttpTransport {
    /// Build a transport.
    ///
    /// `timeout` applies to whole requests and should match the long-poll
    /// timeout, so an idle poll surfaces as [`MaxbotError::Timeout`].
    pub fn new(
        base_url: &str,
        token: SecretString,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MaxbotError> {
        let version = version.into();
        let base_url = parse_base_url(base_url)?;

        let client = reqwest::Client::builder()
            .user_agent(format!("max-bot-api-client-rs/{version}"))
            .timeout(timeout)
            .build()
            .map_err(|e| MaxbotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token,
            version,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn url(&self, path: &str, query: &Query) -> Result<Url, MaxbotError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| MaxbotError::Config(format!("invalid request path `{path}`: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("access_token", self.token.expose_secret());
            pairs.append_pair("v", &self.version);
        }
        Ok(url)
    }
}

/// Parse the base URL, making sure relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, MaxbotError> {
    let mut url = Url::parse(raw)
        .map_err(|e| MaxbotError::Config(format!("invalid base URL `{raw}`: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MaxbotError::Config(format!(
            "invalid base URL `{raw}`: scheme must be http or https"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify_send_error(op: &str, e: reqwest::Error) -> MaxbotError {
    if e.is_timeout() {
        MaxbotError::Timeout {
            op: op.to_string(),
            reason: "request timeout exceeded".into(),
        }
    } else {
        MaxbotError::Network {
            op: op.to_string(),
            source: Box::new(e),
        }
    }
}

/// Build the error for a non-success status from whatever the body holds.
fn api_error(status: StatusCode, body: &[u8]) -> MaxbotError {
    let message = match serde_json::from_slice::<ApiErrorBody>(body) {
        Ok(err) if !err.message.is_empty() && !err.code.is_empty() => {
            format!("{}: {}", err.code, err.message)
        }
        Ok(err) if !err.message.is_empty() => err.message,
        _ => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    MaxbotError::Api {
        code: status.as_u16(),
        message,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Query,
        body: Option<Vec<u8>>,
    ) -> Result<Bytes, MaxbotError> {
        let op = format!("{method} {path}");
        let url = self.url(path, &query)?;

        let mut request = self.client.request(to_reqwest_method(method), url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(&op, e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_send_error(&op, e))?;

        debug!(%op, status = status.as_u16(), bytes = body.len(), "API response received");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body)
    }
}
