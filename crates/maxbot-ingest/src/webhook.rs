// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingestion handler.
//!
//! Every pushed payload is decoded on the request task and enqueued without
//! waiting. A full queue is reported to the sender as 503 so the platform
//! retries later, instead of holding the connection open.

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use maxbot_core::UpdateDecoder;
use serde::Serialize;
use tracing::{debug, warn};

use crate::metrics::{self, Source};
use crate::queue::{PushError, UpdateSender};

/// Default request body limit.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state of the webhook handler.
#[derive(Debug, Clone)]
pub struct WebhookState {
    pub decoder: UpdateDecoder,
    pub sender: UpdateSender,
    /// Bodies larger than this are rejected with 400.
    pub max_body_bytes: usize,
}

impl WebhookState {
    pub fn new(decoder: UpdateDecoder, sender: UpdateSender) -> Self {
        Self {
            decoder,
            sender,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Router accepting webhook pushes on any path.
pub fn webhook_router(state: WebhookState) -> Router {
    Router::new().fallback(handle_webhook).with_state(state)
}

/// Decode one pushed update and enqueue it.
///
/// - non-POST: 405
/// - unreadable or oversized body: 400
/// - undecodable update: 400
/// - queue full or closed: 503
/// - otherwise: 200
pub async fn handle_webhook(State(state): State<WebhookState>, request: Request) -> Response {
    if request.method() != Method::POST {
        return reject(
            StatusCode::METHOD_NOT_ALLOWED,
            "method",
            format!("method {} not allowed, use POST", request.method()),
        );
    }

    let body = match to_bytes(request.into_body(), state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            return reject(
                StatusCode::BAD_REQUEST,
                "read",
                format!("failed to read request body: {e}"),
            );
        }
    };

    let update = match state.decoder.decode_update(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "rejecting undecodable webhook payload");
            metrics::record_decode_failure(Source::Webhook);
            return reject(
                StatusCode::BAD_REQUEST,
                "decode",
                format!("failed to decode update: {e}"),
            );
        }
    };

    let update_type = update.update_type();
    match state.sender.try_push(update) {
        Ok(()) => {
            debug!(%update_type, "webhook update enqueued");
            metrics::record_update(Source::Webhook);
            StatusCode::OK.into_response()
        }
        Err(e) => {
            let reason = match e {
                PushError::Full => "queue_full",
                PushError::Closed | PushError::Cancelled => "queue_closed",
            };
            warn!(%update_type, error = %e, "dropping webhook update");
            reject(StatusCode::SERVICE_UNAVAILABLE, reason, e.to_string())
        }
    }
}

fn reject(status: StatusCode, reason: &'static str, error: String) -> Response {
    metrics::record_webhook_rejection(reason);
    let body = Json(ErrorResponse { error });
    if status == StatusCode::METHOD_NOT_ALLOWED {
        (status, [(header::ALLOW, "POST")], body).into_response()
    } else {
        (status, body).into_response()
    }
}
