// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.

use std::net::{IpAddr, SocketAddr};

use maxbot_config::model::WebhookConfig;
use maxbot_core::MaxbotError;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::webhook::{WebhookState, webhook_router};

/// `host:port` for the configured bind address. IPv6 literals are bracketed;
/// host names are passed through for the resolver.
pub fn webhook_bind_addr(config: &WebhookConfig) -> String {
    let host = config.bind_address.trim();
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    match bare.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, config.port).to_string(),
        Err(_) => format!("{host}:{}", config.port),
    }
}

/// Bind the listener for the configured address and port.
pub async fn bind_webhook_listener(config: &WebhookConfig) -> Result<TcpListener, MaxbotError> {
    let addr = webhook_bind_addr(config);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| MaxbotError::Network {
            op: format!("bind webhook server to {addr}"),
            source: Box::new(e),
        })
}

/// Serve webhook pushes on `listener` until `cancel` fires.
///
/// In-flight requests complete before this returns. The state (and with it
/// the queue sender) is dropped on return.
pub async fn serve_webhook(
    listener: TcpListener,
    state: WebhookState,
    cancel: CancellationToken,
) -> Result<(), MaxbotError> {
    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    tracing::info!("webhook server listening on {local}");

    axum::serve(listener, webhook_router(state))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| MaxbotError::Network {
            op: "serve webhook".into(),
            source: Box::new(e),
        })?;

    tracing::info!("webhook server stopped");
    Ok(())
}

/// Bind and serve using the `[webhook]` settings.
pub async fn start_webhook_server(
    config: &WebhookConfig,
    state: WebhookState,
    cancel: CancellationToken,
) -> Result<(), MaxbotError> {
    let listener = bind_webhook_listener(config).await?;
    serve_webhook(listener, state.with_max_body_bytes(config.max_body_bytes), cancel).await
}
