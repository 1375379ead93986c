// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `maxbot poll` and `maxbot webhook`.
//!
//! Both commands feed one delivery queue and consume it here: every update
//! is logged and, in debug mode, forwarded to the debug chat. They run until
//! SIGINT or SIGTERM, then drain what is already queued.

use maxbot_client::{Debugs, MaxApi};
use maxbot_config::MaxbotConfig;
use maxbot_core::{MaxbotError, Update};
use maxbot_ingest::metrics::register_metrics;
use maxbot_ingest::{UpdateStream, delivery_queue, install_signal_handler, start_webhook_server};
use tracing::{error, info, warn};

pub async fn run_poll(config: MaxbotConfig) -> Result<(), MaxbotError> {
    init_tracing(&config.logging.level);
    register_metrics();

    let api = MaxApi::from_config(&config)?;
    info!(
        version = api.version(),
        limit = api.poller_config().limit,
        types = ?api.poller_config().types,
        "starting long polling"
    );

    let cancel = install_signal_handler();
    let (poller, stream) = api.start_polling(cancel);
    let delivered = consume_updates(stream, api.debugs()).await;
    if let Err(e) = poller.await {
        error!(error = %e, "poller task failed");
    }

    info!(delivered, "long polling stopped");
    Ok(())
}

pub async fn run_webhook(config: MaxbotConfig) -> Result<(), MaxbotError> {
    init_tracing(&config.logging.level);
    register_metrics();

    let api = MaxApi::from_config(&config)?;
    let (sender, stream) = delivery_queue(api.queue_capacity());
    let state = api.webhook_state(sender);

    let cancel = install_signal_handler();
    let consumer = tokio::spawn(consume_updates(stream, api.debugs()));
    let served = start_webhook_server(&config.webhook, state, cancel).await;

    match consumer.await {
        Ok(delivered) => info!(delivered, "webhook stopped"),
        Err(e) => error!(error = %e, "update consumer failed"),
    }
    served
}

/// Consume `stream` until every producer is gone. Returns the update count.
pub async fn consume_updates(mut stream: UpdateStream, debugs: Option<Debugs>) -> usize {
    let mut delivered = 0;
    while let Some(update) = stream.recv().await {
        delivered += 1;
        log_update(&update);
        if let Some(debugs) = &debugs {
            if let Err(e) = debugs.send_update(&update).await {
                warn!(error = %e, "failed to forward update to debug chat");
            }
        }
    }
    delivered
}

fn log_update(update: &Update) {
    let message = update.message();
    info!(
        update_type = %update.update_type(),
        timestamp = update.timestamp,
        chat_id = ?update.chat_id(),
        text = message.map(|m| m.body.text.as_str()).unwrap_or_default(),
        attachments = message.map_or(0, |m| m.body.attachments.len()),
        "update received"
    );
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("maxbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
