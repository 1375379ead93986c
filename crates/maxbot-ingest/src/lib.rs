// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update ingestion for the maxbot client.
//!
//! Two producers feed one ordered [`UpdateStream`]:
//!
//! - [`Poller`], the long-polling loop with a monotonic cursor and
//!   exponential backoff, running on a background task;
//! - the webhook handler ([`webhook_router`]), which decodes each pushed
//!   payload on its request task and enqueues it without waiting.
//!
//! Both stop when their [`CancellationToken`](tokio_util::sync::CancellationToken)
//! is cancelled; the stream ends once every producer has dropped its sender.

pub mod metrics;
pub mod poller;
pub mod queue;
pub mod server;
pub mod shutdown;
pub mod webhook;

use std::sync::Arc;

use maxbot_core::{Transport, UpdateDecoder};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use poller::{FetchError, Poller, PollerConfig, RetryPolicy, UpdatesParams};
pub use queue::{PushError, UpdateSender, UpdateStream, delivery_queue};
pub use server::{bind_webhook_listener, serve_webhook, start_webhook_server};
pub use shutdown::install_signal_handler;
pub use webhook::{ErrorResponse, WebhookState, handle_webhook, webhook_router};

/// Start a poller on a fresh queue of `capacity` and hand back its stream.
pub fn start_polling(
    transport: Arc<dyn Transport>,
    decoder: UpdateDecoder,
    config: PollerConfig,
    capacity: usize,
    cancel: CancellationToken,
) -> (JoinHandle<()>, UpdateStream) {
    let (sender, stream) = delivery_queue(capacity);
    let handle = Poller::new(transport, decoder, config, sender).spawn(cancel);
    (handle, stream)
}
