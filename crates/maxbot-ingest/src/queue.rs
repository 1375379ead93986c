// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, ordered delivery queue between producers and the single consumer.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use maxbot_core::Update;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

/// Default number of updates buffered between producers and the consumer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Why an update could not be enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("delivery queue is full")]
    Full,
    #[error("delivery queue is closed")]
    Closed,
    #[error("delivery cancelled")]
    Cancelled,
}

/// Create a queue holding at most `capacity` undelivered updates.
///
/// A capacity of zero is raised to one.
pub fn delivery_queue(capacity: usize) -> (UpdateSender, UpdateStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (UpdateSender { tx }, UpdateStream { rx })
}

/// Producer half. Cloned into every producer (poller task, webhook handlers).
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::Sender<Update>,
}

impl UpdateSender {
    /// Enqueue, waiting for free capacity.
    ///
    /// Returns [`PushError::Cancelled`] as soon as `cancel` fires, even if
    /// capacity would have become available later.
    pub async fn push(&self, update: Update, cancel: &CancellationToken) -> Result<(), PushError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PushError::Cancelled),
            sent = self.tx.send(update) => sent.map_err(|_| PushError::Closed),
        }
    }

    /// Enqueue without waiting.
    pub fn try_push(&self, update: Update) -> Result<(), PushError> {
        self.tx.try_send(update).map_err(|e| match e {
            TrySendError::Full(_) => PushError::Full,
            TrySendError::Closed(_) => PushError::Closed,
        })
    }

    /// True once the consumer has dropped its stream.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer half. Yields updates in the order they were enqueued and ends
/// once every [`UpdateSender`] is gone.
#[derive(Debug)]
pub struct UpdateStream {
    rx: mpsc::Receiver<Update>,
}

impl UpdateStream {
    pub async fn recv(&mut self) -> Option<Update> {
        self.rx.recv().await
    }

    /// Take the next update if one is already buffered.
    pub fn try_recv(&mut self) -> Option<Update> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting new updates. Already buffered updates can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Stream for UpdateStream {
    type Item = Update;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Update>> {
        self.rx.poll_recv(cx)
    }
}
