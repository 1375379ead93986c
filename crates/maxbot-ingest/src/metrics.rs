// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion counters on the `metrics` facade.
//!
//! No recorder is installed here; the embedding application picks one.

use metrics::describe_counter;

/// Ingestion path an update arrived through. Used as the `source` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Poll,
    Webhook,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poll => "poll",
            Self::Webhook => "webhook",
        }
    }
}

/// Register descriptions for every ingestion metric.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "maxbot_updates_total",
        "Updates decoded and handed to the delivery queue"
    );
    describe_counter!(
        "maxbot_decode_failures_total",
        "Update payloads rejected by the decoder"
    );
    describe_counter!(
        "maxbot_poll_failures_total",
        "Long-poll requests that failed after every retry"
    );
    describe_counter!(
        "maxbot_webhook_rejections_total",
        "Webhook requests answered with a non-200 status"
    );
}

pub fn record_update(source: Source) {
    metrics::counter!("maxbot_updates_total", "source" => source.as_str()).increment(1);
}

pub fn record_decode_failure(source: Source) {
    metrics::counter!("maxbot_decode_failures_total", "source" => source.as_str()).increment(1);
}

pub fn record_poll_failure() {
    metrics::counter!("maxbot_poll_failures_total").increment(1);
}

pub fn record_webhook_rejection(reason: &'static str) {
    metrics::counter!("maxbot_webhook_rejections_total", "reason" => reason).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_recorder_is_a_no_op() {
        register_metrics();
        record_update(Source::Poll);
        record_decode_failure(Source::Webhook);
        record_poll_failure();
        record_webhook_rejection("queue_full");
    }

    #[test]
    fn source_labels() {
        assert_eq!(Source::Poll.as_str(), "poll");
        assert_eq!(Source::Webhook.as_str(), "webhook");
    }
}
