// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the maxbot client.

use std::fmt;

use thiserror::Error;

/// The decode stage at which a payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeStage {
    /// The shared envelope (type tag, timestamp) could not be read.
    Envelope,
    /// The envelope was fine but the full payload did not match the variant for this tag.
    Typed(String),
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Envelope => f.write_str("envelope"),
            Self::Typed(tag) => write!(f, "typed `{tag}`"),
        }
    }
}

/// The primary error type used across the maxbot crates.
#[derive(Debug, Error)]
pub enum MaxbotError {
    /// The envelope decoded but its update type is not one we know how to build.
    #[error("unknown update type: {tag}")]
    UnknownType { tag: String },

    /// Structurally invalid bytes at the given stage.
    #[error("failed to decode {stage} payload: {source}")]
    Decode {
        stage: DecodeStage,
        #[source]
        source: serde_json::Error,
    },

    /// An attachment embedded in a message body failed to decode.
    #[error("failed to process attachment #{index}: {source}")]
    Attachment {
        index: usize,
        #[source]
        source: Box<MaxbotError>,
    },

    /// The request exceeded its timeout. For long polling this just means "no updates".
    #[error("{op}: {reason}")]
    Timeout { op: String, reason: String },

    /// Connectivity failure talking to the API.
    #[error("network error during {op}: {source}")]
    Network {
        op: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API answered with a non-success status.
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// Encoding a request body or decoding a response body failed.
    #[error("failed to {op}: {source}")]
    Serialization {
        op: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid client construction input (empty token, malformed URL).
    #[error("configuration error: {0}")]
    Config(String),
}

impl MaxbotError {
    /// Shorthand for a decode failure at the given stage.
    pub fn decode(stage: DecodeStage, source: serde_json::Error) -> Self {
        Self::Decode { stage, source }
    }

    /// True for transport-level timeouts, which the poller treats as an empty batch.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// True when the payload itself was rejected (as opposed to the transport failing).
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. } | Self::Decode { .. } | Self::Attachment { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn unknown_type_names_the_tag() {
        let err = MaxbotError::UnknownType {
            tag: "dialog_muted".into(),
        };
        assert_eq!(err.to_string(), "unknown update type: dialog_muted");
        assert!(err.is_decode());
        assert!(!err.is_timeout());
    }

    #[test]
    fn decode_error_names_the_stage() {
        let envelope = MaxbotError::decode(DecodeStage::Envelope, json_error());
        assert!(envelope.to_string().starts_with("failed to decode envelope payload"));

        let typed = MaxbotError::decode(DecodeStage::Typed("message_created".into()), json_error());
        assert!(
            typed
                .to_string()
                .starts_with("failed to decode typed `message_created` payload")
        );
    }

    #[test]
    fn attachment_error_wraps_cause() {
        let err = MaxbotError::Attachment {
            index: 2,
            source: Box::new(MaxbotError::decode(DecodeStage::Envelope, json_error())),
        };
        assert!(err.to_string().contains("attachment #2"));
        assert!(err.is_decode());
        let source = std::error::Error::source(&err).expect("source is kept");
        assert!(source.to_string().contains("envelope"));
    }

    #[test]
    fn transport_errors_are_not_decode_errors() {
        let timeout = MaxbotError::Timeout {
            op: "GET updates".into(),
            reason: "request timeout exceeded (30s)".into(),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_decode());

        let api = MaxbotError::Api {
            code: 401,
            message: "Invalid access_token".into(),
        };
        assert_eq!(api.to_string(), "API error 401: Invalid access_token");
        assert!(!api.is_timeout());
        assert!(!api.is_decode());

        let network = MaxbotError::Network {
            op: "GET updates".into(),
            source: Box::new(std::io::Error::other("connection refused")),
        };
        assert!(network.to_string().contains("connection refused"));
    }
}
