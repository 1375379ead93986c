// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debug reporter: forwards raw updates and errors to a chat.

use std::sync::Arc;

use maxbot_core::types::HttpMethod;
use maxbot_core::types::requests::NewMessageBody;
use maxbot_core::{MaxbotError, Transport, Update};

use crate::encode_json;

/// Posts diagnostic messages to one chat with `POST /messages?chat_id=`.
#[derive(Clone)]
pub struct Debugs {
    transport: Arc<dyn Transport>,
    chat_id: i64,
}

impl Debugs {
    pub fn new(transport: Arc<dyn Transport>, chat_id: i64) -> Self {
        Self { transport, chat_id }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    /// Send the raw payload of `update`.
    ///
    /// Fails with [`MaxbotError::Config`] when the update was decoded without
    /// debug mode and so carries no raw payload.
    pub async fn send_update(&self, update: &Update) -> Result<(), MaxbotError> {
        let Some(raw) = update.debug_raw.as_deref() else {
            return Err(MaxbotError::Config(
                "update has no raw payload, decode it with debug mode enabled".into(),
            ));
        };
        self.send_text(raw).await
    }

    /// Send the text of `err`.
    pub async fn send_error(
        &self,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> Result<(), MaxbotError> {
        self.send_text(&err.to_string()).await
    }

    async fn send_text(&self, text: &str) -> Result<(), MaxbotError> {
        let message = NewMessageBody {
            text: text.to_string(),
            notify: false,
        };
        let body = encode_json("encode debug message", &message)?;
        let query = vec![("chat_id".to_string(), self.chat_id.to_string())];
        self.transport
            .request(HttpMethod::Post, "messages", query, Some(body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use maxbot_core::UpdateDecoder;
    use maxbot_test_utils::MockTransport;
    use maxbot_test_utils::fixtures::bot_started;

    use super::*;

    #[tokio::test]
    async fn update_raw_payload_is_posted_to_chat() {
        let transport = MockTransport::new();
        transport.push_json(serde_json::json!({"message": {}})).await;
        let debugs = Debugs::new(Arc::new(transport.clone()), -42);

        let payload = bot_started(1, 2).to_string();
        let update = UpdateDecoder::new(true)
            .decode_update(payload.as_bytes())
            .unwrap();
        debugs.send_update(&update).await.unwrap();

        let calls = transport.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, HttpMethod::Post);
        assert_eq!(calls[0].path, "messages");
        assert_eq!(calls[0].query_value("chat_id"), Some("-42"));
        let sent: NewMessageBody =
            serde_json::from_slice(calls[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent.text, payload);
    }

    #[tokio::test]
    async fn update_without_raw_payload_is_refused() {
        let transport = MockTransport::new();
        let debugs = Debugs::new(Arc::new(transport.clone()), 1);
        let update = UpdateDecoder::new(false)
            .decode_update(bot_started(1, 2).to_string().as_bytes())
            .unwrap();
        let err = debugs.send_update(&update).await.unwrap_err();
        assert!(matches!(err, MaxbotError::Config(_)));
        assert_eq!(transport.call_count().await, 0);
    }

    #[tokio::test]
    async fn error_text_is_posted() {
        let transport = MockTransport::new();
        transport.push_json(serde_json::json!({})).await;
        let debugs = Debugs::new(Arc::new(transport.clone()), 7);

        let err = MaxbotError::UnknownType {
            tag: "dialog_muted".into(),
        };
        debugs.send_error(&err).await.unwrap();

        let calls = transport.calls().await;
        let sent: NewMessageBody =
            serde_json::from_slice(calls[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent.text, "unknown update type: dialog_muted");
    }

    #[tokio::test]
    async fn transport_failure_is_returned() {
        let transport = MockTransport::new();
        transport.push_api_error(403, "chat.denied").await;
        let debugs = Debugs::new(Arc::new(transport), 7);
        let err = debugs
            .send_error(&std::io::Error::other("boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, MaxbotError::Api { code: 403, .. }));
    }
}
