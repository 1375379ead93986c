// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON payload builders shaped like real Bot API traffic.

use serde_json::{Value, json};

/// A `message_created` update posted in `chat_id` with the given text.
pub fn message_created(chat_id: i64, text: &str) -> Value {
    message_created_with(chat_id, text, Vec::new())
}

/// A `message_created` update carrying the given raw attachments.
pub fn message_created_with(chat_id: i64, text: &str, attachments: Vec<Value>) -> Value {
    json!({
        "update_type": "message_created",
        "timestamp": 1_700_000_000_000_i64,
        "message": {
            "sender": {"user_id": 100, "first_name": "Tester", "name": "Tester", "is_bot": false},
            "recipient": {"chat_id": chat_id, "chat_type": "dialog", "user_id": 200},
            "timestamp": 1_700_000_000_000_i64,
            "body": {
                "mid": format!("mid.{chat_id}.{text}"),
                "seq": 1,
                "text": text,
                "attachments": attachments,
            }
        }
    })
}

/// A `bot_started` update.
pub fn bot_started(chat_id: i64, user_id: i64) -> Value {
    json!({
        "update_type": "bot_started",
        "timestamp": 1_700_000_000_000_i64,
        "chat_id": chat_id,
        "user": {"user_id": user_id, "first_name": "Starter", "name": "Starter"},
    })
}

/// A captionless group photo as the live API sends it: every optional
/// field is present, most of them `null`, and the deprecated `name` sits
/// next to `first_name`.
pub fn photo_without_caption(chat_id: i64) -> Value {
    json!({
        "update_type": "message_created",
        "timestamp": 1_718_000_000_123_i64,
        "user_locale": "ru",
        "message": {
            "sender": {
                "user_id": 58_420_013,
                "first_name": "Ann",
                "last_name": null,
                "username": null,
                "name": "Ann",
                "is_bot": false,
                "last_activity_time": 1_718_000_000_000_i64,
            },
            "recipient": {"chat_id": chat_id, "chat_type": "chat", "user_id": null},
            "timestamp": 1_718_000_000_120_i64,
            "link": null,
            "body": {
                "mid": "mid.ffffb2c4017e8a1b",
                "seq": 112_654_896_123_456_789_i64,
                "text": null,
                "attachments": [{
                    "type": "image",
                    "payload": {
                        "photo_id": 8_811_223_344_i64,
                        "token": "dG9rZW4",
                        "url": "https://i.oneme.ru/i?r=BTGBPUwtwgYUeoFhO7rESmr8",
                    },
                }],
                "markup": null,
            },
            "stat": null,
            "url": null,
        },
    })
}

/// An envelope with a tag the decoder does not know.
pub fn unknown_update(tag: &str) -> Value {
    json!({"update_type": tag, "timestamp": 1})
}

/// An `image` attachment.
pub fn image_attachment(photo_id: i64) -> Value {
    json!({
        "type": "image",
        "payload": {"photo_id": photo_id, "url": format!("https://i.max.ru/{photo_id}")},
    })
}

/// A `location` attachment.
pub fn location_attachment(latitude: f64, longitude: f64) -> Value {
    json!({"type": "location", "latitude": latitude, "longitude": longitude})
}

/// A `GET /updates` response body.
pub fn update_list(updates: Vec<Value>, marker: Option<i64>) -> Value {
    match marker {
        Some(marker) => json!({"updates": updates, "marker": marker}),
        None => json!({"updates": updates}),
    }
}
