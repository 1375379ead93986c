// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of full `GET /updates` responses as the poller sees them.

use maxbot_core::{Attachment, MaxbotError, UpdateDecoder, UpdateList, UpdateType};

const BATCH: &str = r#"{
    "updates": [
        {
            "update_type": "message_created",
            "timestamp": 1700000000000,
            "message": {
                "sender": {"user_id": 100, "first_name": "Ann", "name": "Ann", "is_bot": false},
                "recipient": {"chat_id": 1, "chat_type": "dialog", "user_id": 200},
                "timestamp": 1700000000000,
                "body": {
                    "mid": "mid.1",
                    "seq": 10,
                    "text": "photo and buttons",
                    "attachments": [
                        {"type": "image", "payload": {"photo_id": 5, "url": "https://i/5"}},
                        {"type": "inline_keyboard", "payload": {"buttons": [[{"type": "callback", "text": "Ok", "payload": "ok"}]]}}
                    ]
                }
            }
        },
        {"update_type": "dialog_muted", "timestamp": 1700000000001, "chat_id": 1},
        {"update_type": "message_callback", "timestamp": 1700000000002, "callback": {"callback_id": "c1", "payload": "ok", "user": {"user_id": 100}}}
    ],
    "marker": 42
}"#;

#[test]
fn batch_decodes_per_item_and_skips_unknown() {
    let list: UpdateList = serde_json::from_str(BATCH).unwrap();
    assert_eq!(list.marker, Some(42));
    assert_eq!(list.updates.len(), 3);

    let decoder = UpdateDecoder::new(false);
    let results: Vec<_> = list
        .updates
        .iter()
        .map(|raw| decoder.decode_update(raw.as_bytes()))
        .collect();

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.update_type(), UpdateType::MessageCreated);
    let body = &first.message().unwrap().body;
    assert_eq!(body.attachments.len(), 2);
    assert!(matches!(
        &body.attachments[1],
        Attachment::Keyboard(k) if k.payload.buttons[0][0].text == "Ok"
    ));
    let sender = first.message().unwrap().sender.as_ref().unwrap();
    assert_eq!(sender.first_name, "Ann");
    assert_eq!(sender.name.as_deref(), Some("Ann"));

    assert!(matches!(&results[1], Err(MaxbotError::UnknownType { tag }) if tag == "dialog_muted"));

    let third = results[2].as_ref().unwrap();
    assert_eq!(third.update_type(), UpdateType::MessageCallback);
    assert!(third.message().is_none());
}

#[test]
fn empty_and_null_batches_are_empty() {
    for json in [r#"{"updates":[]}"#, r#"{"updates":null,"marker":3}"#, "{}"] {
        let list: UpdateList = serde_json::from_str(json).unwrap();
        assert!(list.updates.is_empty(), "{json}");
    }
}

/// A group photo without a caption, shaped like live API traffic: nullable
/// fields are sent as `null` and the deprecated `name` sits next to
/// `first_name`.
const PHOTO_WITHOUT_CAPTION: &str = r#"{
    "update_type": "message_created",
    "timestamp": 1718000000123,
    "user_locale": "ru",
    "message": {
        "sender": {
            "user_id": 58420013,
            "first_name": "Ann",
            "last_name": null,
            "username": null,
            "name": "Ann",
            "is_bot": false,
            "last_activity_time": 1718000000000
        },
        "recipient": {"chat_id": -70012345, "chat_type": "chat", "user_id": null},
        "timestamp": 1718000000120,
        "link": null,
        "body": {
            "mid": "mid.ffffb2c4017e8a1b",
            "seq": 112654896123456789,
            "text": null,
            "attachments": [
                {
                    "type": "image",
                    "payload": {
                        "photo_id": 8811223344,
                        "token": "dG9rZW4",
                        "url": "https://i.oneme.ru/i?r=BTGBPUwtwgYUeoFhO7rESmr8"
                    }
                }
            ],
            "markup": null
        },
        "stat": null,
        "url": null
    }
}"#;

#[test]
fn photo_without_caption_decodes() {
    let update = UpdateDecoder::new(false)
        .decode_update(PHOTO_WITHOUT_CAPTION.as_bytes())
        .unwrap();
    assert_eq!(update.update_type(), UpdateType::MessageCreated);
    assert_eq!(update.chat_id(), Some(-70012345));

    let message = update.message().unwrap();
    let sender = message.sender.as_ref().unwrap();
    assert_eq!(sender.first_name, "Ann");
    assert_eq!(sender.name.as_deref(), Some("Ann"));
    assert!(sender.last_name.is_none());
    assert!(sender.username.is_none());
    assert!(message.link.is_none());

    assert_eq!(message.body.text, "");
    assert!(matches!(
        &message.body.attachments[..],
        [Attachment::Image(image)] if image.payload.photo_id == 8811223344
    ));
}

#[test]
fn null_user_fields_fall_back_to_defaults() {
    let data = br#"{
        "update_type": "bot_started",
        "timestamp": 1,
        "chat_id": 9,
        "user": {
            "user_id": 1,
            "first_name": null,
            "last_name": null,
            "username": null,
            "is_bot": null,
            "last_activity_time": null
        },
        "payload": null
    }"#;
    let update = UpdateDecoder::new(false).decode_update(data).unwrap();
    let maxbot_core::UpdateKind::BotStarted(started) = &update.kind else {
        panic!("unexpected kind: {:?}", update.kind);
    };
    assert_eq!(started.user.user_id, 1);
    assert_eq!(started.user.first_name, "");
    assert!(started.user.last_name.is_none());
    assert!(started.user.username.is_none());
    assert!(!started.user.is_bot);
    assert!(started.payload.is_none());
}
