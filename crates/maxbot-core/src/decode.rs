// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type-dispatch decoding of update and attachment payloads.
//!
//! Payloads are decoded in two passes. The first pass reads only the shared
//! envelope to learn the type tag; the second decodes the full payload into
//! the variant for that tag. The variant structs hold [`RawPayload`] fields,
//! which serde cannot buffer through an internally tagged enum, so the tag
//! dispatch is done here by hand.
//!
//! Unknown update tags are rejected with [`MaxbotError::UnknownType`].
//! Unknown attachment tags are not errors: they decode to
//! [`Attachment::Unknown`] so a message with a new kind of attachment still
//! reaches the application.
//!
//! [`RawPayload`]: crate::types::RawPayload

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DecodeStage, MaxbotError};
use crate::types::attachment::UnknownAttachment;
use crate::types::{Attachment, AttachmentType, Update, UpdateKind, UpdateType};

#[derive(Deserialize)]
struct UpdateEnvelope {
    update_type: String,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Deserialize)]
struct AttachmentEnvelope {
    #[serde(rename = "type")]
    type_tag: String,
}

/// Decodes raw update payloads into [`Update`] values.
///
/// The debug flag is fixed at construction: when set, every decoded update
/// keeps a copy of its original payload in [`Update::debug_raw`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateDecoder {
    debug: bool,
}

impl UpdateDecoder {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Whether decoded updates capture their raw payload.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Decodes one update envelope and resolves the attachments it carries.
    pub fn decode_update(&self, data: &[u8]) -> Result<Update, MaxbotError> {
        let envelope: UpdateEnvelope = serde_json::from_slice(data)
            .map_err(|e| MaxbotError::decode(DecodeStage::Envelope, e))?;

        let update_type: UpdateType = envelope.update_type.parse().map_err(|_| {
            MaxbotError::UnknownType {
                tag: envelope.update_type.clone(),
            }
        })?;

        let kind = decode_kind(update_type, data)?;
        let debug_raw = self
            .debug
            .then(|| String::from_utf8_lossy(data).into_owned());

        let mut update = Update {
            timestamp: envelope.timestamp,
            debug_raw,
            kind,
        };
        self.resolve_attachments(&mut update)?;
        Ok(update)
    }

    /// Decodes one attachment payload, falling back to
    /// [`Attachment::Unknown`] for tags this client does not know.
    pub fn decode_attachment(&self, data: &[u8]) -> Result<Attachment, MaxbotError> {
        let envelope: AttachmentEnvelope = serde_json::from_slice(data)
            .map_err(|e| MaxbotError::decode(DecodeStage::Envelope, e))?;

        let Ok(attachment_type) = envelope.type_tag.parse::<AttachmentType>() else {
            debug!(type_tag = %envelope.type_tag, "unknown attachment type, keeping raw payload");
            return Ok(Attachment::Unknown(UnknownAttachment {
                type_tag: envelope.type_tag,
                raw: data.to_vec(),
            }));
        };

        let tag = attachment_type.as_ref();
        let attachment = match attachment_type {
            AttachmentType::Audio => Attachment::Audio(typed(tag, data)?),
            AttachmentType::Contact => Attachment::Contact(typed(tag, data)?),
            AttachmentType::File => Attachment::File(typed(tag, data)?),
            AttachmentType::Image => Attachment::Image(typed(tag, data)?),
            AttachmentType::InlineKeyboard => Attachment::Keyboard(typed(tag, data)?),
            AttachmentType::Location => Attachment::Location(typed(tag, data)?),
            AttachmentType::Share => Attachment::Share(typed(tag, data)?),
            AttachmentType::Sticker => Attachment::Sticker(typed(tag, data)?),
            AttachmentType::Video => Attachment::Video(typed(tag, data)?),
        };
        Ok(attachment)
    }

    /// Decodes the raw attachments of `message_created` and `message_edited`
    /// updates into the message body, preserving order.
    ///
    /// Either every attachment decodes or the body is left untouched and the
    /// first failure is returned. Other update kinds pass through.
    pub fn resolve_attachments(&self, update: &mut Update) -> Result<(), MaxbotError> {
        let body = match &mut update.kind {
            UpdateKind::MessageCreated(u) => &mut u.message.body,
            UpdateKind::MessageEdited(u) => &mut u.message.body,
            _ => return Ok(()),
        };

        let attachments = body
            .raw_attachments
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                self.decode_attachment(raw.as_bytes())
                    .map_err(|e| MaxbotError::Attachment {
                        index,
                        source: Box::new(e),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        body.attachments = attachments;
        Ok(())
    }
}

fn decode_kind(update_type: UpdateType, data: &[u8]) -> Result<UpdateKind, MaxbotError> {
    let tag = update_type.as_ref();
    let kind = match update_type {
        UpdateType::MessageCreated => UpdateKind::MessageCreated(typed(tag, data)?),
        UpdateType::MessageEdited => UpdateKind::MessageEdited(typed(tag, data)?),
        UpdateType::MessageRemoved => UpdateKind::MessageRemoved(typed(tag, data)?),
        UpdateType::MessageCallback => UpdateKind::MessageCallback(typed(tag, data)?),
        UpdateType::BotAdded => UpdateKind::BotAdded(typed(tag, data)?),
        UpdateType::BotRemoved => UpdateKind::BotRemoved(typed(tag, data)?),
        UpdateType::UserAdded => UpdateKind::UserAdded(typed(tag, data)?),
        UpdateType::UserRemoved => UpdateKind::UserRemoved(typed(tag, data)?),
        UpdateType::BotStarted => UpdateKind::BotStarted(typed(tag, data)?),
        UpdateType::ChatTitleChanged => UpdateKind::ChatTitleChanged(typed(tag, data)?),
    };
    Ok(kind)
}

fn typed<T: DeserializeOwned>(tag: &str, data: &[u8]) -> Result<T, MaxbotError> {
    serde_json::from_slice(data)
        .map_err(|e| MaxbotError::decode(DecodeStage::Typed(tag.to_string()), e))
}
