// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update (event) variants delivered by long polling and webhooks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::{User, null_as_default};
use super::message::Message;

/// Type tags of the updates the decoder knows how to build.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    MessageCreated,
    MessageEdited,
    MessageRemoved,
    MessageCallback,
    BotAdded,
    BotRemoved,
    UserAdded,
    UserRemoved,
    BotStarted,
    ChatTitleChanged,
}

/// A decoded update.
///
/// The type tag is not stored separately: it is derived from [`UpdateKind`],
/// so it can never disagree with the variant that was actually decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Unix time in milliseconds at which the event happened.
    pub timestamp: i64,
    /// Original payload text, captured only when the decoder runs in debug mode.
    pub debug_raw: Option<String>,
    pub kind: UpdateKind,
}

impl Update {
    pub fn update_type(&self) -> UpdateType {
        self.kind.update_type()
    }

    /// The message carried by this update, if any.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::MessageCreated(u) => Some(&u.message),
            UpdateKind::MessageEdited(u) => Some(&u.message),
            UpdateKind::MessageCallback(u) => u.message.as_ref(),
            _ => None,
        }
    }

    /// The chat this update belongs to, when the payload names one.
    pub fn chat_id(&self) -> Option<i64> {
        match &self.kind {
            UpdateKind::MessageCreated(u) => u.message.recipient.chat_id,
            UpdateKind::MessageEdited(u) => u.message.recipient.chat_id,
            UpdateKind::MessageRemoved(u) => Some(u.chat_id),
            UpdateKind::MessageCallback(u) => u.message.as_ref().and_then(|m| m.recipient.chat_id),
            UpdateKind::BotAdded(u) | UpdateKind::BotRemoved(u) => Some(u.chat_id),
            UpdateKind::UserAdded(u) => Some(u.chat_id),
            UpdateKind::UserRemoved(u) => Some(u.chat_id),
            UpdateKind::BotStarted(u) => Some(u.chat_id),
            UpdateKind::ChatTitleChanged(u) => Some(u.chat_id),
        }
    }
}

/// Variant-specific content of an update, one case per known type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    MessageCreated(MessageCreatedUpdate),
    MessageEdited(MessageEditedUpdate),
    MessageRemoved(MessageRemovedUpdate),
    MessageCallback(MessageCallbackUpdate),
    BotAdded(BotMembershipUpdate),
    BotRemoved(BotMembershipUpdate),
    UserAdded(UserAddedUpdate),
    UserRemoved(UserRemovedUpdate),
    BotStarted(BotStartedUpdate),
    ChatTitleChanged(ChatTitleChangedUpdate),
}

impl UpdateKind {
    pub fn update_type(&self) -> UpdateType {
        match self {
            Self::MessageCreated(_) => UpdateType::MessageCreated,
            Self::MessageEdited(_) => UpdateType::MessageEdited,
            Self::MessageRemoved(_) => UpdateType::MessageRemoved,
            Self::MessageCallback(_) => UpdateType::MessageCallback,
            Self::BotAdded(_) => UpdateType::BotAdded,
            Self::BotRemoved(_) => UpdateType::BotRemoved,
            Self::UserAdded(_) => UpdateType::UserAdded,
            Self::UserRemoved(_) => UpdateType::UserRemoved,
            Self::BotStarted(_) => UpdateType::BotStarted,
            Self::ChatTitleChanged(_) => UpdateType::ChatTitleChanged,
        }
    }
}

/// A new message was posted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCreatedUpdate {
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

/// A message was edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageEditedUpdate {
    pub message: Message,
}

/// A message was deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRemovedUpdate {
    pub message_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chat_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
}

/// An inline keyboard button was pressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    pub callback_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageCallbackUpdate {
    pub callback: Callback,
    /// The message the keyboard belongs to. May be absent if it was deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

/// The bot was added to or removed from a chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMembershipUpdate {
    pub chat_id: i64,
    /// The user who added or removed the bot.
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_channel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAddedUpdate {
    pub chat_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    /// Absent when the user joined by link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_channel: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRemovedUpdate {
    pub chat_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    /// Absent when the user left on their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_channel: bool,
}

/// A user pressed "Start" in a dialog with the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStartedUpdate {
    pub chat_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    /// Deep-link payload, if the bot was started through one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTitleChangedUpdate {
    pub chat_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: User,
    pub title: String,
}
