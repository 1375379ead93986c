// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messages and message bodies.

use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::{ChatType, RawPayload, User, null_as_default, null_as_empty};

/// Where a message was posted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub chat_type: ChatType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// The content of a message.
///
/// The API delivers attachments as a heterogeneous array. They are kept in
/// `raw_attachments` exactly as received and decoded into `attachments`
/// (same order) when the enclosing update is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Unique message identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mid: String,
    /// Sequence number of the message in its chat.
    #[serde(default, deserialize_with = "null_as_default")]
    pub seq: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(
        rename = "attachments",
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub raw_attachments: Vec<RawPayload>,
    /// Decoded attachments. Empty until the update has been resolved.
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

/// How a message relates to the one it links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Forward,
    Reply,
}

/// A forwarded or replied-to message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedMessage {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    pub message: MessageBody,
}

/// Message statistics, only present for channel posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStat {
    #[serde(deserialize_with = "null_as_default")]
    pub views: i64,
}

/// A message as delivered in `message_created`, `message_edited` and
/// `message_callback` updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Absent for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipient: Recipient,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkedMessage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: MessageBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<MessageStat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
