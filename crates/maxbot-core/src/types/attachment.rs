// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Attachment variants embedded in message bodies.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{User, null_as_default};

/// Type tags of the attachments the decoder knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttachmentType {
    Audio,
    Contact,
    File,
    Image,
    InlineKeyboard,
    Location,
    Share,
    Sticker,
    Video,
}

/// A decoded attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Audio(AudioAttachment),
    Contact(ContactAttachment),
    File(FileAttachment),
    Image(PhotoAttachment),
    Keyboard(InlineKeyboardAttachment),
    Location(LocationAttachment),
    Share(ShareAttachment),
    Sticker(StickerAttachment),
    Video(VideoAttachment),
    /// An attachment kind this client does not know yet.
    Unknown(UnknownAttachment),
}

impl Attachment {
    /// The wire type tag of this attachment.
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Audio(_) => AttachmentType::Audio.as_ref(),
            Self::Contact(_) => AttachmentType::Contact.as_ref(),
            Self::File(_) => AttachmentType::File.as_ref(),
            Self::Image(_) => AttachmentType::Image.as_ref(),
            Self::Keyboard(_) => AttachmentType::InlineKeyboard.as_ref(),
            Self::Location(_) => AttachmentType::Location.as_ref(),
            Self::Share(_) => AttachmentType::Share.as_ref(),
            Self::Sticker(_) => AttachmentType::Sticker.as_ref(),
            Self::Video(_) => AttachmentType::Video.as_ref(),
            Self::Unknown(unknown) => &unknown.type_tag,
        }
    }
}

/// Fallback for unrecognized attachment tags: the tag plus the original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAttachment {
    pub type_tag: String,
    pub raw: Vec<u8>,
}

/// Payload shared by uploaded media (audio, video).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: MediaPayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    /// Contact card in vCard format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcf_info: Option<String>,
    /// Set when the contact is a MAX user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_info: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: ContactPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: MediaPayload,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotoPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub photo_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: PhotoPayload,
}

/// A single inline keyboard button. The set of button types grows over
/// time, so the type is kept as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub button_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keyboard {
    /// Rows of buttons, top to bottom.
    #[serde(deserialize_with = "null_as_default")]
    pub buttons: Vec<Vec<Button>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboardAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: Keyboard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationAttachment {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareAttachment {
    #[serde(deserialize_with = "null_as_default")]
    pub payload: SharePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerAttachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub payload: StickerPayload,
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoAttachment {
    #[serde(deserialize_with = "null_as_default")]
    pub payload: MediaPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<VideoThumbnail>,
    #[serde(deserialize_with = "null_as_default")]
    pub width: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: i32,
    /// Duration in seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub duration: i32,
}
