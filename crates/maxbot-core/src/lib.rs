// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the maxbot client.
//!
//! This crate holds the wire types of the MAX Bot API, the error type shared
//! by every other crate in the workspace, the [`Transport`] seam the HTTP
//! client implements, and the [`UpdateDecoder`] that turns raw update bytes
//! into typed [`Update`] values.

pub mod decode;
pub mod error;
pub mod traits;
pub mod types;

pub use decode::UpdateDecoder;
pub use error::{DecodeStage, MaxbotError};
pub use traits::{Query, Transport};
pub use types::{
    Attachment, AttachmentType, HttpMethod, Message, MessageBody, RawPayload, Recipient, Update,
    UpdateKind, UpdateList, UpdateType, User,
};
