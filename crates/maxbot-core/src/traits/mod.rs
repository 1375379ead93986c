// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the ingestion core and its collaborators.

pub mod transport;

pub use transport::{Query, Transport};
