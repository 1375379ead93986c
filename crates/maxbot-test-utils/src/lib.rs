// SPDX-FileCopyrightText: 2026 Maxbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for maxbot integration tests.
//!
//! - [`MockTransport`] - scripted [`Transport`](maxbot_core::Transport) that records every call
//! - [`fixtures`] - JSON builders for update and attachment payloads

pub mod fixtures;
pub mod mock_transport;

pub use mock_transport::{MockTransport, RecordedCall};
