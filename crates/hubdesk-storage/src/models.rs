// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `hubdesk-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use hubdesk_core::types::{
    Conversation, ConversationStatus, Message, MessageDirection, PageLink, PageStatus,
};
