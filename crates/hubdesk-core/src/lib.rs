// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hubdesk helpdesk service.
//!
//! This crate provides the error taxonomy, domain types, and the trait
//! seams the conversation threading engine is built against. The other
//! workspace crates implement or consume what is defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HubdeskError;
pub use types::{
    Conversation, ConversationStatus, CustomerProfile, InboundEvent, Message,
    MessageDirection, MessageUpdate, PageLink, PageStatus, Upsert,
};

pub use traits::{OutboundDispatcher, ProfileResolver, UpdatePublisher};
