// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facebook Messenger integration for the Hubdesk helpdesk service.
//!
//! Implements the [`ProfileResolver`] and [`OutboundDispatcher`] seams
//! against the Graph API, and provides the webhook payload wire types plus
//! normalization into the shape the threading engine consumes.
//!
//! [`ProfileResolver`]: hubdesk_core::traits::ProfileResolver
//! [`OutboundDispatcher`]: hubdesk_core::traits::OutboundDispatcher

pub mod client;
pub mod webhook;

pub use client::GraphClient;
pub use webhook::{normalize, WebhookPayload};
