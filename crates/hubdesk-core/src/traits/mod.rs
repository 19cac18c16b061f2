// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the threading engine and its collaborators.
//!
//! The engine receives these capabilities at construction; it never reaches
//! into ambient state to find a provider client or a socket server.

pub mod outbound;
pub mod profile;
pub mod publisher;

pub use outbound::OutboundDispatcher;
pub use profile::ProfileResolver;
pub use publisher::UpdatePublisher;
