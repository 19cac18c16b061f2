// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime fanout for the Hubdesk helpdesk service.
//!
//! Implements the [`UpdatePublisher`] seam: threading results are pushed to
//! every live session of the owning agent account, best-effort and
//! at-most-once. The hub is handed to the threading engine at construction;
//! nothing reaches into ambient state to find it.
//!
//! [`UpdatePublisher`]: hubdesk_core::traits::UpdatePublisher

pub mod hub;

pub use hub::RealtimeHub;
