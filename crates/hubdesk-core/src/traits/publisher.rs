// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime fanout capability.

use crate::types::MessageUpdate;

/// Delivers a threading result to every live session of an agent account.
///
/// Delivery is best-effort, at-most-once per session, and non-blocking: a
/// session that is not connected (or whose buffer is full) simply misses the
/// push and reconciles on its next REST fetch. No errors are surfaced.
pub trait UpdatePublisher: Send + Sync {
    fn publish(&self, account_id: &str, update: &MessageUpdate);
}
