// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-writer documentation and enforcement.
//!
//! All writes in hubdesk-storage are serialized through `tokio-rusqlite`'s
//! single background thread. The `Database` struct IS the single writer.
//! Query modules accept `&Database` and call through `conn.call()`.
//!
//! This is what makes the windowing rule's find-or-create safe: two
//! concurrent first-contact events for the same (page, customer) pair run
//! their read-check-write closures back to back on one thread, so the second
//! sees the first's row and reuses it instead of opening a duplicate.
//!
//! **Do NOT create additional Connection instances for writes.**
