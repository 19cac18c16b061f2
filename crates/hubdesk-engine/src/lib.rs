// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation threading engine for the Hubdesk helpdesk service.
//!
//! The engine is the hinge of the pipeline: webhook ingress feeds it
//! normalized events, it resolves threads under the 24-hour windowing rule,
//! persists idempotently, and fans results out to live agent sessions. The
//! REST reply path runs through the same engine so both directions share
//! one set of persistence and authorization invariants.

pub mod engine;

pub use engine::{ThreadingEngine, SESSION_WINDOW_MS};
