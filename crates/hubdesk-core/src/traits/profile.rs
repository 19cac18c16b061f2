// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer profile resolution.

use async_trait::async_trait;

use crate::types::CustomerProfile;

/// Resolves a display name and avatar for an external customer id.
///
/// The signature is infallible by contract: implementations must swallow
/// transport and provider errors and return [`CustomerProfile::fallback`]
/// instead, so ingestion never blocks on the lookup.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn resolve(&self, customer_id: &str, access_token: &str) -> CustomerProfile;
}
