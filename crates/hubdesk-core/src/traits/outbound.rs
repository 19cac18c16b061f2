// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message dispatch to the messaging provider.

use async_trait::async_trait;

use crate::error::HubdeskError;

/// Dispatches an agent reply through the provider's Send API.
#[async_trait]
pub trait OutboundDispatcher: Send + Sync {
    /// Sends `text` to `recipient_id` on behalf of `page_id`.
    ///
    /// Returns the provider-assigned message id on success. Failures map to
    /// [`HubdeskError::DeliveryFailed`]; the caller persists nothing.
    async fn dispatch(
        &self,
        page_id: &str,
        access_token: &str,
        recipient_id: &str,
        text: &str,
    ) -> Result<String, HubdeskError>;
}
