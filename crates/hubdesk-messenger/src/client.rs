// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facebook Graph API client.
//!
//! Covers the three calls the helpdesk needs: customer profile lookup,
//! Send API dispatch, and webhook subscription for a connected page.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use hubdesk_core::traits::{OutboundDispatcher, ProfileResolver};
use hubdesk_core::types::CustomerProfile;
use hubdesk_core::HubdeskError;

/// Webhook fields subscribed on page connect.
const SUBSCRIBED_FIELDS: &str =
    "messages,messaging_postbacks,messaging_optins,message_deliveries,message_reads";

/// HTTP client for the Facebook Graph API.
pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    name: String,
    #[serde(default)]
    profile_pic: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: String,
}

impl GraphClient {
    /// Create a client for the given Graph API version segment (e.g. `v19.0`).
    pub fn new(api_version: &str) -> Result<Self, HubdeskError> {
        Self::with_base_url(format!("https://graph.facebook.com/{api_version}"))
    }

    /// Create a client against an explicit base URL. Used in tests and when
    /// `messenger.api_base_url` is configured.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, HubdeskError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HubdeskError::Provider {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a customer's display name and avatar.
    pub async fn fetch_profile(
        &self,
        customer_id: &str,
        access_token: &str,
    ) -> Result<CustomerProfile, HubdeskError> {
        let url = format!("{}/{customer_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", "name,profile_pic"), ("access_token", access_token)])
            .send()
            .await
            .map_err(|e| HubdeskError::Provider {
                message: format!("profile request for {customer_id} failed"),
                source: Some(Box::new(e)),
            })?;

        if !response.status().is_success() {
            return Err(HubdeskError::Provider {
                message: format!(
                    "profile request for {customer_id} returned {}",
                    response.status()
                ),
                source: None,
            });
        }

        let profile: ProfileResponse =
            response.json().await.map_err(|e| HubdeskError::Provider {
                message: "profile response was not valid JSON".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(CustomerProfile {
            name: profile.name,
            picture: profile.profile_pic,
        })
    }

    /// Send a text message through the Send API.
    ///
    /// Returns the provider-assigned message id.
    pub async fn send_text(
        &self,
        page_id: &str,
        access_token: &str,
        recipient_id: &str,
        text: &str,
    ) -> Result<String, HubdeskError> {
        let url = format!("{}/{page_id}/messages", self.base_url);
        let body = serde_json::json!({
            "recipient": { "id": recipient_id },
            "message": { "text": text },
            "messaging_type": "RESPONSE",
            "access_token": access_token,
        });

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            HubdeskError::DeliveryFailed {
                message: "send api request failed".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        if !response.status().is_success() {
            return Err(HubdeskError::DeliveryFailed {
                message: format!("send api returned {}", response.status()),
                source: None,
            });
        }

        let sent: SendResponse = response.json().await.map_err(|e| {
            HubdeskError::DeliveryFailed {
                message: "send api response was not valid JSON".to_string(),
                source: Some(Box::new(e)),
            }
        })?;

        debug!(page_id, recipient_id, mid = %sent.message_id, "message dispatched");
        Ok(sent.message_id)
    }

    /// Subscribe the app to a page's webhook fields.
    pub async fn subscribe_page(
        &self,
        page_id: &str,
        access_token: &str,
    ) -> Result<(), HubdeskError> {
        let url = format!("{}/{page_id}/subscribed_apps", self.base_url);
        let body = serde_json::json!({
            "subscribed_fields": SUBSCRIBED_FIELDS,
            "access_token": access_token,
        });

        let response = self.http.post(&url).json(&body).send().await.map_err(|e| {
            HubdeskError::Provider {
                message: format!("webhook subscription for {page_id} failed"),
                source: Some(Box::new(e)),
            }
        })?;

        if !response.status().is_success() {
            return Err(HubdeskError::Provider {
                message: format!(
                    "webhook subscription for {page_id} returned {}",
                    response.status()
                ),
                source: None,
            });
        }

        debug!(page_id, "subscribed to page webhooks");
        Ok(())
    }
}

#[async_trait]
impl ProfileResolver for GraphClient {
    async fn resolve(&self, customer_id: &str, access_token: &str) -> CustomerProfile {
        match self.fetch_profile(customer_id, access_token).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, customer_id, "profile lookup failed, using fallback");
                CustomerProfile::fallback()
            }
        }
    }
}

#[async_trait]
impl OutboundDispatcher for GraphClient {
    async fn dispatch(
        &self,
        page_id: &str,
        access_token: &str,
        recipient_id: &str,
        text: &str,
    ) -> Result<String, HubdeskError> {
        self.send_text(page_id, access_token, recipient_id, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_profile_parses_name_and_picture() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cust-1"))
            .and(query_param("fields", "name,profile_pic"))
            .and(query_param("access_token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Jane Roe",
                "profile_pic": "https://example.test/jane.jpg"
            })))
            .mount(&server)
            .await;

        let client = GraphClient::with_base_url(server.uri()).unwrap();
        let profile = client.fetch_profile("cust-1", "tok").await.unwrap();
        assert_eq!(profile.name, "Jane Roe");
        assert_eq!(
            profile.picture.as_deref(),
            Some("https://example.test/jane.jpg")
        );
    }

    #[tokio::test]
    async fn resolve_falls_back_on_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cust-1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GraphClient::with_base_url(server.uri()).unwrap();
        let profile = client.resolve("cust-1", "tok").await;
        assert_eq!(profile, CustomerProfile::fallback());
    }

    #[tokio::test]
    async fn send_text_returns_provider_message_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page-1/messages"))
            .and(body_partial_json(serde_json::json!({
                "recipient": { "id": "cust-1" },
                "message": { "text": "hello there" },
                "messaging_type": "RESPONSE"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "recipient_id": "cust-1",
                "message_id": "m.out.1"
            })))
            .mount(&server)
            .await;

        let client = GraphClient::with_base_url(server.uri()).unwrap();
        let mid = client
            .send_text("page-1", "tok", "cust-1", "hello there")
            .await
            .unwrap();
        assert_eq!(mid, "m.out.1");
    }

    #[tokio::test]
    async fn send_text_failure_is_delivery_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page-1/messages"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let client = GraphClient::with_base_url(server.uri()).unwrap();
        let err = client
            .send_text("page-1", "tok", "cust-1", "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, HubdeskError::DeliveryFailed { .. }));
    }

    #[tokio::test]
    async fn subscribe_page_posts_subscribed_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/page-1/subscribed_apps"))
            .and(body_partial_json(serde_json::json!({
                "access_token": "tok"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphClient::with_base_url(server.uri()).unwrap();
        client.subscribe_page("page-1", "tok").await.unwrap();
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_normalized() {
        let client = GraphClient::with_base_url("http://example.test/v19.0/").unwrap();
        assert_eq!(client.base_url, "http://example.test/v19.0");
    }
}
