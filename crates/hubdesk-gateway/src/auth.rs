// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Agent sessions present pre-issued bearer tokens of the form
//! `<account_id>.<hex hmac-sha256(secret, account_id)>`. Token issuance
//! lives outside this service; the `hubdesk token` subcommand mints them for
//! operators. When no secret is configured, all requests are rejected
//! (fail-closed).

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authentication configuration for the gateway.
#[derive(Clone)]
pub struct AuthConfig {
    /// Shared secret for token verification. `None` rejects everything.
    pub secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// The verified account id of an authenticated request, inserted into
/// request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthedAccount(pub String);

impl AuthConfig {
    /// Verify a bearer token and return the account id it was minted for.
    pub fn verify(&self, token: &str) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let (account_id, sig_hex) = token.rsplit_once('.')?;
        if account_id.is_empty() {
            return None;
        }
        let sig = hex::decode(sig_hex).ok()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(account_id.as_bytes());
        // Constant-time comparison via the Mac trait.
        mac.verify_slice(&sig).ok()?;
        Some(account_id.to_string())
    }

    /// Mint a token for an account id. Used by the operator CLI and tests.
    pub fn mint(&self, account_id: &str) -> Option<String> {
        let secret = self.secret.as_ref()?;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(account_id.as_bytes());
        let sig = hex::encode(mac.finalize().into_bytes());
        Some(format!("{account_id}.{sig}"))
    }
}

/// Middleware that validates the `Authorization: Bearer` token and injects
/// the verified [`AuthedAccount`] into request extensions.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth.secret.is_none() {
        tracing::error!("gateway has no auth secret configured -- rejecting request");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token.and_then(|t| auth.verify(t)) {
        Some(account_id) => {
            request.extensions_mut().insert(AuthedAccount(account_id));
            Ok(next.run(request).await)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
