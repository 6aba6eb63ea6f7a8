//! Token endpoint client
//!
//! Implements the two token-bearing calls of the authorization-code + PKCE
//! flow: the initial code exchange and the silent refresh. Both are
//! form-encoded POSTs to the configured token endpoint that parse the same
//! JSON response shape into a [`Token`].
//!
//! The [`TokenExchange`] trait is the seam the lifecycle manager depends on;
//! [`HttpTokenExchanger`] is the only production implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::auth::token::Token;
use crate::error::{Result, SpindexError};

// ---------------------------------------------------------------------------
// TokenExchange
// ---------------------------------------------------------------------------

/// The token-endpoint operations the lifecycle manager needs.
///
/// Kept as a trait so tests can substitute a fake and assert which
/// operations ran (or that none did).
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchanges an authorization code for a token
    /// (`grant_type=authorization_code`).
    ///
    /// `redirect_uri` must be the exact URI the authorization request used;
    /// the server rejects the exchange otherwise.
    async fn exchange_code(&self, code: &str, verifier: &str, redirect_uri: &str)
        -> Result<Token>;

    /// Obtains a fresh token from a previous one
    /// (`grant_type=refresh_token`).
    ///
    /// When the response carries no new refresh token the old one is
    /// retained; servers are allowed to keep reusing it, and dropping it
    /// would end all future silent refreshes.
    async fn refresh(&self, old: &Token) -> Result<Token>;
}

// ---------------------------------------------------------------------------
// Token endpoint response (raw deserialization)
// ---------------------------------------------------------------------------

/// Raw JSON response from the token endpoint.
///
/// `expires_in` defaults to 0 when absent, which makes the resulting token
/// immediately stale and forces a refresh on next use.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    /// Converts the raw response into a [`Token`].
    ///
    /// `expires_at` is computed from `expires_in` at this moment, i.e. when
    /// the response is parsed, not when the request started.
    /// `fallback_refresh` fills in the refresh token when the server omitted
    /// one.
    fn into_token(self, fallback_refresh: Option<&str>) -> Token {
        let refresh_token = match self.refresh_token {
            Some(t) if !t.is_empty() => t,
            _ => fallback_refresh.unwrap_or_default().to_string(),
        };

        Token {
            access_token: self.access_token,
            token_type: self.token_type,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in as i64),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpTokenExchanger
// ---------------------------------------------------------------------------

/// Token endpoint client for a public (PKCE) OAuth client.
///
/// Requests carry no client secret; possession of the code verifier is the
/// proof of identity.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use spindex::auth::exchange::HttpTokenExchanger;
///
/// let exchanger = HttpTokenExchanger::new(
///     Arc::new(reqwest::Client::new()),
///     "my-client-id".to_string(),
///     "https://accounts.spotify.com/api/token".to_string(),
/// );
/// ```
pub struct HttpTokenExchanger {
    http: Arc<reqwest::Client>,
    client_id: String,
    token_url: String,
}

impl HttpTokenExchanger {
    /// Creates a new exchanger for the given client id and token endpoint.
    pub fn new(http: Arc<reqwest::Client>, client_id: String, token_url: String) -> Self {
        Self {
            http,
            client_id,
            token_url,
        }
    }

    /// POSTs a form to the token endpoint and returns status + body text.
    async fn post_form(&self, params: &[(&str, &str)]) -> Result<(u16, String)> {
        let resp = self
            .http
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(SpindexError::Http)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchanger {
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
        redirect_uri: &str,
    ) -> Result<Token> {
        tracing::debug!("Exchanging authorization code at {}", self.token_url);

        let (status, body) = self
            .post_form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("code_verifier", verifier),
            ])
            .await?;

        if status != 200 {
            return Err(SpindexError::TokenExchange { status, body }.into());
        }

        let raw: TokenResponse =
            serde_json::from_str(&body).map_err(SpindexError::Serialization)?;
        Ok(raw.into_token(None))
    }

    async fn refresh(&self, old: &Token) -> Result<Token> {
        tracing::debug!("Refreshing access token at {}", self.token_url);

        let (status, body) = self
            .post_form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", old.refresh_token.as_str()),
            ])
            .await?;

        if status != 200 {
            return Err(SpindexError::TokenRefresh { status, body }.into());
        }

        let raw: TokenResponse =
            serde_json::from_str(&body).map_err(SpindexError::Serialization)?;
        Ok(raw.into_token(Some(&old.refresh_token)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
