//! Token cache and login lifecycle
//!
//! [`Authenticator`] is the sole entry point API consumers use to obtain
//! credentials. It coordinates the token cache, the token exchanger, and
//! the interactive browser flow:
//!
//! - a cached, fresh token is returned without any network call,
//! - a stale token is refreshed silently,
//! - everything else runs the full authorization-code + PKCE flow through
//!   the user's browser.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::callback::{CallbackListener, CallbackResult};
use crate::auth::exchange::{HttpTokenExchanger, TokenExchange};
use crate::auth::pkce::{self, PkceAttempt};
use crate::auth::token::{Credentials, MemoryTokenCache, Token, TokenCache};
use crate::config::Config;
use crate::error::{Result, SpindexError};

// ---------------------------------------------------------------------------
// AuthParams
// ---------------------------------------------------------------------------

/// Everything one [`Authenticator`] needs to drive a login.
///
/// Built from the application [`Config`]; tests construct it directly to
/// point at mock servers and shrink the timeout.
#[derive(Debug, Clone)]
pub struct AuthParams {
    /// OAuth client identifier (public PKCE client, no secret)
    pub client_id: String,

    /// Authorization endpoint presented to the browser
    pub authorize_url: String,

    /// Token endpoint for exchange and refresh
    pub token_url: String,

    /// Loopback port for the callback listener; `0` = OS-assigned
    pub redirect_port: u16,

    /// Scopes requested during login
    pub scopes: Vec<String>,

    /// How long to wait for the browser callback
    pub login_timeout: Duration,
}

impl AuthParams {
    /// Extracts the login parameters from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            client_id: config.spotify.client_id.clone(),
            authorize_url: config.spotify.authorize_url.clone(),
            token_url: config.spotify.token_url.clone(),
            redirect_port: config.auth.redirect_port,
            scopes: config.spotify.scopes.clone(),
            login_timeout: Duration::from_secs(config.auth.login_timeout_seconds),
        }
    }
}

// ---------------------------------------------------------------------------
// BrowserOpener
// ---------------------------------------------------------------------------

/// Opens the authorization URL in the user's browser.
///
/// A trait so tests can substitute a stub that simulates the redirect
/// instead of launching anything.
pub trait BrowserOpener: Send + Sync {
    /// Attempts to open `url`. Failure is non-fatal: the URL has already
    /// been printed for manual use.
    fn open(&self, url: &str) -> std::io::Result<()>;
}

/// Launches the platform's default browser.
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        #[cfg(target_os = "macos")]
        let spawned = std::process::Command::new("open").arg(url).spawn();
        #[cfg(target_os = "windows")]
        let spawned = std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn();
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let spawned = std::process::Command::new("xdg-open").arg(url).spawn();

        spawned.map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// Authenticator
// ---------------------------------------------------------------------------

/// Token cache and login lifecycle manager.
///
/// Owns the single process-local [`Token`] slot. Token material leaves this
/// type only as an immutable [`Credentials`] snapshot.
///
/// # Concurrency
///
/// `login` is designed for one authentication attempt in flight at a time.
/// The type does not serialize concurrent `login` calls internally; callers
/// that need concurrent use must wrap the `Authenticator` in a
/// `tokio::sync::Mutex` (or serialize calls some other way).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use spindex::auth::session::{AuthParams, Authenticator};
/// use spindex::config::Config;
///
/// # async fn example() -> spindex::error::Result<()> {
/// let config = Config::default();
/// let auth = Authenticator::new(
///     AuthParams::from_config(&config),
///     Arc::new(reqwest::Client::new()),
/// );
/// let creds = auth.login().await?;
/// println!("access token: {}", creds.access_token);
/// # Ok(())
/// # }
/// ```
pub struct Authenticator {
    params: AuthParams,
    cache: Arc<dyn TokenCache>,
    exchanger: Arc<dyn TokenExchange>,
    browser: Arc<dyn BrowserOpener>,
}

impl Authenticator {
    /// Creates an authenticator with the production wiring: an empty
    /// in-memory cache, the HTTP token exchanger, and the system browser.
    pub fn new(params: AuthParams, http: Arc<reqwest::Client>) -> Self {
        let exchanger = HttpTokenExchanger::new(
            http,
            params.client_id.clone(),
            params.token_url.clone(),
        );
        Self {
            params,
            cache: Arc::new(MemoryTokenCache::new()),
            exchanger: Arc::new(exchanger),
            browser: Arc::new(SystemBrowser),
        }
    }

    /// Creates an authenticator from explicit parts.
    ///
    /// This is the seam tests use to inject a pre-populated cache, a fake
    /// exchanger, or a stub browser.
    pub fn with_parts(
        params: AuthParams,
        cache: Arc<dyn TokenCache>,
        exchanger: Arc<dyn TokenExchange>,
        browser: Arc<dyn BrowserOpener>,
    ) -> Self {
        Self {
            params,
            cache,
            exchanger,
            browser,
        }
    }

    /// Returns a usable access/refresh credential pair, authenticating as
    /// needed.
    ///
    /// Resolution order:
    ///
    /// 1. A cached token whose expiry is comfortably in the future is
    ///    returned as-is, with no network call.
    /// 2. A stale cached token triggers one refresh. On success the new
    ///    token replaces the cache. A refresh failure is logged and never
    ///    surfaced: it falls through to step 3.
    /// 3. Otherwise the full interactive login runs: fresh PKCE attempt,
    ///    callback listener, browser, code exchange.
    ///
    /// # Errors
    ///
    /// Returns [`SpindexError::AuthTimeout`] when no callback arrives in
    /// time, [`SpindexError::AuthDenied`] when the authorization server or
    /// the callback validation rejects the attempt, and
    /// [`SpindexError::TokenExchange`] when the code exchange fails. A
    /// failed exchange leaves the cache unchanged.
    pub async fn login(&self) -> Result<Credentials> {
        if let Some(token) = self.cache.get() {
            if token.is_fresh() {
                tracing::debug!("Using cached access token");
                return Ok(token.credentials());
            }

            match self.exchanger.refresh(&token).await {
                Ok(new_token) => {
                    tracing::debug!("Access token refreshed");
                    let creds = new_token.credentials();
                    self.cache.put(new_token);
                    return Ok(creds);
                }
                Err(e) => {
                    tracing::warn!(
                        "Token refresh failed, falling back to interactive login: {e}"
                    );
                }
            }
        }

        let token = self.interactive_login().await?;
        let creds = token.credentials();
        self.cache.put(token);
        Ok(creds)
    }

    /// Returns a valid access token, authenticating as needed.
    ///
    /// Convenience wrapper over [`login`](Self::login) for callers that
    /// only need the bearer credential.
    pub async fn access_token(&self) -> Result<String> {
        Ok(self.login().await?.access_token)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Runs the full browser-based authorization-code + PKCE flow.
    ///
    /// The callback listener is stopped on every path out of this function:
    /// success, callback failure, and timeout.
    async fn interactive_login(&self) -> Result<Token> {
        let attempt = pkce::generate();

        let (listener, result_rx) =
            CallbackListener::bind(self.params.redirect_port, attempt.state.clone()).await?;
        let redirect_uri = listener.redirect_uri();

        let auth_url = self.build_authorize_url(&attempt, &redirect_uri)?;

        eprintln!("Open the following URL in your browser to authorize Spindex:\n{auth_url}");
        if let Err(e) = self.browser.open(&auth_url) {
            tracing::warn!("Could not open the browser automatically: {e}");
        }

        let outcome = tokio::time::timeout(self.params.login_timeout, result_rx).await;
        let result = match outcome {
            Err(_) => {
                listener.shutdown().await;
                return Err(
                    SpindexError::AuthTimeout(self.params.login_timeout.as_secs()).into(),
                );
            }
            Ok(Err(_)) => {
                listener.shutdown().await;
                return Err(SpindexError::Listener(
                    "listener stopped before delivering a result".to_string(),
                )
                .into());
            }
            Ok(Ok(result)) => result,
        };
        listener.shutdown().await;

        let code = match result {
            CallbackResult::Code(code) => code,
            CallbackResult::Denied { error, description } => {
                let reason = if description.is_empty() {
                    error
                } else {
                    format!("{error} - {description}")
                };
                return Err(SpindexError::AuthDenied(reason).into());
            }
            CallbackResult::StateMismatch => {
                return Err(
                    SpindexError::AuthDenied("state mismatch in callback".to_string()).into(),
                );
            }
            CallbackResult::MissingCode => {
                return Err(SpindexError::AuthDenied(
                    "authorization code missing from callback".to_string(),
                )
                .into());
            }
        };

        self.exchanger
            .exchange_code(&code, &attempt.verifier, &redirect_uri)
            .await
    }

    /// Builds the authorization URL presented to the user's browser.
    fn build_authorize_url(&self, attempt: &PkceAttempt, redirect_uri: &str) -> Result<String> {
        let mut url = Url::parse(&self.params.authorize_url)
            .map_err(|e| SpindexError::Config(format!("invalid authorize URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &self.params.client_id);
            query.append_pair("response_type", "code");
            query.append_pair("redirect_uri", redirect_uri);
            query.append_pair("state", &attempt.state);
            query.append_pair("scope", &self.params.scopes.join(" "));
            query.append_pair("code_challenge_method", "S256");
            query.append_pair("code_challenge", &attempt.challenge);
        }

        Ok(url.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
