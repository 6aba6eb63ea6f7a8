//! Shared helpers for the auth integration tests
//!
//! Fakes for the [`TokenExchange`] and [`BrowserOpener`] seams plus token
//! and parameter builders. Each test binary compiles its own copy, so not
//! every helper is used everywhere.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use spindex::auth::exchange::TokenExchange;
use spindex::auth::session::{AuthParams, BrowserOpener};
use spindex::auth::token::Token;
use spindex::error::{Result, SpindexError};

// ---------------------------------------------------------------------------
// Token builders
// ---------------------------------------------------------------------------

/// A token that passes the freshness check for the next hour.
pub fn fresh_token(access: &str, refresh: &str) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.to_string(),
        expires_at: Utc::now() + ChronoDuration::hours(1),
    }
}

/// A token inside the five-minute staleness margin.
pub fn stale_token(access: &str, refresh: &str) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.to_string(),
        expires_at: Utc::now() + ChronoDuration::seconds(30),
    }
}

/// Login parameters pointing at a (usually mock) token endpoint, with an
/// ephemeral callback port and a short timeout.
pub fn test_params(token_url: &str) -> AuthParams {
    AuthParams {
        client_id: "test-client-id".to_string(),
        authorize_url: "https://accounts.example.invalid/authorize".to_string(),
        token_url: token_url.to_string(),
        redirect_port: 0,
        scopes: vec![
            "playlist-read-private".to_string(),
            "user-library-read".to_string(),
        ],
        login_timeout: Duration::from_secs(5),
    }
}

// ---------------------------------------------------------------------------
// Exchanger fakes
// ---------------------------------------------------------------------------

/// Exchanger that panics on any call.
///
/// Used to prove a code path performs no token-endpoint traffic.
pub struct PanickingExchanger;

#[async_trait]
impl TokenExchange for PanickingExchanger {
    async fn exchange_code(&self, _: &str, _: &str, _: &str) -> Result<Token> {
        panic!("exchange_code must not be called in this test");
    }

    async fn refresh(&self, _: &Token) -> Result<Token> {
        panic!("refresh must not be called in this test");
    }
}

/// Configurable exchanger that counts calls and returns canned tokens.
///
/// A `None` slot makes the corresponding operation fail with a typed error.
pub struct FakeExchanger {
    exchange_result: Option<Token>,
    refresh_result: Option<Token>,
    pub exchange_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
}

impl FakeExchanger {
    /// Both operations fail.
    pub fn failing() -> Self {
        Self {
            exchange_result: None,
            refresh_result: None,
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// `refresh` succeeds with the given token; `exchange_code` fails.
    pub fn refreshing_to(token: Token) -> Self {
        Self {
            exchange_result: None,
            refresh_result: Some(token),
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// `exchange_code` succeeds with the given token; `refresh` fails.
    pub fn exchanging_to(token: Token) -> Self {
        Self {
            exchange_result: Some(token),
            refresh_result: None,
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    pub fn exchange_count(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for FakeExchanger {
    async fn exchange_code(&self, _: &str, _: &str, _: &str) -> Result<Token> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchange_result.clone().ok_or_else(|| {
            SpindexError::TokenExchange {
                status: 500,
                body: "fake exchange failure".to_string(),
            }
            .into()
        })
    }

    async fn refresh(&self, _: &Token) -> Result<Token> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_result.clone().ok_or_else(|| {
            SpindexError::TokenRefresh {
                status: 400,
                body: "fake refresh failure".to_string(),
            }
            .into()
        })
    }
}

// ---------------------------------------------------------------------------
// Browser fakes
// ---------------------------------------------------------------------------

/// Browser that does nothing; the login then waits until its timeout.
pub struct NoopBrowser;

impl BrowserOpener for NoopBrowser {
    fn open(&self, _url: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Browser stub that plays the role of the user and the authorization
/// server: it parses `redirect_uri` and `state` out of the authorization
/// URL and issues the redirect callback itself.
///
/// The query string sent back is produced by the injected closure, which
/// receives the attempt's `state` value.
pub struct CallbackBrowser {
    make_query: Box<dyn Fn(&str) -> String + Send + Sync>,
    pub opened_urls: std::sync::Mutex<Vec<String>>,
}

impl CallbackBrowser {
    pub fn new(make_query: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            make_query: Box::new(make_query),
            opened_urls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A browser that completes the flow with the given code and the
    /// correct state.
    pub fn approving_with_code(code: &str) -> Self {
        let code = code.to_string();
        Self::new(move |state| format!("code={code}&state={state}"))
    }

    /// A browser that reports the user denied the authorization.
    pub fn denying() -> Self {
        Self::new(|_state| {
            "error=access_denied&error_description=User+cancelled".to_string()
        })
    }

    /// A browser that answers with a forged state value.
    pub fn with_wrong_state(code: &str) -> Self {
        let code = code.to_string();
        Self::new(move |_state| format!("code={code}&state=forged-state-value"))
    }
}

impl BrowserOpener for CallbackBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened_urls
            .lock()
            .expect("opened_urls poisoned")
            .push(url.to_string());

        let parsed = url::Url::parse(url).expect("authorization URL must parse");
        let mut redirect_uri = None;
        let mut state = None;
        for (k, v) in parsed.query_pairs() {
            match k.as_ref() {
                "redirect_uri" => redirect_uri = Some(v.into_owned()),
                "state" => state = Some(v.into_owned()),
                _ => {}
            }
        }
        let redirect_uri = redirect_uri.expect("authorization URL must carry redirect_uri");
        let state = state.expect("authorization URL must carry state");

        let callback_url = format!("{redirect_uri}?{}", (self.make_query)(&state));
        tokio::spawn(async move {
            let _ = reqwest::get(&callback_url).await;
        });
        Ok(())
    }
}

/// Browser that records the authorization URL but never answers, leaving
/// the login to run into its timeout.
pub struct RecordingBrowser {
    pub opened_urls: std::sync::Mutex<Vec<String>>,
}

impl RecordingBrowser {
    pub fn new() -> Self {
        Self {
            opened_urls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The `redirect_uri` parameter of the most recent authorization URL.
    pub fn last_redirect_uri(&self) -> Option<String> {
        let urls = self.opened_urls.lock().expect("opened_urls poisoned");
        let parsed = url::Url::parse(urls.last()?).ok()?;
        parsed
            .query_pairs()
            .find(|(k, _)| k == "redirect_uri")
            .map(|(_, v)| v.into_owned())
    }
}

impl Default for RecordingBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserOpener for RecordingBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened_urls
            .lock()
            .expect("opened_urls poisoned")
            .push(url.to_string());
        Ok(())
    }
}
