//! End-to-end login flow tests
//!
//! Drives `Authenticator::login` through the complete interactive flow
//! with the browser stubbed: the stub parses the authorization URL and
//! issues the redirect callback itself, while wiremock plays the token
//! endpoint. Covers the success path, denial, state forgery, and the
//! timeout with listener teardown.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spindex::auth::exchange::HttpTokenExchanger;
use spindex::auth::session::{Authenticator, BrowserOpener};
use spindex::auth::token::{MemoryTokenCache, TokenCache};
use spindex::SpindexError;

mod common;
use common::{test_params, CallbackBrowser, RecordingBrowser};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mounts a token endpoint that accepts any authorization_code exchange.
async fn mount_token_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "e2e_access_token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "e2e_refresh_token",
            "scope": "playlist-read-private user-library-read"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn make_authenticator(
    token_url: &str,
    browser: Arc<dyn BrowserOpener>,
    cache: Arc<dyn TokenCache>,
) -> Authenticator {
    let params = test_params(token_url);
    let http = Arc::new(reqwest::Client::new());
    let exchanger = HttpTokenExchanger::new(
        http,
        params.client_id.clone(),
        params.token_url.clone(),
    );
    Authenticator::with_parts(params, cache, Arc::new(exchanger), browser)
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

/// Full round trip: browser stub approves with a code and the matching
/// state; login must return the token pair minted by the mock endpoint.
#[tokio::test]
async fn test_full_login_returns_token_pair_from_token_endpoint() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 1).await;

    let cache = Arc::new(MemoryTokenCache::new());
    let auth = make_authenticator(
        &format!("{}/api/token", server.uri()),
        Arc::new(CallbackBrowser::approving_with_code("e2e_auth_code")),
        Arc::clone(&cache) as Arc<dyn TokenCache>,
    );

    let creds = auth.login().await.expect("E2E login must succeed");
    assert_eq!(creds.access_token, "e2e_access_token");
    assert_eq!(creds.refresh_token, "e2e_refresh_token");

    // The token is now cached for subsequent calls.
    let cached = cache.get().expect("cache must hold the new token");
    assert_eq!(cached.access_token, "e2e_access_token");
    assert!(cached.is_fresh());

    server.verify().await;
}

/// The code the browser delivered must be the one sent to the token
/// endpoint, along with a verifier.
#[tokio::test]
async fn test_full_login_forwards_code_and_verifier_to_token_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=specific_code_42"))
        .and(body_string_contains("code_verifier="))
        .and(body_string_contains("redirect_uri="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "a",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "r"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = make_authenticator(
        &format!("{}/api/token", server.uri()),
        Arc::new(CallbackBrowser::approving_with_code("specific_code_42")),
        Arc::new(MemoryTokenCache::new()),
    );

    auth.login().await.expect("login must succeed");
    server.verify().await;
}

// ---------------------------------------------------------------------------
// Denial
// ---------------------------------------------------------------------------

/// `error=access_denied` in the callback must fail the login with a message
/// containing "access_denied" and must never reach the token endpoint.
#[tokio::test]
async fn test_denied_callback_fails_login_without_token_exchange() {
    let server = MockServer::start().await;
    // Zero calls allowed: denial must short-circuit before the exchange.
    mount_token_endpoint(&server, 0).await;

    let auth = make_authenticator(
        &format!("{}/api/token", server.uri()),
        Arc::new(CallbackBrowser::denying()),
        Arc::new(MemoryTokenCache::new()),
    );

    let err = auth.login().await.expect_err("denied login must fail");
    let msg = err.to_string();
    assert!(
        msg.contains("access_denied"),
        "error must carry the server-reported reason: {msg}"
    );
    match err.downcast_ref::<SpindexError>() {
        Some(SpindexError::AuthDenied(_)) => {}
        other => panic!("expected AuthDenied, got: {other:?}"),
    }

    server.verify().await;
}

/// A forged state value must be rejected and must never reach the token
/// exchange step.
#[tokio::test]
async fn test_state_mismatch_fails_login_without_token_exchange() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    let auth = make_authenticator(
        &format!("{}/api/token", server.uri()),
        Arc::new(CallbackBrowser::with_wrong_state("stolen_code")),
        Arc::new(MemoryTokenCache::new()),
    );

    let err = auth.login().await.expect_err("forged state must fail");
    let msg = err.to_string();
    assert!(msg.contains("state mismatch"), "unexpected error: {msg}");

    server.verify().await;
}

// ---------------------------------------------------------------------------
// Timeout
// ---------------------------------------------------------------------------

/// With no callback arriving, login must fail with the timeout error and
/// the listener must already be stopped when the call returns.
#[tokio::test]
async fn test_timeout_returns_error_and_stops_listener() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    let browser = Arc::new(RecordingBrowser::new());
    let mut params = test_params(&format!("{}/api/token", server.uri()));
    params.login_timeout = Duration::from_millis(300);

    let http = Arc::new(reqwest::Client::new());
    let exchanger = HttpTokenExchanger::new(
        http,
        params.client_id.clone(),
        params.token_url.clone(),
    );
    let auth = Authenticator::with_parts(
        params,
        Arc::new(MemoryTokenCache::new()),
        Arc::new(exchanger),
        Arc::clone(&browser) as Arc<dyn BrowserOpener>,
    );

    let err = auth.login().await.expect_err("login must time out");
    match err.downcast_ref::<SpindexError>() {
        Some(SpindexError::AuthTimeout(_)) => {}
        other => panic!("expected AuthTimeout, got: {other:?}"),
    }

    // The listener was bound (the browser saw a redirect_uri) and must be
    // gone now: a late callback cannot connect.
    let redirect_uri = browser
        .last_redirect_uri()
        .expect("authorization URL must have been opened");
    let late_callback = reqwest::Client::new()
        .get(format!("{redirect_uri}?code=late&state=whatever"))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(
        late_callback.is_err(),
        "the listener must not accept requests after the timeout"
    );

    server.verify().await;
}

/// Each interactive attempt generates a fresh state value.
#[tokio::test]
async fn test_each_attempt_uses_a_fresh_state() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 0).await;

    let browser = Arc::new(RecordingBrowser::new());
    let mut params = test_params(&format!("{}/api/token", server.uri()));
    params.login_timeout = Duration::from_millis(200);

    let http = Arc::new(reqwest::Client::new());
    let exchanger = HttpTokenExchanger::new(
        http,
        params.client_id.clone(),
        params.token_url.clone(),
    );
    let auth = Authenticator::with_parts(
        params,
        Arc::new(MemoryTokenCache::new()),
        Arc::new(exchanger),
        Arc::clone(&browser) as Arc<dyn BrowserOpener>,
    );

    // Two attempts, both timing out.
    let _ = auth.login().await;
    let _ = auth.login().await;

    let urls = browser.opened_urls.lock().expect("urls");
    assert_eq!(urls.len(), 2);

    let state_of = |u: &str| {
        url::Url::parse(u)
            .expect("url")
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .expect("state param")
    };
    assert_ne!(
        state_of(&urls[0]),
        state_of(&urls[1]),
        "a new attempt must discard the previous state"
    );
}
