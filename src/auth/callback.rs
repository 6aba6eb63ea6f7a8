//! Transient loopback listener for the authorization redirect
//!
//! One [`CallbackListener`] exists per interactive login attempt. It binds
//! the loopback redirect address, waits for the browser to be redirected
//! back from the authorization server, validates the query parameters, and
//! hands a single [`CallbackResult`] to the waiting login call over a
//! per-attempt oneshot channel.
//!
//! The listener never outlives its attempt: the login call shuts it down on
//! success, failure, and timeout alike, with a bounded grace period for an
//! in-flight response before the serve task is aborted.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::error::{Result, SpindexError};

/// How long shutdown waits for an in-flight response before aborting the
/// serve task.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// CallbackResult
// ---------------------------------------------------------------------------

/// Terminal outcome of one redirect callback.
///
/// Produced at most once per login attempt and delivered to exactly one
/// waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    /// The server redirected back with an authorization code.
    Code(String),

    /// The server reported an error (e.g. `access_denied`).
    Denied {
        /// The `error` query parameter
        error: String,
        /// The `error_description` query parameter, possibly empty
        description: String,
    },

    /// The `state` parameter did not match this attempt's nonce.
    StateMismatch,

    /// The callback carried neither an error nor a code.
    MissingCode,
}

// ---------------------------------------------------------------------------
// Listener internals
// ---------------------------------------------------------------------------

/// State shared with the axum handler.
///
/// The sender sits in an `Option` so the first terminal callback takes it;
/// later requests find the slot empty and get a neutral page.
struct ListenerShared {
    expected_state: String,
    result_tx: Mutex<Option<oneshot::Sender<CallbackResult>>>,
}

// ---------------------------------------------------------------------------
// CallbackListener
// ---------------------------------------------------------------------------

/// A loopback HTTP listener bound for the duration of one login attempt.
///
/// Created by [`bind`](Self::bind), which also returns the receiving half
/// of the per-attempt result channel. The accept loop runs on its own tokio
/// task; the caller races the receiver against its login timeout and then
/// calls [`shutdown`](Self::shutdown) regardless of the outcome.
pub struct CallbackListener {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl CallbackListener {
    /// Binds `127.0.0.1:<port>` and starts serving redirect callbacks.
    ///
    /// Port `0` asks the OS for a free port; use [`addr`](Self::addr) or
    /// [`redirect_uri`](Self::redirect_uri) for the address that was
    /// actually bound. The route is path-agnostic: the authorization server
    /// may redirect to any path on this host.
    ///
    /// # Errors
    ///
    /// Returns [`SpindexError::Listener`] when the address cannot be bound
    /// (typically because another process owns the port).
    pub async fn bind(
        port: u16,
        expected_state: String,
    ) -> Result<(Self, oneshot::Receiver<CallbackResult>)> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| SpindexError::Listener(format!("failed to bind 127.0.0.1:{port}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| SpindexError::Listener(format!("failed to read local address: {e}")))?;

        let (result_tx, result_rx) = oneshot::channel();
        let shared = Arc::new(ListenerShared {
            expected_state,
            result_tx: Mutex::new(Some(result_tx)),
        });

        let app = Router::new().fallback(handle_redirect).with_state(shared);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::debug!("Callback listener exited with error: {e}");
            }
        });

        tracing::debug!("Callback listener bound on {addr}");
        Ok((
            Self {
                addr,
                shutdown_tx,
                task,
            },
            result_rx,
        ))
    }

    /// The address the listener is actually bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The redirect URI to register with the authorization request.
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/", self.addr.port())
    }

    /// Stops the listener.
    ///
    /// Signals graceful shutdown, waits up to [`SHUTDOWN_GRACE`] for the
    /// serve task to finish its in-flight response, then aborts it. Safe to
    /// call after the attempt has resolved either way; a shutdown signal
    /// arriving after the task already exited is ignored.
    pub async fn shutdown(self) {
        let Self {
            shutdown_tx,
            mut task,
            addr,
        } = self;

        let _ = shutdown_tx.send(());
        if tokio::time::timeout(SHUTDOWN_GRACE, &mut task).await.is_err() {
            tracing::warn!("Callback listener on {addr} did not stop in time, aborting");
            task.abort();
        }
        tracing::debug!("Callback listener on {addr} stopped");
    }
}

// ---------------------------------------------------------------------------
// Redirect handler
// ---------------------------------------------------------------------------

/// Handles one inbound redirect request.
///
/// Validation order: server-reported `error` first, then the `state` nonce
/// (checked before the code is touched), then presence of `code`.
async fn handle_redirect(
    State(shared): State<Arc<ListenerShared>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let Some(tx) = shared.result_tx.lock().await.take() else {
        // The attempt already resolved; nothing left to deliver.
        return (
            StatusCode::OK,
            render_page("Login already completed", "You can close this window."),
        );
    };

    if let Some(error) = params.get("error") {
        let description = params
            .get("error_description")
            .cloned()
            .unwrap_or_default();
        let _ = tx.send(CallbackResult::Denied {
            error: error.clone(),
            description: description.clone(),
        });
        return (
            StatusCode::FORBIDDEN,
            render_page(
                "Authentication failed",
                &format!("The authorization server reported: {error} {description}"),
            ),
        );
    }

    match params.get("state") {
        Some(state) if *state == shared.expected_state => {}
        _ => {
            let _ = tx.send(CallbackResult::StateMismatch);
            return (
                StatusCode::FORBIDDEN,
                render_page("Authentication failed", "Invalid state parameter."),
            );
        }
    }

    match params.get("code") {
        Some(code) => {
            let _ = tx.send(CallbackResult::Code(code.clone()));
            (
                StatusCode::OK,
                render_page(
                    "Authentication successful",
                    "You can now close this window and return to your terminal.",
                ),
            )
        }
        None => {
            let _ = tx.send(CallbackResult::MissingCode);
            (
                StatusCode::BAD_REQUEST,
                render_page("Authentication failed", "No authorization code received."),
            )
        }
    }
}

/// Renders the minimal page shown in the user's browser.
fn render_page(title: &str, message: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><title>Spindex - {title}</title>\n\
         <style>\n\
           body {{ font-family: sans-serif; display: flex; justify-content: center;\n\
                  align-items: center; height: 100vh; margin: 0; background: #191414; }}\n\
           .card {{ background: white; padding: 3rem; border-radius: 12px; text-align: center; }}\n\
           h1 {{ color: #1db954; }}\n\
           p {{ color: #666; }}\n\
         </style></head>\n\
         <body><div class=\"card\"><h1>{title}</h1><p>{message}</p></div></body>\n\
         </html>\n"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
