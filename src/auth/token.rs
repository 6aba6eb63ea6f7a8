//! Token model and in-process token cache
//!
//! The [`Token`] produced by the token endpoint lives in a single-slot,
//! process-local cache. Nothing is ever written to disk; restarting the
//! process always starts unauthenticated.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Tokens expiring within this margin are treated as stale.
///
/// The margin absorbs clock skew and in-flight request latency so an access
/// token does not expire mid-use.
pub const FRESHNESS_MARGIN_SECS: i64 = 5 * 60;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A complete token-endpoint response, normalized for caching.
///
/// `expires_at` is always an absolute UTC timestamp computed when the
/// response was parsed (`now + expires_in`), never a relative duration.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use spindex::auth::token::Token;
///
/// let token = Token {
///     access_token: "acc".to_string(),
///     token_type: "Bearer".to_string(),
///     refresh_token: "ref".to_string(),
///     expires_at: Utc::now() + Duration::hours(1),
/// };
/// assert!(token.is_fresh());
/// ```
#[derive(Debug, Clone)]
pub struct Token {
    /// Bearer credential for Web API calls
    pub access_token: String,

    /// The token type, typically `"Bearer"`
    pub token_type: String,

    /// Long-lived credential used to obtain a new access token silently
    pub refresh_token: String,

    /// UTC instant at which the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Returns `true` while the access token is usable.
    ///
    /// A token counts as fresh only when its expiry is more than
    /// [`FRESHNESS_MARGIN_SECS`] in the future.
    pub fn is_fresh(&self) -> bool {
        self.expires_at > Utc::now() + Duration::seconds(FRESHNESS_MARGIN_SECS)
    }

    /// Immutable snapshot of the two credential strings.
    ///
    /// This is the only shape in which token material leaves the auth
    /// subsystem.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// The access/refresh pair returned to callers of
/// [`Authenticator::login`](crate::auth::session::Authenticator::login).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer credential for Web API calls
    pub access_token: String,
    /// Long-lived refresh credential
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// TokenCache
// ---------------------------------------------------------------------------

/// Injectable single-slot token store.
///
/// The lifecycle manager owns one instance and is its only writer. The
/// trait exists so tests (and embedders that want several independent
/// sessions) can supply their own store instead of a process-global.
pub trait TokenCache: Send + Sync {
    /// Returns a clone of the cached token, if any.
    fn get(&self) -> Option<Token>;

    /// Replaces the cached token. Replacement is atomic from the point of
    /// view of concurrent `get` calls.
    fn put(&self, token: Token);
}

/// The default in-memory cache: a mutex around a single optional slot.
#[derive(Default)]
pub struct MemoryTokenCache {
    slot: Mutex<Option<Token>>,
}

impl MemoryTokenCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenCache for MemoryTokenCache {
    fn get(&self) -> Option<Token> {
        self.slot.lock().expect("token cache poisoned").clone()
    }

    fn put(&self, token: Token) {
        *self.slot.lock().expect("token cache poisoned") = Some(token);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
