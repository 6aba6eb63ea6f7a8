//! PKCE S256 parameter generation
//!
//! This module implements the Proof Key for Code Exchange (PKCE) extension
//! to OAuth 2.0 as defined in RFC 7636, using the `S256` challenge method.
//!
//! # How PKCE works
//!
//! 1. The client generates a high-entropy random string called the
//!    `code_verifier`.
//! 2. The client computes a SHA-256 hash of the verifier and base64url-encodes
//!    it to produce the `code_challenge`.
//! 3. The authorization request includes `code_challenge` and
//!    `code_challenge_method=S256`.
//! 4. The token exchange request includes the original `code_verifier`.
//! 5. The authorization server recomputes the challenge and compares it to
//!    the value sent in step 3, proving possession of the verifier.
//!
//! A random `state` nonce is generated alongside the PKCE pair; it rides the
//! redirect round-trip and ties the callback to this attempt (CSRF defense).
//!
//! # References
//!
//! - RFC 7636 <https://www.rfc-editor.org/rfc/rfc7636>

use base64::Engine as _;
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// PkceAttempt
// ---------------------------------------------------------------------------

/// The one-time parameter triple of a single login attempt.
///
/// Created by [`generate`] at the start of an interactive login and consumed
/// exactly once by the token exchange; a new attempt discards the previous
/// one. The verifier never leaves the process except in the final token
/// exchange request.
///
/// # Examples
///
/// ```
/// use spindex::auth::pkce::generate;
///
/// let attempt = generate();
/// assert_eq!(attempt.verifier.len(), 43);
/// assert_ne!(attempt.verifier, attempt.challenge);
/// ```
#[derive(Debug, Clone)]
pub struct PkceAttempt {
    /// Random nonce echoed back by the authorization server in the redirect.
    ///
    /// 16 random bytes as base64url without padding (22 characters).
    pub state: String,

    /// The code verifier: 32 random bytes as base64url without padding
    /// (43 characters). Sent only in the `code_verifier` parameter of the
    /// token exchange.
    pub verifier: String,

    /// The code challenge: base64url-encoded (no padding) SHA-256 digest of
    /// the UTF-8 representation of [`Self::verifier`]. Sent in the
    /// `code_challenge` parameter of the authorization request.
    pub challenge: String,
}

// ---------------------------------------------------------------------------
// Public functions
// ---------------------------------------------------------------------------

/// Generates a fresh PKCE attempt.
///
/// `state` and `verifier` are drawn independently from the operating
/// system's CSPRNG. The challenge is the base64url-encoded SHA-256 digest of
/// the verifier string's UTF-8 bytes, as specified in RFC 7636 section 4.2.
///
/// Randomness failure is not a recoverable condition; `rand::rng()` panics
/// rather than producing weak output, which aborts the login attempt with a
/// clear cause.
///
/// # Examples
///
/// ```
/// use spindex::auth::pkce::generate;
///
/// let a = generate();
/// let b = generate();
/// assert_ne!(a.state, b.state);
/// assert_ne!(a.verifier, b.verifier);
/// ```
pub fn generate() -> PkceAttempt {
    let state = random_urlsafe(16);
    let verifier = random_urlsafe(32);
    let challenge = challenge_for(&verifier);

    PkceAttempt {
        state,
        verifier,
        challenge,
    }
}

/// Computes the S256 challenge for a verifier string.
///
/// Deterministic: the same verifier always yields the same challenge
/// (RFC 7636 section 4.2:
/// `BASE64URL(SHA256(ASCII(code_verifier)))`).
pub fn challenge_for(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest.as_slice())
}

/// Returns `len` cryptographically random bytes as base64url without padding.
fn random_urlsafe(len: usize) -> String {
    use rand::RngCore as _;

    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
