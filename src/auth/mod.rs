//! OAuth2 authorization-code + PKCE authentication
//!
//! This module implements the browser-based login flow against the Spotify
//! accounts service and the in-process token lifecycle around it. One
//! login attempt is in flight at a time; tokens live only in process
//! memory.
//!
//! # Module Layout
//!
//! - [`pkce`]     -- per-attempt state/verifier/challenge generation
//! - [`callback`] -- transient loopback listener for the redirect
//! - [`exchange`] -- token endpoint client (code exchange, refresh)
//! - [`token`]    -- token model and the in-process cache
//! - [`session`]  -- the [`Authenticator`](session::Authenticator) facade
//!   coordinating all of the above

pub mod callback;
pub mod exchange;
pub mod pkce;
pub mod session;
pub mod token;
