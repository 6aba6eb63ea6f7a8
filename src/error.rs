//! Error types for Spindex
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Spindex operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, the PKCE login flow, token exchange and refresh,
/// and Spotify Web API calls.
#[derive(Error, Debug)]
pub enum SpindexError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No callback arrived before the login deadline
    #[error("Authentication timed out after {0} seconds")]
    AuthTimeout(u64),

    /// The authorization server or the callback itself rejected the attempt
    /// (server-reported error, state mismatch, or missing code)
    #[error("Authorization denied: {0}")]
    AuthDenied(String),

    /// The callback listener could not be started or stopped
    #[error("Callback listener error: {0}")]
    Listener(String),

    /// The token endpoint rejected the authorization-code exchange
    #[error("Token exchange failed (status {status}): {body}")]
    TokenExchange {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// The token endpoint rejected the refresh-token grant
    #[error("Token refresh failed (status {status}): {body}")]
    TokenRefresh {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// The Spotify Web API returned a non-success status
    #[error("API request failed (status {status}): {body}")]
    Api {
        /// HTTP status returned by the API
        status: u16,
        /// Response body as returned by the server
        body: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Spindex operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
