//! Spotify Web API access
//!
//! # Module Layout
//!
//! - [`client`] -- bearer-authenticated GET wrapper with pagination
//! - [`types`]  -- serde models for the API responses

pub mod client;
pub mod types;
