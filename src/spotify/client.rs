//! Spotify Web API client
//!
//! A thin bearer-authenticated GET wrapper over the Web API plus the
//! pagination loops for the listing endpoints the CLI uses. The client
//! never caches token material: every request asks the
//! [`Authenticator`](crate::auth::session::Authenticator) for a current
//! access token, so refreshes happen transparently between calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::session::Authenticator;
use crate::error::{Result, SpindexError};
use crate::spotify::types::{Paging, Playlist, PlaylistItem, SavedTrack, Track, User};

/// Page size for playlist and saved-track listings.
const LIBRARY_PAGE_SIZE: u64 = 50;

/// Page size for the tracks of a single playlist.
const PLAYLIST_TRACKS_PAGE_SIZE: u64 = 100;

// ---------------------------------------------------------------------------
// SpotifyClient
// ---------------------------------------------------------------------------

/// Client for the Spotify Web API.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use spindex::auth::session::{AuthParams, Authenticator};
/// use spindex::config::Config;
/// use spindex::spotify::client::SpotifyClient;
///
/// # async fn example() -> spindex::error::Result<()> {
/// let config = Config::default();
/// let http = Arc::new(reqwest::Client::new());
/// let auth = Arc::new(Authenticator::new(
///     AuthParams::from_config(&config),
///     Arc::clone(&http),
/// ));
/// let client = SpotifyClient::new(http, config.spotify.api_base.clone(), auth);
/// let user = client.current_user().await?;
/// println!("logged in as {}", user.id);
/// # Ok(())
/// # }
/// ```
pub struct SpotifyClient {
    http: Arc<reqwest::Client>,
    api_base: String,
    auth: Arc<Authenticator>,
}

impl SpotifyClient {
    /// Creates a client rooted at `api_base`.
    pub fn new(http: Arc<reqwest::Client>, api_base: String, auth: Arc<Authenticator>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// Fetches all playlists in the user's library.
    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        self.paged("/me/playlists", LIBRARY_PAGE_SIZE).await
    }

    /// Fetches all of the user's liked songs (saved tracks).
    pub async fn liked_songs(&self) -> Result<Vec<SavedTrack>> {
        self.paged("/me/tracks", LIBRARY_PAGE_SIZE).await
    }

    /// Fetches all tracks of the playlist with the given id.
    ///
    /// Entries whose track is no longer available are skipped.
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let items: Vec<PlaylistItem> = self
            .paged(
                &format!("/playlists/{playlist_id}/tracks"),
                PLAYLIST_TRACKS_PAGE_SIZE,
            )
            .await?;
        Ok(items.into_iter().filter_map(|item| item.track).collect())
    }

    /// Fetches the authenticated user's profile.
    pub async fn current_user(&self) -> Result<User> {
        self.get("/me", &[]).await
    }

    /// Finds a playlist by exact name in the user's library.
    ///
    /// # Errors
    ///
    /// Returns an error when no playlist carries that name.
    pub async fn playlist_by_name(&self, name: &str) -> Result<Playlist> {
        let playlists = self.playlists().await?;
        playlists
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| anyhow::anyhow!("playlist '{name}' not found"))
    }

    /// Returns the total number of playlists without fetching them all.
    pub async fn playlist_count(&self) -> Result<u64> {
        let page: Paging<Playlist> = self
            .get("/me/playlists", &[("limit", "1".to_string())])
            .await?;
        Ok(page.total)
    }

    /// Returns the total number of liked songs without fetching them all.
    pub async fn liked_count(&self) -> Result<u64> {
        let page: Paging<SavedTrack> = self
            .get("/me/tracks", &[("limit", "1".to_string())])
            .await?;
        Ok(page.total)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Walks a paginated endpoint until the last page.
    ///
    /// Stops when the server reports no `next` page or returns a short
    /// page, whichever comes first.
    async fn paged<T: DeserializeOwned>(&self, path: &str, page_size: u64) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let page: Paging<T> = self
                .get(
                    path,
                    &[
                        ("limit", page_size.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            let fetched = page.items.len() as u64;
            all.extend(page.items);

            if page.next.is_none() || fetched < page_size {
                break;
            }
            offset += page_size;
        }

        tracing::debug!("Fetched {} items from {path}", all.len());
        Ok(all)
    }

    /// Issues one authenticated GET and parses the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let access_token = self.auth.access_token().await?;
        let url = format!("{}{}", self.api_base, path);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(SpindexError::Http)?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpindexError::Api { status, body }.into());
        }

        let body = resp.text().await.map_err(SpindexError::Http)?;
        serde_json::from_str(&body).map_err(|e| SpindexError::Serialization(e).into())
    }
}
