//! Serde models for the Spotify Web API responses
//!
//! Only the fields the CLI actually renders are modeled; unknown fields are
//! ignored. Fields the API documents as nullable are `Option`s so a single
//! odd item cannot fail a whole page.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Pagination envelope
// ---------------------------------------------------------------------------

/// One page of a paginated listing endpoint.
///
/// `next` is a URL when more pages exist and `null` on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,

    /// URL of the next page, absent on the last one
    #[serde(default)]
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Playlists
// ---------------------------------------------------------------------------

/// A playlist in the user's library.
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    /// Spotify playlist id
    pub id: String,

    /// Display name
    pub name: String,

    /// Track count container
    #[serde(default)]
    pub tracks: TrackCount,

    /// Playlist owner
    #[serde(default)]
    pub owner: PlaylistOwner,

    /// Public visibility; the API reports `null` for some playlists
    #[serde(default)]
    pub public: Option<bool>,

    /// Whether the playlist is collaborative
    #[serde(default)]
    pub collaborative: bool,
}

/// The `tracks` object embedded in a playlist listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackCount {
    /// Number of tracks in the playlist
    #[serde(default)]
    pub total: u64,
}

/// The `owner` object embedded in a playlist listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistOwner {
    /// Owner display name; `null` for some accounts
    #[serde(default)]
    pub display_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// A single track.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Spotify track id; `null` for local files
    #[serde(default)]
    pub id: Option<String>,

    /// Track title
    pub name: String,

    /// Performing artists
    #[serde(default)]
    pub artists: Vec<Artist>,

    /// Containing album
    #[serde(default)]
    pub album: Album,

    /// Duration in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
}

impl Track {
    /// Comma-joined artist names for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An artist reference on a track.
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    /// Artist name
    pub name: String,
}

/// An album reference on a track.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Album {
    /// Album name
    #[serde(default)]
    pub name: String,
}

/// A saved ("liked") track with its save timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    /// When the user saved the track (RFC 3339)
    #[serde(default)]
    pub added_at: String,

    /// The track itself
    pub track: Track,
}

/// One entry of a playlist's track listing.
///
/// The API wraps each track in an item object; `track` is `null` for
/// entries that are no longer available.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    /// The wrapped track, absent for removed entries
    #[serde(default)]
    pub track: Option<Track>,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The authenticated user's profile.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Spotify user id
    pub id: String,

    /// Display name; `null` when unset
    #[serde(default)]
    pub display_name: Option<String>,

    /// Email address; requires the matching scope
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
