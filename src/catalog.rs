use thiserror::Error;

use crate::models::{Artist, PlaylistSummary, Track};

/// Failure surfaced by a catalog backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("catalog returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Failures that will repeat for every later request, such as a rejected token
    pub fn is_fatal(&self) -> bool {
        matches!(self, CatalogError::Status { code: 401 | 403, .. })
    }
}

/// Everything the playlist engine needs from a music service.
///
/// Implementations are blocking and perform a single attempt per call;
/// retry and timeout policy belong to the implementation, not the engine.
/// Playlist contents are exchanged as service-native track identifiers,
/// in the same form `track_uri` produces.
#[cfg_attr(test, mockall::automock)]
pub trait Catalog {
    fn search_artists(&self, query: &str, limit: usize) -> Result<Vec<Artist>, CatalogError>;

    fn get_artist(&self, artist_id: &str) -> Result<Artist, CatalogError>;

    fn top_tracks_for_artist(
        &self,
        artist_id: &str,
        limit: usize,
    ) -> Result<Vec<Track>, CatalogError>;

    /// Identity of the acting user; `None` when the profile carries no id
    fn current_user_id(&self) -> Result<Option<String>, CatalogError>;

    fn top_artists(&self, limit: usize) -> Result<Vec<Artist>, CatalogError>;

    fn followed_artists(&self, limit: usize) -> Result<Vec<Artist>, CatalogError>;

    /// Create an empty playlist and return its id
    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<String, CatalogError>;

    fn get_playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>, CatalogError>;

    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError>;

    /// Replace the whole playlist contents with `track_ids`
    fn replace_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError>;

    fn find_playlist_by_name(
        &self,
        name: &str,
        owner_id: &str,
    ) -> Result<Option<PlaylistSummary>, CatalogError>;

    /// Service-native identifier used when uploading `track`
    fn track_uri(&self, track: &Track) -> String;
}
