use serde::{Deserialize, Serialize};

/// An artist as known to the catalog. `id` is the only identity used for dedup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

/// A catalog track with its credited artists in billing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
}

impl Track {
    /// First credited artist, or an empty string for uncredited tracks
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }

    /// Human-readable "Artist A, Artist B – Title" line
    pub fn display_line(&self) -> String {
        if self.artists.is_empty() {
            self.title.clone()
        } else {
            format!("{} – {}", self.artists.join(", "), self.title)
        }
    }
}

/// Lightweight view of a playlist owned by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub track_count: u32,
}

// Spotify Web API wire types

#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl From<ArtistObject> for Artist {
    fn from(object: ArtistObject) -> Self {
        Artist {
            id: object.id.unwrap_or_default(),
            name: object.name,
        }
    }
}

/// Offset-paged container used by most list endpoints
#[derive(Debug, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Response structure for the artist search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Paging<ArtistObject>,
}

/// Response structure for `/me/following?type=artist`
#[derive(Debug, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: CursorPaging<ArtistObject>,
}

#[derive(Debug, Deserialize)]
pub struct CursorPaging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
}

#[derive(Debug, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
}

impl From<TrackObject> for Track {
    fn from(object: TrackObject) -> Self {
        Track {
            id: object.id.unwrap_or_default(),
            title: object.name,
            artists: object.artists.into_iter().map(|artist| artist.name).collect(),
        }
    }
}

/// One row of `/playlists/{id}/tracks`; `track` is null for removed or local items
#[derive(Debug, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub owner: Option<PlaylistOwner>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u32,
}

impl From<PlaylistObject> for PlaylistSummary {
    fn from(object: PlaylistObject) -> Self {
        PlaylistSummary {
            id: object.id,
            name: object.name,
            owner_id: object.owner.map(|owner| owner.id).unwrap_or_default(),
            track_count: object.tracks.map(|tracks| tracks.total).unwrap_or(0),
        }
    }
}

/// Request body for playlist creation
#[derive(Debug, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub public: bool,
}

/// Response structure for playlist creation
#[derive(Debug, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
}

/// Request body for adding or replacing playlist items
#[derive(Debug, Serialize)]
pub struct TrackUrisRequest<'a> {
    pub uris: &'a [String],
}
