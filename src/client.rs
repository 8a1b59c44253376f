use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::{Agent, AgentBuilder, Request};
use urlencoding::encode;

use crate::catalog::{Catalog, CatalogError};
use crate::config::Config;
use crate::models::{
    Artist, ArtistObject, CreatePlaylistRequest, CreatedPlaylist, FollowedArtistsResponse, Paging,
    PlaylistObject, PlaylistSummary, PlaylistTrackItem, SearchArtistsResponse, TopTracksResponse,
    Track, TrackUrisRequest, UserProfile,
};
use crate::playlist::utils::PlaylistNaming;

/// Spotify caps most list endpoints and playlist mutations at these sizes
const PAGE_SIZE: usize = 50;
const TRACK_CHUNK: usize = 100;
const PLAYLIST_SEARCH_LIMIT: usize = 200;

/// A blocking Spotify Web API client using a bearer access token
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a new client with configuration from environment
    pub fn new(config: &Config) -> Self {
        let agent = AgentBuilder::new().timeout(Duration::from_secs(20)).build();

        SpotifyClient {
            agent,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: Request) -> Request {
        request.set("Authorization", &format!("Bearer {}", self.access_token))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, CatalogError> {
        debug!("GET {url}");
        let mut request = self.authorized(self.agent.get(url));
        for (key, value) in query {
            request = request.query(key, value);
        }
        decode(request.call())
    }

    fn send_json<B: Serialize>(&self, method: &str, url: &str, body: &B) -> Result<ureq::Response, CatalogError> {
        debug!("{method} {url}");
        self.authorized(self.agent.request(method, url))
            .send_json(body)
            .map_err(map_error)
    }

    /// User playlists in listing order, up to `limit`
    pub fn user_playlists(&self, limit: usize) -> Result<Vec<PlaylistSummary>, CatalogError> {
        let mut playlists = Vec::new();
        let mut page: Paging<PlaylistObject> = self.get_json(
            &self.url("/me/playlists"),
            &[("limit", PAGE_SIZE.min(limit.max(1)).to_string())],
        )?;
        loop {
            for item in page.items {
                playlists.push(PlaylistSummary::from(item));
                if playlists.len() >= limit {
                    return Ok(playlists);
                }
            }
            match page.next {
                Some(next) => page = self.get_json(&next, &[])?,
                None => return Ok(playlists),
            }
        }
    }
}

fn map_error(error: ureq::Error) -> CatalogError {
    match error {
        ureq::Error::Status(code, response) => CatalogError::Status {
            code,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => CatalogError::Transport(transport.to_string()),
    }
}

fn decode<T: DeserializeOwned>(response: Result<ureq::Response, ureq::Error>) -> Result<T, CatalogError> {
    response
        .map_err(map_error)?
        .into_json::<T>()
        .map_err(|e| CatalogError::Decode(e.to_string()))
}

impl Catalog for SpotifyClient {
    fn search_artists(&self, query: &str, limit: usize) -> Result<Vec<Artist>, CatalogError> {
        let response: SearchArtistsResponse = self.get_json(
            &self.url("/search"),
            &[
                ("q", query.to_string()),
                ("type", "artist".to_string()),
                ("limit", limit.clamp(1, PAGE_SIZE).to_string()),
            ],
        )?;
        Ok(response
            .artists
            .items
            .into_iter()
            .map(Artist::from)
            .filter(|artist| !artist.id.is_empty())
            .collect())
    }

    fn get_artist(&self, artist_id: &str) -> Result<Artist, CatalogError> {
        let object: ArtistObject =
            self.get_json(&self.url(&format!("/artists/{}", encode(artist_id))), &[])?;
        let artist = Artist::from(object);
        if artist.id.is_empty() {
            return Err(CatalogError::NotFound(format!("artist {artist_id}")));
        }
        Ok(artist)
    }

    fn top_tracks_for_artist(&self, artist_id: &str, limit: usize) -> Result<Vec<Track>, CatalogError> {
        let response: TopTracksResponse = self.get_json(
            &self.url(&format!("/artists/{}/top-tracks", encode(artist_id))),
            &[("market", "from_token".to_string())],
        )?;
        Ok(response
            .tracks
            .into_iter()
            .take(limit)
            .map(Track::from)
            .collect())
    }

    fn current_user_id(&self) -> Result<Option<String>, CatalogError> {
        let profile: UserProfile = self.get_json(&self.url("/me"), &[])?;
        Ok(profile.id)
    }

    fn top_artists(&self, limit: usize) -> Result<Vec<Artist>, CatalogError> {
        let mut artists = Vec::new();
        let mut page: Paging<ArtistObject> = self.get_json(
            &self.url("/me/top/artists"),
            &[
                ("limit", PAGE_SIZE.min(limit.max(1)).to_string()),
                ("time_range", "medium_term".to_string()),
            ],
        )?;
        loop {
            artists.extend(page.items.into_iter().map(Artist::from));
            if artists.len() >= limit {
                artists.truncate(limit);
                return Ok(artists);
            }
            match page.next {
                Some(next) => page = self.get_json(&next, &[])?,
                None => return Ok(artists),
            }
        }
    }

    fn followed_artists(&self, limit: usize) -> Result<Vec<Artist>, CatalogError> {
        let mut artists = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut query = vec![
                ("type", "artist".to_string()),
                ("limit", PAGE_SIZE.min(limit.max(1)).to_string()),
            ];
            if let Some(cursor) = after.take() {
                query.push(("after", cursor));
            }
            let response: FollowedArtistsResponse = self.get_json(&self.url("/me/following"), &query)?;
            let page = response.artists;
            artists.extend(page.items.into_iter().map(Artist::from));
            if artists.len() >= limit {
                artists.truncate(limit);
                return Ok(artists);
            }
            after = page.cursors.and_then(|cursors| cursors.after);
            if page.next.is_none() || after.is_none() {
                return Ok(artists);
            }
        }
    }

    fn create_playlist(&self, user_id: &str, name: &str, description: &str) -> Result<String, CatalogError> {
        let url = self.url(&format!("/users/{}/playlists", encode(user_id)));
        let body = CreatePlaylistRequest {
            name,
            description,
            public: false,
        };
        let created: CreatedPlaylist = decode(Ok(self.send_json("POST", &url, &body)?))?;
        Ok(created.id)
    }

    fn get_playlist_track_ids(&self, playlist_id: &str) -> Result<Vec<String>, CatalogError> {
        let mut uris = Vec::new();
        let mut page: Paging<PlaylistTrackItem> = self.get_json(
            &self.url(&format!("/playlists/{}/tracks", encode(playlist_id))),
            &[("limit", TRACK_CHUNK.to_string()), ("offset", "0".to_string())],
        )?;
        loop {
            uris.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .filter_map(|track| track.uri)
                    .filter(|uri| !uri.is_empty()),
            );
            match page.next {
                Some(next) => page = self.get_json(&next, &[])?,
                None => return Ok(uris),
            }
        }
    }

    fn add_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError> {
        let url = self.url(&format!("/playlists/{}/tracks", encode(playlist_id)));
        for chunk in track_ids.chunks(TRACK_CHUNK) {
            self.send_json("POST", &url, &TrackUrisRequest { uris: chunk })?;
        }
        Ok(())
    }

    fn replace_tracks(&self, playlist_id: &str, track_ids: &[String]) -> Result<(), CatalogError> {
        let url = self.url(&format!("/playlists/{}/tracks", encode(playlist_id)));
        let (first, rest) = track_ids.split_at(track_ids.len().min(TRACK_CHUNK));
        self.send_json("PUT", &url, &TrackUrisRequest { uris: first })?;
        self.add_tracks(playlist_id, rest)
    }

    fn find_playlist_by_name(&self, name: &str, owner_id: &str) -> Result<Option<PlaylistSummary>, CatalogError> {
        Ok(self
            .user_playlists(PLAYLIST_SEARCH_LIMIT)?
            .into_iter()
            .find(|playlist| {
                playlist.owner_id == owner_id && PlaylistNaming::matches_playlist_name(&playlist.name, name)
            }))
    }

    fn track_uri(&self, track: &Track) -> String {
        format!("spotify:track:{}", track.id)
    }
}
