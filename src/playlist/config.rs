use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Preferences for a single playlist build.
///
/// Counts use `0` to mean "unlimited", except `limit_per_artist` where `0`
/// means "take nothing".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistOptions {
    pub playlist_name: String,
    pub playlist_description: Option<String>,
    pub date_stamp: bool, // Append today's YYYY-MM-DD to the name
    pub limit_per_artist: usize,
    pub max_artists: usize,
    pub max_tracks: usize,
    pub dedupe_variants: bool, // Collapse remasters, live takes and similar variants
    pub print_tracks: bool,
    pub shuffle: bool,
    pub shuffle_seed: Option<u64>,
    pub reuse_existing: bool,
    pub target_playlist_id: Option<String>,
    pub truncate: bool, // Replace contents of a reused playlist instead of appending
    pub dry_run: bool,
    pub verbose: bool,
    pub manual_artist_queries: Vec<String>,
    pub artists_file: Option<PathBuf>,
    pub library_artists: bool,
    pub followed_artists: bool,
}

impl Default for PlaylistOptions {
    fn default() -> Self {
        Self {
            playlist_name: "Fav Artists Top Tracks".to_string(),
            playlist_description: None,
            date_stamp: false,
            limit_per_artist: 5,
            max_artists: 50,
            max_tracks: 250,
            dedupe_variants: false,
            print_tracks: false,
            shuffle: false,
            shuffle_seed: None,
            reuse_existing: false,
            target_playlist_id: None,
            truncate: false,
            dry_run: true,
            verbose: false,
            manual_artist_queries: Vec::new(),
            artists_file: None,
            library_artists: false,
            followed_artists: false,
        }
    }
}

impl PlaylistOptions {
    /// Seed defaults from environment configuration
    pub fn from_settings(config: &Config) -> Self {
        Self {
            playlist_name: config.default_playlist_name.clone(),
            limit_per_artist: config.default_limit_per_artist,
            max_artists: config.default_max_artists,
            max_tracks: config.default_max_tracks,
            verbose: config.default_verbose,
            ..Self::default()
        }
    }

    /// Overlay the keys present in a JSON options file onto `self`
    pub fn overlay_file(&self, path: &str) -> Result<PlaylistOptions, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let overrides: serde_json::Value = serde_json::from_str(&content)?;
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(format!("{path} must contain a JSON object").into());
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(fields) = &mut merged {
            fields.extend(overrides);
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Tracks to request per artist; over-fetches when variants will be filtered out
    pub fn fetch_limit(&self) -> usize {
        if self.dedupe_variants {
            self.limit_per_artist
                .saturating_add(5)
                .max(self.limit_per_artist.saturating_mul(2))
        } else {
            self.limit_per_artist
        }
    }

    /// How many artists to request from library and followed sources
    pub fn source_artist_limit(&self) -> usize {
        self.max_artists.max(20)
    }
}
