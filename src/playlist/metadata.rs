/// Summary metrics for a playlist build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistStats {
    pub playlist_name: String,
    pub artists_retrieved: usize,
    pub tracks_retrieved: usize, // Top tracks returned before any filtering
    pub variants_deduped: usize, // Repeats and near-duplicates skipped
    pub tracks_prepared: usize,
    pub tracks_uploaded: usize,
}

impl PlaylistStats {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Playlist name: {}", self.playlist_name),
            format!("Artists retrieved: {}", self.artists_retrieved),
            format!("Top songs retrieved: {}", self.tracks_retrieved),
            format!("Variants deduped: {}", self.variants_deduped),
            format!("Tracks prepared: {}", self.tracks_prepared),
            format!("Total tracks added to the list: {}", self.tracks_uploaded),
        ]
    }
}

/// Outcome of a playlist build
#[derive(Debug, Clone)]
pub struct PlaylistResult {
    /// Empty on a dry run with no reusable playlist
    pub playlist_id: String,
    pub playlist_name: String,
    pub prepared_track_uris: Vec<String>,
    pub added_track_uris: Vec<String>,
    pub display_tracks: Vec<String>,
    pub dry_run: bool,
    pub reused_existing: bool,
    pub stats: PlaylistStats,
}
