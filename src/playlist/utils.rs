use std::path::Path;

use chrono::NaiveDate;

use super::normalize::case_fold;
use crate::error::PlaylistError;
use crate::models::Artist;

const DATE_STAMP_FORMAT: &str = "%Y-%m-%d";

/// Playlist naming utilities
pub struct PlaylistNaming;

impl PlaylistNaming {
    /// Effective playlist name, optionally suffixed with `today` as YYYY-MM-DD
    pub fn playlist_name(base_name: &str, date_stamp: bool, today: NaiveDate) -> String {
        let base_name = match base_name.trim() {
            "" => "Untitled Playlist",
            trimmed => trimmed,
        };
        if date_stamp {
            format!("{} {}", base_name, today.format(DATE_STAMP_FORMAT))
        } else {
            base_name.to_string()
        }
    }

    /// Whether an existing playlist called `candidate` should be reused for `target`.
    ///
    /// Matches the exact name (case-insensitive), or the target's base name
    /// followed by any valid date stamp.
    pub fn matches_playlist_name(candidate: &str, target: &str) -> bool {
        let candidate = case_fold(candidate.trim());
        let target = case_fold(target.trim());
        if candidate == target {
            return true;
        }
        let base = Self::strip_date_stamp(&target);
        match candidate.strip_prefix(base) {
            Some(rest) => rest
                .strip_prefix(' ')
                .is_some_and(|stamp| NaiveDate::parse_from_str(stamp, DATE_STAMP_FORMAT).is_ok()),
            None => false,
        }
    }

    fn strip_date_stamp(name: &str) -> &str {
        match name.rsplit_once(' ') {
            Some((base, stamp)) if NaiveDate::parse_from_str(stamp, DATE_STAMP_FORMAT).is_ok() => base,
            _ => name,
        }
    }

    /// Description used when creating a playlist without an explicit one
    pub fn generate_description(artists: &[Artist], today: NaiveDate) -> String {
        let names: Vec<&str> = artists.iter().take(10).map(|a| a.name.as_str()).collect();
        let summary = if names.is_empty() {
            "Auto-generated playlist".to_string()
        } else {
            names.join(", ")
        };
        format!(
            "Generated on {} | Artists: {}",
            today.format(DATE_STAMP_FORMAT),
            summary
        )
    }
}

/// Keep at most `max_tracks` identifiers in order; `0` keeps everything
pub fn trim_tracks<I>(track_ids: I, max_tracks: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let track_ids = track_ids.into_iter();
    if max_tracks == 0 {
        track_ids.collect()
    } else {
        track_ids.take(max_tracks).collect()
    }
}

/// Artist queries from a text file: one per line, blank and `#` lines ignored
pub fn load_artist_queries(path: &Path) -> Result<Vec<String>, PlaylistError> {
    let content = std::fs::read_to_string(path).map_err(|source| PlaylistError::ArtistFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_artist_queries(&content))
}

pub fn parse_artist_queries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
