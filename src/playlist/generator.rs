use std::collections::HashSet;

use chrono::{Local, NaiveDate};
use log::{info, warn};

use super::collector::TrackCollector;
use super::resolver::ArtistResolver;
use super::shuffle::{fair_shuffle, shuffle_ids};
use super::utils::{PlaylistNaming, load_artist_queries, trim_tracks};
use super::{PlaylistOptions, PlaylistResult, PlaylistStats};
use crate::catalog::Catalog;
use crate::error::PlaylistError;
use crate::models::{Artist, PlaylistSummary};

/// Assembles a playlist from artist sources and uploads it through a [`Catalog`].
///
/// A build is a single attempt: per-artist lookups may fail without
/// aborting, everything else surfaces as a [`PlaylistError`]. Builds that
/// target the same playlist must not run concurrently.
pub struct PlaylistGenerator<C: Catalog> {
    catalog: C,
}

impl<C: Catalog> PlaylistGenerator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn build(&self, options: &PlaylistOptions) -> Result<PlaylistResult, PlaylistError> {
        self.build_on(options, Local::now().date_naive())
    }

    /// Same as [`build`](Self::build) with an explicit date for name stamps
    pub fn build_on(
        &self,
        options: &PlaylistOptions,
        today: NaiveDate,
    ) -> Result<PlaylistResult, PlaylistError> {
        let playlist_name =
            PlaylistNaming::playlist_name(&options.playlist_name, options.date_stamp, today);

        let user_id = self
            .catalog
            .current_user_id()?
            .filter(|id| !id.trim().is_empty())
            .ok_or(PlaylistError::MissingUserIdentity)?;

        let artists = self.collect_artists(options)?;
        if artists.is_empty() {
            return Err(PlaylistError::NoArtistsResolved);
        }
        info!("Resolved {} artists", artists.len());

        let collected = TrackCollector::new(&self.catalog).collect(&artists, options)?;
        if collected.selected.is_empty() && !options.truncate {
            return Err(PlaylistError::NoTracksGenerated);
        }

        let mut tracks = collected.selected;
        if options.shuffle {
            tracks = fair_shuffle(tracks, options.shuffle_seed);
        }

        let prepared_uris = trim_tracks(
            tracks.iter().map(|track| self.catalog.track_uri(track)),
            options.max_tracks,
        );
        tracks.truncate(prepared_uris.len());
        let display_tracks: Vec<String> = tracks.iter().map(|track| track.display_line()).collect();

        let existing = if options.reuse_existing {
            self.find_existing_playlist(options, &playlist_name, &user_id)?
        } else {
            None
        };

        let mut stats = PlaylistStats {
            playlist_name: playlist_name.clone(),
            artists_retrieved: artists.len(),
            tracks_retrieved: collected.total_retrieved,
            variants_deduped: collected.skipped.len(),
            tracks_prepared: prepared_uris.len(),
            tracks_uploaded: 0,
        };

        if options.dry_run {
            log_stats(&stats);
            return Ok(PlaylistResult {
                playlist_id: existing.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
                playlist_name,
                prepared_track_uris: prepared_uris,
                added_track_uris: Vec::new(),
                display_tracks,
                dry_run: true,
                reused_existing: existing.is_some(),
                stats,
            });
        }

        let reused_existing = existing.is_some();
        let (playlist_id, added_uris) = match existing {
            None => {
                let description = match &options.playlist_description {
                    Some(description) if !description.trim().is_empty() => description.clone(),
                    _ => PlaylistNaming::generate_description(&artists, today),
                };
                let playlist_id =
                    self.catalog
                        .create_playlist(&user_id, &playlist_name, &description)?;
                info!("Created playlist '{playlist_name}' ({playlist_id})");
                if !prepared_uris.is_empty() {
                    self.catalog.add_tracks(&playlist_id, &prepared_uris)?;
                }
                (playlist_id, prepared_uris.clone())
            }
            Some(playlist) => {
                let added = self.update_existing(&playlist, &prepared_uris, options)?;
                (playlist.id, added)
            }
        };

        stats.tracks_uploaded = added_uris.len();
        log_stats(&stats);

        Ok(PlaylistResult {
            playlist_id,
            playlist_name,
            prepared_track_uris: prepared_uris,
            added_track_uris: added_uris,
            display_tracks,
            dry_run: false,
            reused_existing,
            stats,
        })
    }

    /// Candidate artists from every enabled source, deduplicated by id
    fn collect_artists(&self, options: &PlaylistOptions) -> Result<Vec<Artist>, PlaylistError> {
        let resolver = ArtistResolver::new(&self.catalog);
        let mut candidates: Vec<Artist> = Vec::new();

        let mut queries: Vec<String> = options.manual_artist_queries.clone();
        if let Some(path) = &options.artists_file {
            queries.extend(load_artist_queries(path)?);
        }
        for query in queries.iter().map(|q| q.trim()).filter(|q| !q.is_empty()) {
            match resolver.resolve(query) {
                Ok(Some(artist)) => candidates.push(artist),
                Ok(None) => warn!("No artist found for '{query}'"),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => warn!("Artist lookup failed for '{query}': {e}"),
            }
        }

        if options.library_artists || candidates.is_empty() {
            candidates.extend(self.catalog.top_artists(options.source_artist_limit())?);
        }
        if options.followed_artists || candidates.is_empty() {
            candidates.extend(self.catalog.followed_artists(options.source_artist_limit())?);
        }

        let mut seen_ids = HashSet::new();
        let mut artists = Vec::new();
        for artist in candidates {
            if artist.name.is_empty() || !seen_ids.insert(artist.id.clone()) {
                continue;
            }
            artists.push(artist);
            if options.max_artists > 0 && artists.len() >= options.max_artists {
                break;
            }
        }
        Ok(artists)
    }

    fn find_existing_playlist(
        &self,
        options: &PlaylistOptions,
        playlist_name: &str,
        user_id: &str,
    ) -> Result<Option<PlaylistSummary>, PlaylistError> {
        if let Some(target_id) = options
            .target_playlist_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            return Ok(Some(PlaylistSummary {
                id: target_id.to_string(),
                name: playlist_name.to_string(),
                owner_id: user_id.to_string(),
                track_count: 0,
            }));
        }
        let found = self.catalog.find_playlist_by_name(playlist_name, user_id)?;
        if let Some(playlist) = &found {
            info!("Reusing playlist '{}' ({})", playlist.name, playlist.id);
        }
        Ok(found)
    }

    /// Bring an existing playlist up to date and return the newly added ids
    fn update_existing(
        &self,
        playlist: &PlaylistSummary,
        prepared_uris: &[String],
        options: &PlaylistOptions,
    ) -> Result<Vec<String>, PlaylistError> {
        if options.truncate {
            self.catalog.replace_tracks(&playlist.id, prepared_uris)?;
            return Ok(prepared_uris.to_vec());
        }

        let existing_uris = self.catalog.get_playlist_track_ids(&playlist.id)?;
        let existing_set: HashSet<&str> = existing_uris.iter().map(String::as_str).collect();
        let added: Vec<String> = prepared_uris
            .iter()
            .filter(|uri| !existing_set.contains(uri.as_str()))
            .cloned()
            .collect();

        if options.shuffle {
            let prepared_set: HashSet<&str> = prepared_uris.iter().map(String::as_str).collect();
            let mut combined = prepared_uris.to_vec();
            combined.extend(
                existing_uris
                    .iter()
                    .filter(|uri| !prepared_set.contains(uri.as_str()))
                    .cloned(),
            );
            if !combined.is_empty() {
                shuffle_ids(&mut combined, options.shuffle_seed);
                self.catalog.replace_tracks(&playlist.id, &combined)?;
            }
        } else if !added.is_empty() {
            self.catalog.add_tracks(&playlist.id, &added)?;
        }

        Ok(added)
    }
}

fn log_stats(stats: &PlaylistStats) {
    info!("Playlist build stats:");
    for line in stats.lines() {
        info!("  {line}");
    }
}
