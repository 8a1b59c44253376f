use std::collections::HashSet;

use log::{debug, warn};

use super::PlaylistOptions;
use super::dedupe::{ArtistFingerprint, VariantHistory};
use super::normalize::normalize;
use crate::catalog::{Catalog, CatalogError};
use crate::models::{Artist, Track};

/// Output of a collection run
#[derive(Debug, Default)]
pub struct CollectedTracks {
    pub selected: Vec<Track>,
    /// Tracks rejected as repeats (same id) or variants (near-duplicate title)
    pub skipped: Vec<Track>,
    /// Tracks returned by the catalog before any filtering
    pub total_retrieved: usize,
}

/// Gathers top tracks per artist under per-artist and global caps
pub struct TrackCollector<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> TrackCollector<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Collect tracks for `artists` in order.
    ///
    /// A recoverable top-tracks failure only costs that artist its tracks;
    /// a fatal one (see [`CatalogError::is_fatal`]) ends the collection.
    pub fn collect(
        &self,
        artists: &[Artist],
        options: &PlaylistOptions,
    ) -> Result<CollectedTracks, CatalogError> {
        let mut collected = CollectedTracks::default();
        let per_artist_limit = options.limit_per_artist;
        if per_artist_limit == 0 {
            return Ok(collected);
        }

        let fetch_limit = options.fetch_limit();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut history = VariantHistory::new();

        for artist in artists {
            let top_tracks = match self.catalog.top_tracks_for_artist(&artist.id, fetch_limit) {
                Ok(tracks) => tracks,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Failed to fetch tracks for artist '{}': {e}", artist.name);
                    continue;
                }
            };
            collected.total_retrieved += top_tracks.len();

            let mut added_for_artist = 0;
            for track in top_tracks {
                if track.id.is_empty() {
                    continue;
                }
                if seen_ids.contains(&track.id) {
                    debug!("Skipping repeated track {} ({})", track.id, track.title);
                    collected.skipped.push(track);
                    continue;
                }

                if options.dedupe_variants {
                    let fingerprint = ArtistFingerprint::of(&track);
                    let normalized = normalize(&track.title);
                    if history.is_variant(&fingerprint, &normalized) {
                        debug!("Skipping variant '{}' by {}", track.title, track.primary_artist());
                        collected.skipped.push(track);
                        continue;
                    }
                    history.record(fingerprint, normalized);
                }

                seen_ids.insert(track.id.clone());
                collected.selected.push(track);
                added_for_artist += 1;

                if global_cap_reached(collected.selected.len(), options.max_tracks)
                    || added_for_artist >= per_artist_limit
                {
                    break;
                }
            }

            debug!("Collected {added_for_artist} tracks for '{}'", artist.name);
            if global_cap_reached(collected.selected.len(), options.max_tracks) {
                break;
            }
        }

        Ok(collected)
    }
}

fn global_cap_reached(selected: usize, max_tracks: usize) -> bool {
    max_tracks > 0 && selected >= max_tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalog;

    fn artist(id: &str, name: &str) -> Artist {
        Artist {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn track(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artists: vec![artist.to_string()],
        }
    }

    fn options(limit_per_artist: usize, max_tracks: usize, dedupe_variants: bool) -> PlaylistOptions {
        PlaylistOptions {
            limit_per_artist,
            max_tracks,
            dedupe_variants,
            ..PlaylistOptions::default()
        }
    }

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_zero_limit_fetches_nothing() {
        let catalog = MockCatalog::new();
        let collected = TrackCollector::new(&catalog).collect(&[artist("a", "A")], &options(0, 0, true)).unwrap();

        assert!(collected.selected.is_empty());
        assert!(collected.skipped.is_empty());
        assert_eq!(collected.total_retrieved, 0);
    }

    #[test]
    fn test_per_artist_limit_and_repeated_ids() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_top_tracks_for_artist()
            .returning(|artist_id, limit| {
                assert_eq!(limit, 2);
                Ok(match artist_id {
                    "a" => vec![track("1", "One", "A"), track("2", "Two", "A"), track("3", "Three", "A")],
                    _ => vec![track("2", "Two", "A"), track("4", "Four", "B")],
                })
            });

        let collected = TrackCollector::new(&catalog)
            .collect(&[artist("a", "A"), artist("b", "B")], &options(2, 0, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1", "2", "4"]);
        assert_eq!(ids(&collected.skipped), vec!["2"]);
        assert_eq!(collected.total_retrieved, 5);
    }

    #[test]
    fn test_global_cap_stops_collection() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_top_tracks_for_artist()
            .times(2)
            .returning(|artist_id, _| {
                Ok((0..3)
                    .map(|n| track(&format!("{artist_id}{n}"), &format!("Song {n}"), artist_id))
                    .collect())
            });

        let artists = [artist("a", "A"), artist("b", "B"), artist("c", "C")];
        let collected = TrackCollector::new(&catalog).collect(&artists, &options(3, 4, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["a0", "a1", "a2", "b0"]);
    }

    #[test]
    fn test_variants_deduped_with_over_fetch() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_top_tracks_for_artist()
            .returning(|_, limit| {
                assert_eq!(limit, 7);
                Ok(vec![
                    track("1", "Song (Remastered 2011)", "A"),
                    track("2", "Song", "A"),
                    track("3", "Song - Live", "A"),
                    track("4", "Other", "A"),
                ])
            });

        let collected = TrackCollector::new(&catalog).collect(&[artist("a", "A")], &options(2, 0, true)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1", "4"]);
        assert_eq!(ids(&collected.skipped), vec!["2", "3"]);
    }

    #[test]
    fn test_variants_kept_without_dedupe() {
        let mut catalog = MockCatalog::new();
        catalog.expect_top_tracks_for_artist().returning(|_, _| {
            Ok(vec![track("1", "Song (Remastered 2011)", "A"), track("2", "Song", "A")])
        });

        let collected = TrackCollector::new(&catalog).collect(&[artist("a", "A")], &options(5, 0, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1", "2"]);
        assert!(collected.skipped.is_empty());
    }

    #[test]
    fn test_cover_by_other_lineup_is_kept() {
        let mut catalog = MockCatalog::new();
        catalog.expect_top_tracks_for_artist().returning(|artist_id, _| {
            Ok(match artist_id {
                "m" => vec![track("1", "Nothing Else Matters", "Metallica")],
                _ => vec![track("2", "Nothing Else Matters", "Apocalyptica")],
            })
        });

        let artists = [artist("m", "Metallica"), artist("a", "Apocalyptica")];
        let collected = TrackCollector::new(&catalog).collect(&artists, &options(5, 0, true)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1", "2"]);
    }

    #[test]
    fn test_fetch_failure_skips_only_that_artist() {
        let mut catalog = MockCatalog::new();
        catalog.expect_top_tracks_for_artist().returning(|artist_id, _| match artist_id {
            "bad" => Err(CatalogError::Transport("connection reset".to_string())),
            _ => Ok(vec![track("1", "Fine", "Good")]),
        });

        let artists = [artist("bad", "Bad"), artist("good", "Good")];
        let collected = TrackCollector::new(&catalog).collect(&artists, &options(5, 0, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1"]);
        assert_eq!(collected.total_retrieved, 1);
    }

    #[test]
    fn test_rejected_token_stops_collection() {
        let mut catalog = MockCatalog::new();
        catalog.expect_top_tracks_for_artist().times(1).returning(|_, _| {
            Err(CatalogError::Status {
                code: 401,
                body: "The access token expired".to_string(),
            })
        });

        let artists = [artist("a", "A"), artist("b", "B")];
        let result = TrackCollector::new(&catalog).collect(&artists, &options(5, 0, false));

        assert!(matches!(result, Err(CatalogError::Status { code: 401, .. })));
    }

    #[test]
    fn test_missing_artist_is_skipped() {
        let mut catalog = MockCatalog::new();
        catalog.expect_top_tracks_for_artist().returning(|artist_id, _| match artist_id {
            "gone" => Err(CatalogError::Status {
                code: 404,
                body: String::new(),
            }),
            _ => Ok(vec![track("1", "Fine", "Good")]),
        });

        let artists = [artist("gone", "Gone"), artist("good", "Good")];
        let collected = TrackCollector::new(&catalog).collect(&artists, &options(5, 0, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1"]);
    }

    #[test]
    fn test_tracks_without_id_are_dropped() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_top_tracks_for_artist()
            .returning(|_, _| Ok(vec![track("", "Local", "A"), track("1", "Real", "A")]));

        let collected = TrackCollector::new(&catalog).collect(&[artist("a", "A")], &options(5, 0, false)).unwrap();

        assert_eq!(ids(&collected.selected), vec!["1"]);
        assert!(collected.skipped.is_empty());
        assert_eq!(collected.total_retrieved, 2);
    }
}
