use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use strsim::normalized_levenshtein;
use url::Url;

use super::normalize::{case_fold, strip_accents};
use crate::catalog::{Catalog, CatalogError};
use crate::models::Artist;

/// Number of search results considered when matching a free-text query
pub const SEARCH_CANDIDATES: usize = 10;

/// Minimum similarity for the fuzzy-match step
pub const FUZZY_CUTOFF: f64 = 0.6;

static ARTIST_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*:artist:([A-Za-z0-9_-]+)$").unwrap());

/// Maps user-supplied artist queries onto catalog artists
pub struct ArtistResolver<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> ArtistResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Resolve a name, `service:artist:<id>` URI or artist profile URL.
    ///
    /// Returns `Ok(None)` when nothing matches; catalog failures are
    /// returned so the caller can decide whether to carry on.
    pub fn resolve(&self, query: &str) -> Result<Option<Artist>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        if let Some(artist_id) = direct_artist_id(query) {
            debug!("Resolving '{query}' directly as artist id {artist_id}");
            return self.catalog.get_artist(&artist_id).map(Some);
        }

        let matches = self.catalog.search_artists(query, SEARCH_CANDIDATES)?;
        Ok(pick_best_match(query, matches))
    }
}

/// Extract an artist id from a native URI or a web profile URL
pub fn direct_artist_id(query: &str) -> Option<String> {
    if let Some(captures) = ARTIST_URI.captures(query) {
        return Some(captures[1].to_string());
    }

    let url = Url::parse(query).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == "artist")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Exact case-folded name, then accent-insensitive name, then the closest
/// fuzzy match above [`FUZZY_CUTOFF`], then the first search result.
pub fn pick_best_match(query: &str, matches: Vec<Artist>) -> Option<Artist> {
    if matches.is_empty() {
        return None;
    }

    let target = case_fold(query);
    let names: Vec<String> = matches.iter().map(|m| case_fold(&m.name)).collect();
    if let Some(index) = names.iter().position(|name| *name == target) {
        return matches.into_iter().nth(index);
    }

    let target_plain = strip_accents(&target);
    if let Some(index) = names.iter().position(|name| strip_accents(name) == target_plain) {
        return matches.into_iter().nth(index);
    }

    let fuzzy = names
        .iter()
        .enumerate()
        .map(|(index, name)| (index, normalized_levenshtein(&target, name)))
        .filter(|(_, score)| *score >= FUZZY_CUTOFF)
        .fold(None, |best: Option<(usize, f64)>, (index, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((index, score)),
        });

    let index = fuzzy.map(|(index, _)| index).unwrap_or(0);
    matches.into_iter().nth(index)
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

    #[test]
    fn test_direct_ids() {
        assert_eq!(
            direct_artist_id("spotify:artist:2ye2Wgw4gimLv2eAKyk1NB"),
            Some("2ye2Wgw4gimLv2eAKyk1NB".to_string())
        );
        assert_eq!(
            direct_artist_id("https://open.spotify.com/artist/27T030eWyCQRmDyuvr1kxY?si=abc"),
            Some("27T030eWyCQRmDyuvr1kxY".to_string())
        );
        assert_eq!(
            direct_artist_id("https://open.spotify.com/intl-de/artist/27T030eWyCQRmDyuvr1kxY/"),
            Some("27T030eWyCQRmDyuvr1kxY".to_string())
        );
        assert_eq!(direct_artist_id("Metallica"), None);
        assert_eq!(direct_artist_id("AC/DC"), None);
        assert_eq!(direct_artist_id("https://open.spotify.com/album/xyz"), None);
        assert_eq!(direct_artist_id("spotify:track:abc"), None);
    }

    #[test]
    fn test_exact_case_insensitive_match_wins() {
        let matches = vec![
            artist("1", "Metallica Tribute"),
            artist("2", "METALLICA"),
            artist("3", "Metallica"),
        ];
        assert_eq!(pick_best_match("metallica", matches).unwrap().id, "2");
    }

    #[test]
    fn test_accent_insensitive_match() {
        let matches = vec![artist("1", "Motorhead Tribute"), artist("2", "Motörhead")];
        assert_eq!(pick_best_match("Motorhead", matches).unwrap().id, "2");
    }

    #[test]
    fn test_exact_match_folds_sharp_s() {
        let matches = vec![artist("1", "Strassenjungs Tribute"), artist("2", "STRASSENJUNGS")];
        assert_eq!(pick_best_match("Straßenjungs", matches).unwrap().id, "2");
    }

    #[test]
    fn test_fuzzy_match_then_first_result() {
        let matches = vec![artist("1", "Completely Different"), artist("2", "Scorpions")];
        assert_eq!(pick_best_match("Scorpins", matches).unwrap().id, "2");

        let matches = vec![artist("1", "Alpha"), artist("2", "Omega")];
        assert_eq!(pick_best_match("zzzzzzzz", matches).unwrap().id, "1");

        assert!(pick_best_match("anything", vec![]).is_none());
    }

    #[test]
    fn test_uri_bypasses_search() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_get_artist()
            .times(1)
            .returning(|id| Ok(artist(id, "Scorpions")));
        catalog.expect_search_artists().times(0);

        let resolved = ArtistResolver::new(&catalog)
            .resolve("spotify:artist:27T030eWyCQRmDyuvr1kxY")
            .unwrap();
        assert_eq!(resolved.unwrap().id, "27T030eWyCQRmDyuvr1kxY");
    }

    #[test]
    fn test_search_requests_several_candidates() {
        let mut catalog = MockCatalog::new();
        catalog.expect_search_artists().times(1).returning(|query, limit| {
            assert_eq!(query, "Scorpions");
            assert!(limit >= 10);
            Ok(vec![artist("s", "Scorpions")])
        });

        let resolved = ArtistResolver::new(&catalog).resolve("  Scorpions ").unwrap();
        assert_eq!(resolved.unwrap().id, "s");
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_search_artists()
            .returning(|_, _| Ok(Vec::new()));

        assert!(ArtistResolver::new(&catalog).resolve("nobody").unwrap().is_none());
        assert!(ArtistResolver::new(&catalog).resolve("   ").unwrap().is_none());
    }

    #[test]
    fn test_search_failure_is_returned() {
        let mut catalog = MockCatalog::new();
        catalog.expect_search_artists().returning(|_, _| {
            Err(CatalogError::Status {
                code: 429,
                body: "rate limited".to_string(),
            })
        });

        assert!(ArtistResolver::new(&catalog).resolve("Metallica").is_err());
    }
}
