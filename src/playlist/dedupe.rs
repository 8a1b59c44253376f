use std::collections::{BTreeSet, HashMap};

use strsim::normalized_levenshtein;

use super::normalize::case_fold;
use crate::models::Track;

/// Edit-distance similarity at or above which two titles are the same song
pub const SIMILARITY_THRESHOLD: f64 = 0.92;

/// Minimum share of the longer title a contained phrase must cover
pub const SUBSET_PHRASE_RATIO: f64 = 0.6;

const SUBSET_PHRASE_MIN_CHARS: usize = 4;

/// Case-folded, order-independent set of a track's credited artists.
///
/// Near-duplicate checks are scoped to one fingerprint so a cover by a
/// different lineup never collapses into the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtistFingerprint(Vec<String>);

impl ArtistFingerprint {
    pub fn of(track: &Track) -> Self {
        let names: BTreeSet<String> = track
            .artists
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| case_fold(name))
            .collect();
        Self(names.into_iter().collect())
    }
}

/// Decide whether `candidate` is a variant of any title in `history`.
///
/// Both sides are expected to be normalized already. An empty candidate is
/// never a duplicate.
pub fn is_duplicate(candidate: &str, history: &[String]) -> bool {
    if candidate.is_empty() {
        return false;
    }
    if history.iter().any(|entry| entry == candidate) {
        return true;
    }
    history
        .iter()
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            similarity(candidate, entry) >= SIMILARITY_THRESHOLD
                || same_token_set(candidate, entry)
                || is_subset_phrase(candidate, entry)
                || is_subset_phrase(entry, candidate)
        })
}

/// Normalized Levenshtein similarity in `0.0..=1.0`
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

fn same_token_set(a: &str, b: &str) -> bool {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    !tokens_a.is_empty() && tokens_a == tokens_b
}

/// `short` occurs inside `long` and covers enough of it to be the same song
fn is_subset_phrase(short: &str, long: &str) -> bool {
    if short.is_empty() || long.is_empty() {
        return false;
    }
    if short == long {
        return true;
    }
    let short_len = short.chars().count() as f64;
    let long_len = long.chars().count() as f64;
    long.contains(short)
        && short_len >= (SUBSET_PHRASE_MIN_CHARS as f64).max(long_len * SUBSET_PHRASE_RATIO)
}

/// Normalized titles accepted so far, grouped by artist fingerprint
#[derive(Debug, Default)]
pub struct VariantHistory {
    seen: HashMap<ArtistFingerprint, Vec<String>>,
}

impl VariantHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_variant(&self, fingerprint: &ArtistFingerprint, normalized: &str) -> bool {
        self.seen
            .get(fingerprint)
            .is_some_and(|history| is_duplicate(normalized, history))
    }

    /// Record an accepted title; empty titles are not remembered
    pub fn record(&mut self, fingerprint: ArtistFingerprint, normalized: String) {
        if normalized.is_empty() {
            return;
        }
        self.seen.entry(fingerprint).or_default().push(normalized);
    }
}
