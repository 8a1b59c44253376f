use std::collections::{BTreeMap, BinaryHeap};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::models::Track;

/// Seeded generator when `seed` is set, entropy-seeded otherwise
pub fn shuffle_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Heap entry: the bucket with the most remaining tracks surfaces first,
/// ties broken by a random draw.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Bucket {
    remaining: usize,
    tiebreak: u64,
    artist: String,
}

/// Randomly reorder `tracks`, avoiding back-to-back tracks by the same
/// primary artist whenever another artist still has tracks left.
///
/// The same seed always yields the same order.
pub fn fair_shuffle(tracks: Vec<Track>, seed: Option<u64>) -> Vec<Track> {
    if tracks.len() <= 1 {
        return tracks;
    }
    let mut rng = shuffle_rng(seed);

    let mut buckets: BTreeMap<String, Vec<Track>> = BTreeMap::new();
    let total = tracks.len();
    for track in tracks {
        buckets
            .entry(track.primary_artist().to_string())
            .or_default()
            .push(track);
    }
    for entries in buckets.values_mut() {
        entries.shuffle(&mut rng);
    }

    let mut heap: BinaryHeap<Bucket> = buckets
        .iter()
        .map(|(artist, entries)| Bucket {
            remaining: entries.len(),
            tiebreak: rng.next_u64(),
            artist: artist.clone(),
        })
        .collect();

    let mut result = Vec::with_capacity(total);
    let mut previous: Option<String> = None;
    while let Some(mut top) = heap.pop() {
        if previous.as_deref() == Some(top.artist.as_str()) {
            // Each artist has at most one heap entry, so the next one differs.
            if let Some(next) = heap.pop() {
                top.tiebreak = rng.next_u64();
                heap.push(top);
                top = next;
            }
        }

        let Some(entries) = buckets.get_mut(&top.artist) else {
            continue;
        };
        let Some(track) = entries.pop() else {
            continue;
        };
        result.push(track);
        if !entries.is_empty() {
            heap.push(Bucket {
                remaining: entries.len(),
                tiebreak: rng.next_u64(),
                artist: top.artist.clone(),
            });
        }
        previous = Some(top.artist);
    }

    result
}

/// Plain seeded shuffle for identifier lists that carry no artist data
pub fn shuffle_ids(ids: &mut [String], seed: Option<u64>) {
    ids.shuffle(&mut shuffle_rng(seed));
}
