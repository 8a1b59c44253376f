use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

mod catalog;
mod client;
mod config;
mod error;
mod models;
mod playlist;


use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::playlist::{PlaylistGenerator, PlaylistOptions, PlaylistResult};

#[derive(Parser)]
#[command(name = "artist-playlist-builder")]
#[command(about = "Builds a playlist from the top tracks of your favourite artists")]
#[command(version)]
struct Args {
    /// Path to a JSON file with playlist options
    #[arg(short = 'o', long = "options")]
    options_file: Option<String>,

    /// Playlist name
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Playlist description used when a new playlist is created
    #[arg(long = "description")]
    description: Option<String>,

    /// Artist name, URI or link (repeatable)
    #[arg(short = 'a', long = "artist")]
    artists: Vec<String>,

    /// File with one artist per line; lines starting with '#' are ignored
    #[arg(short = 'f', long = "artists-file")]
    artists_file: Option<PathBuf>,

    #[arg(long = "limit-per-artist")]
    limit_per_artist: Option<usize>,

    /// Maximum number of artists (0 = unlimited)
    #[arg(long = "max-artists")]
    max_artists: Option<usize>,

    /// Maximum number of tracks (0 = unlimited)
    #[arg(long = "max-tracks")]
    max_tracks: Option<usize>,

    /// Append today's date to the playlist name
    #[arg(long = "date-stamp")]
    date_stamp: bool,

    /// Skip remasters, live takes and other variants of the same song
    #[arg(long = "dedupe-variants")]
    dedupe_variants: bool,

    /// Spread artists evenly through the playlist
    #[arg(long = "shuffle")]
    shuffle: bool,

    /// Seed for a reproducible shuffle
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Update an existing playlist with the same name instead of creating one
    #[arg(long = "reuse-existing")]
    reuse_existing: bool,

    /// Update this playlist id (implies --reuse-existing)
    #[arg(long = "playlist-id")]
    playlist_id: Option<String>,

    /// Replace the contents of a reused playlist
    #[arg(long = "truncate")]
    truncate: bool,

    /// Actually create or update the playlist (default is a dry run)
    #[arg(short = 'c', long = "create")]
    create: bool,

    /// Include your top artists
    #[arg(long = "library")]
    library: bool,

    /// Include the artists you follow
    #[arg(long = "followed")]
    followed: bool,

    /// Print the prepared track list
    #[arg(short = 'p', long = "print-tracks")]
    print_tracks: bool,

    /// Verbose mode - log per-artist progress
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Quiet mode - only warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Apply command-line flags on top of file and environment options
    fn apply(self, mut options: PlaylistOptions) -> PlaylistOptions {
        if let Some(name) = self.name {
            options.playlist_name = name;
        }
        if self.description.is_some() {
            options.playlist_description = self.description;
        }
        options.manual_artist_queries.extend(self.artists);
        if self.artists_file.is_some() {
            options.artists_file = self.artists_file;
        }
        if let Some(limit) = self.limit_per_artist {
            options.limit_per_artist = limit;
        }
        if let Some(max) = self.max_artists {
            options.max_artists = max;
        }
        if let Some(max) = self.max_tracks {
            options.max_tracks = max;
        }
        if self.seed.is_some() {
            options.shuffle_seed = self.seed;
        }
        if self.playlist_id.is_some() {
            options.target_playlist_id = self.playlist_id;
            options.reuse_existing = true;
        }

        options.date_stamp |= self.date_stamp;
        options.dedupe_variants |= self.dedupe_variants;
        options.shuffle |= self.shuffle;
        options.reuse_existing |= self.reuse_existing;
        options.truncate |= self.truncate;
        options.library_artists |= self.library;
        options.followed_artists |= self.followed;
        options.print_tracks |= self.print_tracks;
        options.verbose |= self.verbose;
        if self.create {
            options.dry_run = false;
        }
        options
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_summary(result: &PlaylistResult, options: &PlaylistOptions) {
    println!("\n=== {} ===", result.playlist_name);
    for line in result.stats.lines() {
        println!("{line}");
    }

    if options.print_tracks {
        println!("\nTracks:");
        for (i, line) in result.display_tracks.iter().enumerate() {
            println!("  {}. {}", i + 1, line);
        }
    }

    if result.dry_run {
        println!(
            "\nDry run: {} tracks prepared, nothing was uploaded. Pass --create to apply.",
            result.prepared_track_uris.len()
        );
    } else if result.reused_existing {
        println!(
            "\n✓ Updated playlist {} with {} new tracks",
            result.playlist_id,
            result.added_track_uris.len()
        );
    } else {
        println!(
            "\n✓ Created playlist {} with {} tracks",
            result.playlist_id,
            result.added_track_uris.len()
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from .env
    let config = load_config()?;
    let quiet = args.quiet;

    let mut options = PlaylistOptions::from_settings(&config);
    if let Some(path) = &args.options_file {
        options = options
            .overlay_file(path)
            .map_err(|e| anyhow!("Failed to load playlist options from '{path}': {e}"))?;
    }
    let options = args.apply(options);
    init_logging(options.verbose, quiet);

    let client = SpotifyClient::new(&config);
    let generator = PlaylistGenerator::new(client);
    let result = generator
        .build(&options)
        .with_context(|| format!("Failed to build playlist '{}'", options.playlist_name))?;

    print_summary(&result, &options);
    Ok(())
}
