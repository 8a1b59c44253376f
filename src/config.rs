use anyhow::{Context, Result, anyhow};

pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

const PLACEHOLDER_TOKENS: [&str; 3] = [
    "your_spotify_access_token",
    "<your_access_token>",
    "spotify_access_token_here",
];

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub api_base: String,
    pub default_playlist_name: String,
    pub default_limit_per_artist: usize,
    pub default_max_artists: usize,
    pub default_max_tracks: usize,
    pub default_verbose: bool,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a [`Config`] from an arbitrary variable source
pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let access_token = lookup("SPOTIFY_ACCESS_TOKEN")
        .map(|token| token.trim().to_string())
        .filter(|token| {
            !token.is_empty() && !PLACEHOLDER_TOKENS.contains(&token.to_lowercase().as_str())
        })
        .ok_or_else(|| anyhow!("SPOTIFY_ACCESS_TOKEN is not configured"))?;

    let api_base = lookup("SPOTIFY_API_BASE")
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let default_playlist_name = lookup("DEFAULT_PLAYLIST_NAME")
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Fav Artists Top Tracks".to_string());

    Ok(Config {
        access_token,
        api_base,
        default_playlist_name,
        default_limit_per_artist: parse_count(&lookup, "DEFAULT_LIMIT_PER_ARTIST", 5)?,
        default_max_artists: parse_count(&lookup, "DEFAULT_MAX_ARTISTS", 100)?,
        default_max_tracks: parse_count(&lookup, "DEFAULT_MAX_TRACKS", 500)?,
        default_verbose: lookup("DEFAULT_VERBOSE")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false),
    })
}

fn parse_count<F>(lookup: &F, key: &str, default: usize) -> Result<usize>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        _ => Ok(default),
    }
}
