use crate::error::{AppError, Result};
use crate::pairing::{DEFAULT_SONG_COUNT, DEFAULT_WINE_COUNT};
use std::path::PathBuf;

pub const MAX_PICK_COUNT: usize = 50;

const DEFAULT_SONGS_CSV: &str = "spotify-2023.csv";
const DEFAULT_WINES_CSV: &str = "winemag-data_first150k.csv";

/// Configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub songs_path: PathBuf,
    pub wines_path: PathBuf,
    pub song_count: usize,
    pub wine_count: usize,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}

impl Config {
    /// Build configuration from any key lookup; unset keys take defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let songs_path = lookup("PAIRING_SONGS_CSV").unwrap_or_else(|| DEFAULT_SONGS_CSV.to_string());
        let wines_path = lookup("PAIRING_WINES_CSV").unwrap_or_else(|| DEFAULT_WINES_CSV.to_string());
        let song_count = parse_count(&lookup, "PAIRING_SONG_COUNT", DEFAULT_SONG_COUNT)?;
        let wine_count = parse_count(&lookup, "PAIRING_WINE_COUNT", DEFAULT_WINE_COUNT)?;

        Ok(Config {
            songs_path: PathBuf::from(songs_path),
            wines_path: PathBuf::from(wines_path),
            song_count,
            wine_count,
        })
    }
}

fn parse_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<usize>() {
        Ok(count) if (1..=MAX_PICK_COUNT).contains(&count) => Ok(count),
        _ => Err(AppError::Config(format!(
            "{key} must be a number between 1 and {MAX_PICK_COUNT}, got '{raw}'"
        ))),
    }
}
