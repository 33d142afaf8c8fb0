use crate::error::{AppError, Result};
use crate::models::{SongRecord, WineRecord};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Headers the song table must provide
pub const SONG_COLUMNS: &[&str] = &[
    "track_name",
    "artist(s)_name",
    "valence_%",
    "energy_%",
    "danceability_%",
];

/// Headers the wine table must provide
pub const WINE_COLUMNS: &[&str] = &["variety", "points"];

/// Where song and wine rows come from
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    fn fetch_songs(&self) -> Result<Vec<SongRecord>>;
    fn fetch_wines(&self) -> Result<Vec<WineRecord>>;
}

/// Reads both tables from CSV files on disk
pub struct CsvSource {
    songs_path: PathBuf,
    wines_path: PathBuf,
}

impl CsvSource {
    pub fn new(songs_path: impl Into<PathBuf>, wines_path: impl Into<PathBuf>) -> Self {
        CsvSource {
            songs_path: songs_path.into(),
            wines_path: wines_path.into(),
        }
    }
}

impl RecordSource for CsvSource {
    fn fetch_songs(&self) -> Result<Vec<SongRecord>> {
        read_table(&self.songs_path, SONG_COLUMNS)
    }

    fn fetch_wines(&self) -> Result<Vec<WineRecord>> {
        read_table(&self.wines_path, WINE_COLUMNS)
    }
}

/// Both tables, loaded once and read-only for the rest of the process
#[derive(Debug, Default)]
pub struct Catalog {
    pub songs: Vec<SongRecord>,
    pub wines: Vec<WineRecord>,
}

impl Catalog {
    pub fn load(source: &dyn RecordSource) -> Result<Self> {
        let songs = source.fetch_songs()?;
        let wines = source.fetch_wines()?;
        info!(songs = songs.len(), wines = wines.len(), "Catalog ready");
        Ok(Catalog { songs, wines })
    }
}

/// Rows that deserialized cleanly plus how many were dropped
#[derive(Debug)]
pub struct ParsedTable<T> {
    pub rows: Vec<T>,
    pub skipped: usize,
}

fn read_table<T: DeserializeOwned>(path: &Path, required: &[&'static str]) -> Result<Vec<T>> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode_text(&bytes);
    let table = parse_table::<T>(&text, path, required)?;

    info!(
        path = %path.display(),
        rows = table.rows.len(),
        "Loaded table"
    );
    if table.skipped > 0 {
        warn!(
            path = %path.display(),
            skipped = table.skipped,
            "Skipped malformed rows"
        );
    }

    Ok(table.rows)
}

/// UTF-8 when valid, otherwise Latin-1 (every byte maps to one char)
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("Input is not UTF-8, decoding as Latin-1");
            encoding_rs::mem::decode_latin1(bytes)
        }
    }
}

/// Parse CSV text into records, skipping rows that fail to deserialize.
///
/// Headers and cells are trimmed and short rows are allowed. A row with more
/// fields than the header is skipped, since its cells no longer line up with
/// their columns. `origin` is only used in error messages. A missing required
/// header is fatal.
pub fn parse_table<T: DeserializeOwned>(
    text: &str,
    origin: &Path,
    required: &[&'static str],
) -> Result<ParsedTable<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| AppError::Csv {
            path: origin.to_path_buf(),
            source,
        })?
        .clone();

    if let Some(column) = required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|h| h == *column))
    {
        return Err(AppError::MissingColumn {
            path: origin.to_path_buf(),
            column,
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                debug!(error = %e, "Skipping unreadable row");
                continue;
            }
        };
        let line = record.position().map(|p| p.line());

        if record.len() > headers.len() {
            skipped += 1;
            debug!(
                ?line,
                fields = record.len(),
                expected = headers.len(),
                "Skipping row with extra fields"
            );
            continue;
        }

        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                debug!(?line, error = %e, "Skipping malformed row");
            }
        }
    }

    Ok(ParsedTable { rows, skipped })
}
