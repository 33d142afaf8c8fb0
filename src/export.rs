use crate::error::{AppError, Result};
use crate::models::{SongRecord, WineRecord};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const SONGS_FILE: &str = "songs.csv";
pub const WINES_FILE: &str = "wines.csv";

// Written by hand when a pool is empty; serialize only emits headers with a row
const SONG_HEADERS: &[&str] = &[
    "track_name",
    "artist(s)_name",
    "valence_%",
    "energy_%",
    "danceability_%",
    "streams",
    "released_year",
    "released_month",
    "released_day",
];
const WINE_HEADERS: &[&str] = &[
    "rank",
    "title",
    "variety",
    "points",
    "country",
    "province",
    "winery",
    "price",
    "description",
];

/// A ranked wine with placeholders already applied
#[derive(Debug, Serialize)]
struct WineExportRow<'a> {
    rank: usize,
    title: &'a str,
    variety: &'a str,
    points: Option<f32>,
    country: &'a str,
    province: Option<&'a str>,
    winery: Option<&'a str>,
    price: Option<f32>,
    description: &'a str,
}

/// Paths written by [`export_pools`]
#[derive(Debug)]
pub struct ExportSummary {
    pub songs_path: PathBuf,
    pub wines_path: PathBuf,
}

/// Write the eligible song pool and the ranked wine pool into `dir`
pub fn export_pools(dir: &Path, songs: &[&SongRecord], wines: &[&WineRecord]) -> Result<ExportSummary> {
    std::fs::create_dir_all(dir).map_err(|source| AppError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let songs_path = dir.join(SONGS_FILE);
    write_to_file(&songs_path, |out| write_songs(out, songs))?;

    let wines_path = dir.join(WINES_FILE);
    write_to_file(&wines_path, |out| write_wines(out, wines))?;

    info!(
        dir = %dir.display(),
        songs = songs.len(),
        wines = wines.len(),
        "Exported eligible pools"
    );

    Ok(ExportSummary {
        songs_path,
        wines_path,
    })
}

fn write_to_file(
    path: &Path,
    write: impl FnOnce(&mut std::fs::File) -> csv::Result<()>,
) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write(&mut file).map_err(|source| AppError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Songs keep the column names of the source table
pub fn write_songs<W: Write>(out: W, songs: &[&SongRecord]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if songs.is_empty() {
        writer.write_record(SONG_HEADERS)?;
    }
    for song in songs {
        writer.serialize(song)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_wines<W: Write>(out: W, wines: &[&WineRecord]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if wines.is_empty() {
        writer.write_record(WINE_HEADERS)?;
    }
    for (index, wine) in wines.iter().enumerate() {
        writer.serialize(WineExportRow {
            rank: index + 1,
            title: wine.display_title(),
            variety: wine.variety().unwrap_or_default(),
            points: wine.points,
            country: wine.display_country(),
            province: wine.province.as_deref(),
            winery: wine.winery.as_deref(),
            price: wine.price,
            description: wine.display_description(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
