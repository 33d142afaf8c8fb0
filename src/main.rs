use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod export;
mod models;
mod pairing;
mod report;
mod source;


use crate::config::load_config;
use crate::pairing::{
    CatalogInsights, ENERGY_BINS, Histogram, MatchRequest, Matcher, PercentRange, ProfileTable,
    RangeOverrides, SEARCH_LIMIT, TOP_HAPPIEST,
};
use crate::source::{Catalog, CsvSource};

const TOP_COUNTRIES: usize = 10;

#[derive(Parser)]
#[command(name = "mbti-pairing")]
#[command(about = "Pairs a personality type with songs and wines")]
#[command(version)]
struct Args {
    /// Personality type code, e.g. INFP
    #[arg(short = 't', long = "type", default_value = "INFP")]
    personality: String,

    /// List the available personality types and exit
    #[arg(long = "list")]
    list: bool,

    /// JSON file replacing the built-in profile table
    #[arg(long = "profiles")]
    profiles: Option<PathBuf>,

    /// Song table (Spotify 2023 CSV layout)
    #[arg(long = "songs")]
    songs: Option<PathBuf>,

    /// Wine table (WineMag CSV layout)
    #[arg(long = "wines")]
    wines: Option<PathBuf>,

    /// Valence range override, e.g. 50-90
    #[arg(long = "valence")]
    valence: Option<PercentRange>,

    /// Energy range override, e.g. 60-90
    #[arg(long = "energy")]
    energy: Option<PercentRange>,

    /// Danceability range override, e.g. 60-90
    #[arg(long = "danceability")]
    danceability: Option<PercentRange>,

    /// Wine variety override, matched as a substring
    #[arg(long = "variety", value_parser = parse_variety)]
    variety: Option<String>,

    /// Number of songs to pick
    #[arg(short = 'n', long = "song-count", value_parser = clap::value_parser!(u8).range(1..=config::MAX_PICK_COUNT as i64))]
    song_count: Option<u8>,

    /// Number of wines to show
    #[arg(short = 'w', long = "wine-count", value_parser = clap::value_parser!(u8).range(1..=config::MAX_PICK_COUNT as i64))]
    wine_count: Option<u8>,

    /// Search songs by title or artist
    #[arg(short = 's', long = "search")]
    search: Option<String>,

    /// Show dataset insights: happiest songs, energy histogram, countries
    #[arg(short = 'i', long = "insights")]
    insights: bool,

    /// Write the eligible songs and ranked wines as CSV into this directory
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,

    /// Quiet mode - only log warnings
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    let config = load_config()?;

    let profiles = match &args.profiles {
        Some(path) => ProfileTable::load_from_file(path)?,
        None => ProfileTable::builtin(),
    };
    info!(profiles = profiles.codes().len(), "Profile table ready");

    if args.list {
        report::print_profile_table(&profiles);
        return Ok(());
    }

    // Fail on an unknown type before paying for the table load
    let profile = profiles.get(&args.personality)?;

    let songs_path = args.songs.clone().unwrap_or(config.songs_path);
    let wines_path = args.wines.clone().unwrap_or(config.wines_path);
    println!("Loading songs from {}", songs_path.display());
    println!("Loading wines from {}", wines_path.display());
    let source = CsvSource::new(songs_path, wines_path);
    let catalog = Catalog::load(&source).context("Failed to load datasets")?;
    println!(
        "Loaded {} songs and {} wines.",
        catalog.songs.len(),
        catalog.wines.len()
    );

    let overrides = RangeOverrides {
        valence: args.valence,
        energy: args.energy,
        danceability: args.danceability,
    };
    let request = MatchRequest::from_profile(profile)
        .with_counts(
            args.song_count.map_or(config.song_count, usize::from),
            args.wine_count.map_or(config.wine_count, usize::from),
        )
        .with_range_overrides(&overrides)
        .with_variety(args.variety.clone());
    if !overrides.is_empty() {
        info!(ranges = ?request.ranges, "Using custom mood ranges");
    }

    let mut rng = rand::thread_rng();
    let result = Matcher::recommend(&catalog, request, &mut rng);

    report::print_profile(profile, &result.request);
    report::print_songs(&result);
    report::print_wines(&result);

    if let Some(term) = &args.search {
        let hits = CatalogInsights::search_songs(&catalog.songs, term, SEARCH_LIMIT);
        report::print_search(term, &hits);
    }

    if args.insights {
        report::print_happiest(&CatalogInsights::top_by_valence(&catalog.songs, TOP_HAPPIEST));
        let energy = Histogram::build(&CatalogInsights::energy_values(&catalog.songs), ENERGY_BINS);
        report::print_histogram("Energy distribution across all songs", energy.as_ref());
        report::print_countries(&CatalogInsights::country_stats(&catalog.wines), TOP_COUNTRIES);
    }

    if let Some(dir) = &args.export {
        let summary = export::export_pools(dir, &result.song_pool, &result.wine_pool)?;
        println!(
            "\nExported {} songs to {} and {} wines to {}",
            result.song_pool.len(),
            summary.songs_path.display(),
            result.wine_pool.len(),
            summary.wines_path.display()
        );
    }

    Ok(())
}

fn parse_variety(value: &str) -> std::result::Result<String, String> {
    let variety = value.trim();
    if variety.is_empty() {
        return Err("variety must not be blank".to_string());
    }
    Ok(variety.to_string())
}

/// Initialize the tracing subscriber; logs go to stderr, the report to stdout
fn init_logging(quiet: bool) {
    let default_filter = if quiet {
        "mbti_pairing=warn"
    } else {
        "mbti_pairing=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
