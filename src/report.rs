use crate::error::MatchError;
use crate::models::{SongRecord, WineRecord};
use crate::pairing::utils::ToTitleCase;
use crate::pairing::{
    CountryStat, Histogram, MatchRequest, MatchResult, PersonalityProfile, ProfileTable,
    SongSummary,
};

const BAR_WIDTH: usize = 40;

pub fn print_profile_table(profiles: &ProfileTable) {
    println!("Available personality types:");
    for profile in profiles.iter() {
        let ranges = profile.effective_ranges();
        println!(
            "  {:<5} {} | wine: {} | valence {} energy {} danceability {}",
            profile.code,
            profile.description,
            profile.wine_variety.to_title_case(),
            ranges.valence,
            ranges.energy,
            ranges.danceability
        );
    }
}

pub fn print_profile(profile: &PersonalityProfile, request: &MatchRequest) {
    let header = format!("{} - {}", profile.code, profile.description);
    println!("\n{header}");
    println!("{}", "=".repeat(header.chars().count()));
    println!("Suggested wine: {}", request.variety.to_title_case());
    println!(
        "Song moods: valence {} | energy {} | danceability {}",
        request.ranges.valence, request.ranges.energy, request.ranges.danceability
    );
}

pub fn print_songs(result: &MatchResult<'_>) {
    println!("\nYour songs");
    println!("----------");
    match &result.songs {
        Ok(songs) => {
            print_pool_summary(&result.eligible_songs);
            for song in songs {
                println!("  - {}", describe_song(song));
            }
        }
        Err(e) => warn_no_match(e, "No songs found with those values."),
    }
}

pub fn print_wines(result: &MatchResult<'_>) {
    println!("\nWines that match you");
    println!("--------------------");
    match &result.wines {
        Ok(wines) => {
            println!("  {} eligible wines, best first", result.wine_pool.len());
            for wine in wines {
                print_wine(wine);
            }
        }
        Err(e) => warn_no_match(e, "No wines found for this type."),
    }
}

fn print_wine(wine: &WineRecord) {
    let points = wine
        .points
        .map(|p| format!("{p:.0}"))
        .unwrap_or_else(|| "N/A".to_string());
    println!("\n  {}", wine.display_title());
    println!(
        "  Score: {} | Origin: {} | Variety: {}",
        points,
        wine.display_country(),
        wine.variety().unwrap_or_default()
    );
    if let Some(price) = wine.price {
        println!("  Price: ${price:.2}");
    }
    println!("  {}", wine.display_description());
}

fn print_pool_summary(summary: &SongSummary) {
    let era = match summary.era_span {
        (Some(min_year), Some(max_year)) if min_year == max_year => format!(" | Era: {min_year}"),
        (Some(min_year), Some(max_year)) => format!(" | Era: {min_year} - {max_year}"),
        _ => String::new(),
    };
    println!(
        "  {} eligible songs by {} artists{}",
        summary.total_songs, summary.artist_count, era
    );
}

pub fn print_search(term: &str, hits: &Result<Vec<&SongRecord>, MatchError>) {
    println!("\nSearch results for '{term}'");
    match hits {
        Ok(songs) => {
            for song in songs {
                println!("  - {}", describe_song(song));
            }
        }
        Err(e) => warn_no_match(e, "No matches found."),
    }
}

pub fn print_happiest(songs: &[&SongRecord]) {
    println!("\nTop {} happiest songs", songs.len());
    for song in songs {
        println!(
            "  - {} by {} (valence: {:.1})",
            song.title,
            song.artist,
            song.valence.unwrap_or_default()
        );
    }
}

pub fn print_histogram(title: &str, histogram: Option<&Histogram>) {
    println!("\n{title}");
    let Some(histogram) = histogram else {
        println!("  (no data)");
        return;
    };

    println!("  {} values in {} bins", histogram.total(), histogram.bins.len());
    let max = histogram.max_count().max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * BAR_WIDTH / max);
        println!(
            "  {:>5.1}-{:<5.1} {:>5} {}",
            bin.lower, bin.upper, bin.count, bar
        );
    }
}

pub fn print_countries(stats: &[CountryStat], limit: usize) {
    println!("\nWine reviews by country");
    for stat in stats.iter().take(limit) {
        println!(
            "  {:<20} {:>6} wines | avg score {:.1}",
            stat.country, stat.wine_count, stat.average_points
        );
    }
}

fn describe_song(song: &SongRecord) -> String {
    let released = song
        .release_date()
        .map(|d| format!(" [{}]", d.format("%Y-%m-%d")))
        .or_else(|| song.year.map(|y| format!(" [{y}]")))
        .unwrap_or_default();
    let plays = song
        .play_count
        .map(|p| format!(" ({p} streams)"))
        .unwrap_or_default();
    format!("\"{}\" by {}{}{}", song.title, song.artist, released, plays)
}

fn warn_no_match(error: &MatchError, message: &str) {
    println!("  ⚠ {message}");
    tracing::debug!(%error, "Recovered from empty match");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_description_prefers_full_date() {
        let song = SongRecord {
            title: "Flowers".to_string(),
            artist: "Miley Cyrus".to_string(),
            year: Some(2023),
            month: Some(1),
            day: Some(12),
            play_count: Some(42),
            ..SongRecord::default()
        };
        assert_eq!(
            describe_song(&song),
            "\"Flowers\" by Miley Cyrus [2023-01-12] (42 streams)"
        );

        let year_only = SongRecord { month: None, play_count: None, ..song };
        assert_eq!(describe_song(&year_only), "\"Flowers\" by Miley Cyrus [2023]");
    }
}
