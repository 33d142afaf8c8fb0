use super::filters::SongFilters;
use super::result::SongSummary;
use super::utils::normalize_text;
use crate::error::{MatchError, RecordKind};
use crate::models::{SongRecord, WineRecord};
use std::collections::{BTreeMap, HashSet};

pub const SEARCH_LIMIT: usize = 5;
pub const TOP_HAPPIEST: usize = 5;
pub const ENERGY_BINS: usize = 20;

/// Descriptive statistics over the loaded tables
pub struct CatalogInsights;

impl CatalogInsights {
    /// Songs whose title or artist contains `term`, first `limit` in table order
    pub fn search_songs<'a>(
        songs: &'a [SongRecord],
        term: &str,
        limit: usize,
    ) -> Result<Vec<&'a SongRecord>, MatchError> {
        let term = normalize_text(term);
        let hits: Vec<&SongRecord> = songs
            .iter()
            .filter(|song| SongFilters::matches_search(song, &term))
            .take(limit)
            .collect();

        if hits.is_empty() {
            return Err(MatchError::NoMatch(RecordKind::Songs));
        }
        Ok(hits)
    }

    /// The `n` happiest songs by valence; songs without valence are skipped
    pub fn top_by_valence(songs: &[SongRecord], n: usize) -> Vec<&SongRecord> {
        let mut rated: Vec<&SongRecord> = songs.iter().filter(|s| s.valence.is_some()).collect();
        // stable: equal valence keeps table order
        rated.sort_by(|a, b| {
            let valence_a = a.valence.unwrap_or(f32::MIN);
            let valence_b = b.valence.unwrap_or(f32::MIN);
            valence_b.total_cmp(&valence_a)
        });
        rated.truncate(n);
        rated
    }

    /// Energy values of every song that has one
    pub fn energy_values(songs: &[SongRecord]) -> Vec<f32> {
        songs.iter().filter_map(|s| s.energy).collect()
    }

    /// Wine count and mean score per country, most-reviewed first
    pub fn country_stats(wines: &[WineRecord]) -> Vec<CountryStat> {
        let mut totals: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for wine in wines {
            let (Some(country), Some(points)) = (wine.country(), wine.points) else {
                continue;
            };
            let entry = totals.entry(country).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += f64::from(points);
        }

        let mut stats: Vec<CountryStat> = totals
            .into_iter()
            .map(|(country, (count, sum))| CountryStat {
                country: country.to_string(),
                wine_count: count,
                average_points: (sum / count as f64) as f32,
            })
            .collect();

        // stable: ties stay alphabetical
        stats.sort_by(|a, b| b.wine_count.cmp(&a.wine_count));
        stats
    }

    /// Calculate metadata for a set of songs
    pub fn summarize_songs(songs: &[&SongRecord]) -> SongSummary {
        let artist_count = songs
            .iter()
            .map(|s| s.artist.as_str())
            .collect::<HashSet<_>>()
            .len();

        let years: Vec<i32> = songs.iter().filter_map(|s| s.year).collect();
        let era_span = (years.iter().min().copied(), years.iter().max().copied());

        SongSummary {
            total_songs: songs.len(),
            artist_count,
            era_span,
            average_valence: Self::average(songs.iter().filter_map(|s| s.valence)),
            average_energy: Self::average(songs.iter().filter_map(|s| s.energy)),
            average_danceability: Self::average(songs.iter().filter_map(|s| s.danceability)),
        }
    }

    fn average(values: impl Iterator<Item = f32>) -> Option<f32> {
        let (count, sum) = values.fold((0u32, 0f64), |(n, total), v| (n + 1, total + f64::from(v)));
        (count > 0).then(|| (sum / f64::from(count)) as f32)
    }
}

/// Aggregate behind the per-country wine map
#[derive(Debug, Clone, PartialEq)]
pub struct CountryStat {
    pub country: String,
    pub wine_count: usize,
    pub average_points: f32,
}

/// One histogram bucket, `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f32,
    pub upper: f32,
    pub count: usize,
}

/// Equal-width histogram over the observed range of values
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// Build `bin_count` equal-width bins spanning min..max.
    ///
    /// When every value is the same the range is widened by half a unit each
    /// way so the values land in the middle bin. Returns `None` for no values
    /// or zero bins.
    pub fn build(values: &[f32], bin_count: usize) -> Option<Self> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }

        let mut low = values.iter().copied().fold(f32::INFINITY, f32::min);
        let mut high = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if low == high {
            low -= 0.5;
            high += 0.5;
        }

        let width = (high - low) / bin_count as f32;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: low + width * i as f32,
                upper: if i + 1 == bin_count {
                    high
                } else {
                    low + width * (i + 1) as f32
                },
                count: 0,
            })
            .collect();

        for &value in values {
            let index = (((value - low) / width) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Some(Self { bins })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn song(title: &str, artist: &str, valence: Option<f32>, year: Option<i32>) -> SongRecord {
        SongRecord {
            title: title.to_string(),
            artist: artist.to_string(),
            valence,
            energy: valence,
            danceability: valence,
            year,
            ..SongRecord::default()
        }
    }

    fn wine(country: Option<&str>, points: Option<f32>) -> WineRecord {
        WineRecord {
            country: country.map(str::to_string),
            variety: Some("Merlot".to_string()),
            points,
            ..WineRecord::default()
        }
    }

    #[test]
    fn search_is_accent_insensitive_and_limited() {
        let songs: Vec<SongRecord> = (0..8)
            .map(|i| song(&format!("Canción {i}"), "Artist", Some(50.0), None))
            .collect();
        let hits = CatalogInsights::search_songs(&songs, "CANCION", SEARCH_LIMIT).unwrap();
        assert_eq!(hits.len(), SEARCH_LIMIT);
        assert_eq!(hits[0].title, "Canción 0");
    }

    #[test]
    fn search_without_hits_is_no_match() {
        let songs = vec![song("Flowers", "Miley Cyrus", Some(60.0), None)];
        assert_eq!(
            CatalogInsights::search_songs(&songs, "zzz", 5),
            Err(MatchError::NoMatch(RecordKind::Songs))
        );
        assert_eq!(
            CatalogInsights::search_songs(&songs, "   ", 5),
            Err(MatchError::NoMatch(RecordKind::Songs))
        );
        assert!(CatalogInsights::search_songs(&songs, "miley", 5).is_ok());
    }

    #[test]
    fn top_by_valence_sorts_descending_and_skips_missing() {
        let songs = vec![
            song("a", "x", Some(40.0), None),
            song("b", "x", None, None),
            song("c", "x", Some(95.0), None),
            song("d", "x", Some(70.0), None),
        ];
        let titles: Vec<&str> = CatalogInsights::top_by_valence(&songs, 5)
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["c", "d", "a"]);
        assert_eq!(CatalogInsights::top_by_valence(&songs, 1).len(), 1);
    }

    #[test]
    fn country_stats_average_and_order() {
        let wines = vec![
            wine(Some("US"), Some(90.0)),
            wine(Some("France"), Some(92.0)),
            wine(Some("US"), Some(86.0)),
            wine(Some("Italy"), Some(88.0)),
            wine(None, Some(99.0)),
            wine(Some("Spain"), None),
        ];
        let stats = CatalogInsights::country_stats(&wines);
        let names: Vec<&str> = stats.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["US", "France", "Italy"]);
        assert_eq!(stats[0].wine_count, 2);
        assert_relative_eq!(stats[0].average_points, 88.0);
        assert_relative_eq!(stats[1].average_points, 92.0);
    }

    #[test]
    fn summary_reports_era_and_averages() {
        let songs = vec![
            song("a", "One", Some(40.0), Some(1999)),
            song("b", "Two", Some(60.0), Some(2023)),
            song("c", "One", None, None),
        ];
        let refs: Vec<&SongRecord> = songs.iter().collect();
        let summary = CatalogInsights::summarize_songs(&refs);
        assert_eq!(summary.total_songs, 3);
        assert_eq!(summary.artist_count, 2);
        assert_eq!(summary.era_span, (Some(1999), Some(2023)));
        assert_relative_eq!(summary.average_valence.unwrap(), 50.0);

        let empty = CatalogInsights::summarize_songs(&[]);
        assert_eq!(empty.total_songs, 0);
        assert_eq!(empty.era_span, (None, None));
        assert!(empty.average_energy.is_none());
    }

    #[test]
    fn histogram_spreads_values_over_range() {
        let values = vec![0.0, 10.0, 50.0, 99.0, 100.0];
        let hist = Histogram::build(&values, 10).unwrap();
        assert_eq!(hist.bins.len(), 10);
        assert_eq!(hist.total(), values.len());
        assert_relative_eq!(hist.bins[0].lower, 0.0);
        assert_relative_eq!(hist.bins[9].upper, 100.0);
        assert_eq!(hist.bins[0].count, 1);
        assert_eq!(hist.bins[1].count, 1);
        assert_eq!(hist.bins[5].count, 1);
        // the maximum lands in the closed last bin
        assert_eq!(hist.bins[9].count, 2);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn histogram_of_identical_values_uses_middle_bin() {
        let hist = Histogram::build(&[42.0, 42.0, 42.0], 20).unwrap();
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.max_count(), 3);
        assert_eq!(hist.bins.iter().filter(|b| b.count > 0).count(), 1);
        assert_relative_eq!(hist.bins[0].lower, 41.5);
        assert_relative_eq!(hist.bins[19].upper, 42.5);
    }

    #[test]
    fn histogram_needs_values_and_bins() {
        assert!(Histogram::build(&[], 20).is_none());
        assert!(Histogram::build(&[1.0], 0).is_none());
    }
}
