use super::filters::{SongFilters, WineFilters};
use super::insights::CatalogInsights;
use super::ranges::MoodRanges;
use super::result::{MatchRequest, MatchResult};
use super::utils::normalize_text;
use crate::error::{MatchError, RecordKind};
use crate::models::{SongRecord, WineRecord};
use crate::source::Catalog;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Stateless recommendation matcher
pub struct Matcher;

impl Matcher {
    /// Every song whose moods fall inside `ranges`, in table order
    pub fn eligible_songs<'a>(songs: &'a [SongRecord], ranges: &MoodRanges) -> Vec<&'a SongRecord> {
        songs
            .iter()
            .filter(|song| SongFilters::matches_mood_ranges(song, ranges))
            .collect()
    }

    /// Sample up to `k` eligible songs uniformly without replacement.
    ///
    /// The sample is clamped to the pool size; an empty pool is `NoMatch`.
    pub fn match_songs<'a, R>(
        songs: &'a [SongRecord],
        ranges: &MoodRanges,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<&'a SongRecord>, MatchError>
    where
        R: Rng + ?Sized,
    {
        let pool = Self::eligible_songs(songs, ranges);
        Self::sample_pool(&pool, k, rng)
    }

    fn sample_pool<'a, R>(
        pool: &[&'a SongRecord],
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<&'a SongRecord>, MatchError>
    where
        R: Rng + ?Sized,
    {
        if pool.is_empty() {
            return Err(MatchError::NoMatch(RecordKind::Songs));
        }

        let amount = k.min(pool.len());
        Ok(pool.choose_multiple(rng, amount).copied().collect())
    }

    /// Eligible wines ranked by descending score; ties keep table order
    pub fn ranked_wines<'a>(wines: &'a [WineRecord], variety: &str) -> Vec<&'a WineRecord> {
        let query = normalize_text(variety);
        let mut ranked: Vec<&WineRecord> = wines
            .iter()
            .filter(|wine| WineFilters::should_include_wine(wine, &query))
            .collect();

        // sort_by is stable; has_score guarantees points are present and finite
        ranked.sort_by(|a, b| {
            let score_a = a.points.unwrap_or(f32::MIN);
            let score_b = b.points.unwrap_or(f32::MIN);
            score_b.total_cmp(&score_a)
        });
        ranked
    }

    /// Top `k` wines for a variety; an empty pool is `NoMatch`
    pub fn match_wines<'a>(
        wines: &'a [WineRecord],
        variety: &str,
        k: usize,
    ) -> Result<Vec<&'a WineRecord>, MatchError> {
        Self::take_top(&Self::ranked_wines(wines, variety), k)
    }

    fn take_top<'a>(ranked: &[&'a WineRecord], k: usize) -> Result<Vec<&'a WineRecord>, MatchError> {
        if ranked.is_empty() {
            return Err(MatchError::NoMatch(RecordKind::Wines));
        }

        Ok(ranked.iter().take(k).copied().collect())
    }

    /// Run both matchers for one request against the loaded catalog.
    ///
    /// Each pool is built once and kept on the result for summaries and export.
    pub fn recommend<'a, R>(
        catalog: &'a Catalog,
        request: MatchRequest,
        rng: &mut R,
    ) -> MatchResult<'a>
    where
        R: Rng + ?Sized,
    {
        let song_pool = Self::eligible_songs(&catalog.songs, &request.ranges);
        let wine_pool = Self::ranked_wines(&catalog.wines, &request.variety);

        let songs = Self::sample_pool(&song_pool, request.song_count, rng);
        let wines = Self::take_top(&wine_pool, request.wine_count);
        let eligible_songs = CatalogInsights::summarize_songs(&song_pool);

        debug!(
            code = %request.code,
            eligible_songs = song_pool.len(),
            eligible_wines = wine_pool.len(),
            "Matched recommendation"
        );

        MatchResult {
            request,
            songs,
            wines,
            song_pool,
            wine_pool,
            eligible_songs,
        }
    }
}
