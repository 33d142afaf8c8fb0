use super::ranges::MoodRanges;
use super::utils::normalize_text;
use crate::models::{SongRecord, WineRecord};

/// Song filtering functionality using static helper functions
pub struct SongFilters;

impl SongFilters {
    /// Check that all three moods are present and inside their intervals.
    /// A missing attribute fails the test.
    pub fn matches_mood_ranges(song: &SongRecord, ranges: &MoodRanges) -> bool {
        let Some((valence, energy, danceability)) = song.moods() else {
            return false;
        };

        ranges.valence.contains(valence)
            && ranges.energy.contains(energy)
            && ranges.danceability.contains(danceability)
    }

    /// Check whether the title or artist contains an already-normalized term
    pub fn matches_search(song: &SongRecord, normalized_term: &str) -> bool {
        if normalized_term.is_empty() {
            return false;
        }

        normalize_text(&song.title).contains(normalized_term)
            || normalize_text(&song.artist).contains(normalized_term)
    }
}

/// Wine filtering functionality using static helper functions
pub struct WineFilters;

impl WineFilters {
    /// Only wines with a usable score can be ranked
    pub fn has_score(wine: &WineRecord) -> bool {
        wine.points.is_some_and(f32::is_finite)
    }

    /// Check the variety against an already-normalized query.
    /// Blank varieties and blank queries never match.
    pub fn matches_variety(wine: &WineRecord, normalized_query: &str) -> bool {
        if normalized_query.is_empty() {
            return false;
        }

        let Some(variety) = wine.variety() else {
            return false;
        };

        normalize_text(variety).contains(normalized_query)
    }

    /// Apply all filters to determine if a wine is eligible for ranking
    pub fn should_include_wine(wine: &WineRecord, normalized_query: &str) -> bool {
        Self::has_score(wine) && Self::matches_variety(wine, normalized_query)
    }
}
