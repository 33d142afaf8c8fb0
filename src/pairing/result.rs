use super::profiles::PersonalityProfile;
use super::ranges::{MoodRanges, RangeOverrides};
use crate::error::MatchError;
use crate::models::{SongRecord, WineRecord};

pub const DEFAULT_SONG_COUNT: usize = 3;
pub const DEFAULT_WINE_COUNT: usize = 3;

/// Everything the matcher needs for one recommendation
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub code: String,
    pub ranges: MoodRanges,
    pub variety: String,
    pub song_count: usize,
    pub wine_count: usize,
}

impl MatchRequest {
    pub fn from_profile(profile: &PersonalityProfile) -> Self {
        Self {
            code: profile.code.clone(),
            ranges: profile.effective_ranges(),
            variety: profile.wine_variety.clone(),
            song_count: DEFAULT_SONG_COUNT,
            wine_count: DEFAULT_WINE_COUNT,
        }
    }

    pub fn with_counts(mut self, song_count: usize, wine_count: usize) -> Self {
        self.song_count = song_count;
        self.wine_count = wine_count;
        self
    }

    pub fn with_range_overrides(mut self, overrides: &RangeOverrides) -> Self {
        self.ranges = self.ranges.with_overrides(overrides);
        self
    }

    /// Replace the profile's wine label; a blank label matches no wine
    pub fn with_variety(mut self, variety: Option<String>) -> Self {
        if let Some(variety) = variety {
            self.variety = variety;
        }
        self
    }
}

/// One recommendation, borrowed from the loaded catalog
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub request: MatchRequest,
    /// Random sample from the eligible pool, unordered
    pub songs: Result<Vec<&'a SongRecord>, MatchError>,
    /// Best-scored wines, descending
    pub wines: Result<Vec<&'a WineRecord>, MatchError>,
    /// Every song inside the requested ranges, in table order
    pub song_pool: Vec<&'a SongRecord>,
    /// Every eligible wine, best first
    pub wine_pool: Vec<&'a WineRecord>,
    pub eligible_songs: SongSummary,
}

/// Metadata about a set of songs
#[derive(Debug, Clone, PartialEq)]
pub struct SongSummary {
    pub total_songs: usize,
    pub artist_count: usize,
    pub era_span: (Option<i32>, Option<i32>), // (min_year, max_year)
    pub average_valence: Option<f32>,
    pub average_energy: Option<f32>,
    pub average_danceability: Option<f32>,
}
