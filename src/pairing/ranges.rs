use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed integer interval inside `[0, 100]`, used for mood percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct PercentRange {
    min: u8,
    max: u8,
}

impl PercentRange {
    pub const FULL: PercentRange = PercentRange { min: 0, max: 100 };

    pub fn new(min: u8, max: u8) -> Result<Self, AppError> {
        if min > max || max > 100 {
            return Err(AppError::InvalidRange(format!("{min}-{max}")));
        }
        Ok(Self { min, max })
    }

    /// Compile-time constructor for the built-in profile table
    pub(super) const fn between(min: u8, max: u8) -> Self {
        assert!(min <= max && max <= 100);
        Self { min, max }
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f32) -> bool {
        value >= f32::from(self.min) && value <= f32::from(self.max)
    }
}

impl Default for PercentRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<(u8, u8)> for PercentRange {
    type Error = AppError;

    fn try_from((min, max): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<PercentRange> for (u8, u8) {
    fn from(range: PercentRange) -> Self {
        (range.min, range.max)
    }
}

impl FromStr for PercentRange {
    type Err = AppError;

    /// Accepts `50-90`, `50..90` or `50,90`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidRange(s.to_string());
        let (min, max) = s
            .split_once("..")
            .or_else(|| s.split_once('-'))
            .or_else(|| s.split_once(','))
            .ok_or_else(invalid)?;
        let min = min.trim().parse::<u8>().map_err(|_| invalid())?;
        let max = max.trim().parse::<u8>().map_err(|_| invalid())?;
        Self::new(min, max).map_err(|_| invalid())
    }
}

impl fmt::Display for PercentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// The three song mood intervals a profile asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoodRanges {
    #[serde(default)]
    pub valence: PercentRange,
    #[serde(default)]
    pub energy: PercentRange,
    #[serde(default)]
    pub danceability: PercentRange,
}

impl MoodRanges {
    pub(super) const fn of(
        valence: PercentRange,
        energy: PercentRange,
        danceability: PercentRange,
    ) -> Self {
        Self {
            valence,
            energy,
            danceability,
        }
    }

    /// Replace individual intervals with user-supplied ones
    pub fn with_overrides(self, overrides: &RangeOverrides) -> Self {
        Self {
            valence: overrides.valence.unwrap_or(self.valence),
            energy: overrides.energy.unwrap_or(self.energy),
            danceability: overrides.danceability.unwrap_or(self.danceability),
        }
    }
}

/// Per-attribute replacements for a profile's ranges (the slider variant)
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeOverrides {
    pub valence: Option<PercentRange>,
    pub energy: Option<PercentRange>,
    pub danceability: Option<PercentRange>,
}

impl RangeOverrides {
    pub fn is_empty(&self) -> bool {
        self.valence.is_none() && self.energy.is_none() && self.danceability.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive() {
        let range = PercentRange::new(50, 90).unwrap();
        assert!(range.contains(50.0));
        assert!(range.contains(90.0));
        assert!(range.contains(70.5));
        assert!(!range.contains(49.9));
        assert!(!range.contains(90.1));
    }

    #[test]
    fn rejects_inverted_and_out_of_bounds() {
        assert!(PercentRange::new(60, 50).is_err());
        assert!(PercentRange::new(0, 101).is_err());
        assert!(PercentRange::new(40, 40).is_ok());
    }

    #[test]
    fn parses_cli_forms() {
        let expected = PercentRange::new(30, 60).unwrap();
        assert_eq!("30-60".parse::<PercentRange>().unwrap(), expected);
        assert_eq!("30..60".parse::<PercentRange>().unwrap(), expected);
        assert_eq!(" 30 , 60 ".parse::<PercentRange>().unwrap(), expected);
        assert!("60-30".parse::<PercentRange>().is_err());
        assert!("abc".parse::<PercentRange>().is_err());
        assert!("10-200".parse::<PercentRange>().is_err());
    }

    #[test]
    fn deserializes_from_json_pair() {
        let range: PercentRange = serde_json::from_str("[20, 50]").unwrap();
        assert_eq!(range, PercentRange::new(20, 50).unwrap());
        assert!(serde_json::from_str::<PercentRange>("[50, 20]").is_err());
    }

    #[test]
    fn overrides_replace_only_given_ranges() {
        let base = MoodRanges::default();
        let overrides = RangeOverrides {
            energy: Some(PercentRange::new(60, 90).unwrap()),
            ..RangeOverrides::default()
        };
        let merged = base.with_overrides(&overrides);
        assert_eq!(merged.valence, PercentRange::FULL);
        assert_eq!(merged.energy, PercentRange::new(60, 90).unwrap());
        assert_eq!(merged.danceability, PercentRange::FULL);
        assert!(!overrides.is_empty());
        assert!(RangeOverrides::default().is_empty());
    }
}
