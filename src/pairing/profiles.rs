use super::ranges::{MoodRanges, PercentRange};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A personality category and what it pairs with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    pub code: String,
    pub description: String,
    pub wine_variety: String,
    /// Song mood hints; a profile without them accepts any mood
    #[serde(default)]
    pub mood_ranges: Option<MoodRanges>,
}

impl PersonalityProfile {
    pub fn effective_ranges(&self) -> MoodRanges {
        self.mood_ranges.unwrap_or_default()
    }
}

struct BuiltinProfile {
    code: &'static str,
    description: &'static str,
    wine_variety: &'static str,
    mood_ranges: MoodRanges,
}

const BUILTIN_PROFILES: &[BuiltinProfile] = &[
    BuiltinProfile {
        code: "INFP",
        description: "Dreamy, sensitive, introspective",
        wine_variety: "pinot noir",
        mood_ranges: MoodRanges::of(
            PercentRange::between(30, 60),
            PercentRange::between(20, 50),
            PercentRange::between(30, 60),
        ),
    },
    BuiltinProfile {
        code: "ENFP",
        description: "Spontaneous, creative, sociable",
        wine_variety: "rosé",
        mood_ranges: MoodRanges::of(
            PercentRange::between(60, 90),
            PercentRange::between(60, 90),
            PercentRange::between(60, 90),
        ),
    },
    BuiltinProfile {
        code: "INTJ",
        description: "Analytical, reserved, strategic",
        wine_variety: "cabernet sauvignon",
        mood_ranges: MoodRanges::of(
            PercentRange::between(20, 50),
            PercentRange::between(30, 60),
            PercentRange::between(30, 60),
        ),
    },
    BuiltinProfile {
        code: "ESFP",
        description: "Cheerful, impulsive, energetic",
        wine_variety: "sparkling blend",
        mood_ranges: MoodRanges::of(
            PercentRange::between(70, 100),
            PercentRange::between(70, 100),
            PercentRange::between(70, 100),
        ),
    },
];

/// Immutable lookup table from personality code to profile, in display order
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: Vec<PersonalityProfile>,
}

impl ProfileTable {
    /// The four profiles shipped with the tool
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|p| PersonalityProfile {
                code: p.code.to_string(),
                description: p.description.to_string(),
                wine_variety: p.wine_variety.to_string(),
                mood_ranges: Some(p.mood_ranges),
            })
            .collect();
        Self { profiles }
    }

    /// Load a replacement table from a JSON array of profiles
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profiles: Vec<PersonalityProfile> = serde_json::from_str(&content)
            .map_err(|e| AppError::Profiles(format!("{}: {e}", path.display())))?;
        Self::from_profiles(profiles)
    }

    /// Validate codes and varieties before accepting a table
    pub fn from_profiles(profiles: Vec<PersonalityProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(AppError::Profiles("table has no profiles".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            let code = profile.code.trim();
            if code.is_empty() {
                return Err(AppError::Profiles("profile with empty code".to_string()));
            }
            if !seen.insert(code.to_uppercase()) {
                return Err(AppError::Profiles(format!("duplicate code '{code}'")));
            }
            if profile.wine_variety.trim().is_empty() {
                return Err(AppError::Profiles(format!(
                    "profile '{code}' has no wine variety"
                )));
            }
        }

        Ok(Self { profiles })
    }

    /// Case-insensitive lookup by code
    pub fn get(&self, code: &str) -> Result<&PersonalityProfile> {
        let wanted = code.trim();
        self.profiles
            .iter()
            .find(|p| p.code.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AppError::UnknownProfile(wanted.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonalityProfile> {
        self.profiles.iter()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.code.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(code: &str, variety: &str) -> PersonalityProfile {
        PersonalityProfile {
            code: code.to_string(),
            description: "test".to_string(),
            wine_variety: variety.to_string(),
            mood_ranges: None,
        }
    }

    #[test]
    fn builtin_table_has_four_types() {
        let table = ProfileTable::builtin();
        assert_eq!(table.codes(), vec!["INFP", "ENFP", "INTJ", "ESFP"]);

        let infp = table.get("INFP").unwrap();
        assert_eq!(infp.wine_variety, "pinot noir");
        let ranges = infp.effective_ranges();
        assert_eq!(ranges.valence, PercentRange::new(30, 60).unwrap());
        assert_eq!(ranges.energy, PercentRange::new(20, 50).unwrap());
        assert_eq!(ranges.danceability, PercentRange::new(30, 60).unwrap());
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let table = ProfileTable::builtin();
        assert_eq!(table.get(" esfp ").unwrap().code, "ESFP");
        assert!(matches!(
            table.get("XXXX"),
            Err(AppError::UnknownProfile(code)) if code == "XXXX"
        ));
    }

    #[test]
    fn missing_ranges_fall_back_to_full_interval() {
        let p = profile("ISTJ", "riesling");
        assert_eq!(p.effective_ranges(), MoodRanges::default());
    }

    #[test]
    fn rejects_duplicate_codes() {
        let result = ProfileTable::from_profiles(vec![
            profile("INFP", "pinot noir"),
            profile("infp", "merlot"),
        ]);
        assert!(matches!(result, Err(AppError::Profiles(_))));
    }

    #[test]
    fn rejects_empty_table_and_blank_variety() {
        assert!(ProfileTable::from_profiles(Vec::new()).is_err());
        assert!(ProfileTable::from_profiles(vec![profile("INFP", "  ")]).is_err());
    }

    #[test]
    fn parses_json_profiles() {
        let json = r#"[
            {
                "code": "ISTJ",
                "description": "Dutiful, practical, orderly",
                "wine_variety": "riesling",
                "mood_ranges": {"valence": [20, 40], "energy": [10, 50]}
            },
            {
                "code": "ENTP",
                "description": "Inventive, outspoken",
                "wine_variety": "zinfandel"
            }
        ]"#;
        let profiles: Vec<PersonalityProfile> = serde_json::from_str(json).unwrap();
        let table = ProfileTable::from_profiles(profiles).unwrap();

        let istj = table.get("istj").unwrap();
        let ranges = istj.effective_ranges();
        assert_eq!(ranges.valence, PercentRange::new(20, 40).unwrap());
        assert_eq!(ranges.danceability, PercentRange::FULL);
        assert!(table.get("ENTP").unwrap().mood_ranges.is_none());
    }

    #[test]
    fn invalid_json_range_is_rejected() {
        let json = r#"[{"code": "X", "description": "", "wine_variety": "merlot",
                        "mood_ranges": {"valence": [90, 10]}}]"#;
        assert!(serde_json::from_str::<Vec<PersonalityProfile>>(json).is_err());
    }
}
