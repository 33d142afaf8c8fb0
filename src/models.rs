use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Shown when a wine row has no title
pub const UNTITLED_WINE: &str = "Untitled wine";
/// Shown when a wine row has no country
pub const UNKNOWN_COUNTRY: &str = "Unknown country";
/// Shown when a wine row has no description
pub const NO_DESCRIPTION: &str = "No description available.";

/// A row of the song table, using the column names of the Spotify 2023 dataset.
///
/// Numeric cells that are empty or unparsable deserialize to `None` so a single
/// bad cell never drops the whole row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    #[serde(rename = "track_name")]
    pub title: String,
    #[serde(rename = "artist(s)_name")]
    pub artist: String,
    #[serde(rename = "valence_%", default, deserialize_with = "finite_number")]
    pub valence: Option<f32>,
    #[serde(rename = "energy_%", default, deserialize_with = "finite_number")]
    pub energy: Option<f32>,
    #[serde(rename = "danceability_%", default, deserialize_with = "finite_number")]
    pub danceability: Option<f32>,
    #[serde(rename = "streams", default, deserialize_with = "csv::invalid_option")]
    pub play_count: Option<u64>,
    #[serde(
        rename = "released_year",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub year: Option<i32>,
    #[serde(
        rename = "released_month",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub month: Option<u32>,
    #[serde(
        rename = "released_day",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub day: Option<u32>,
}

impl SongRecord {
    /// Calendar release date, when year, month and day form a valid date
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// All three mood percentages, or `None` if any is missing
    pub fn moods(&self) -> Option<(f32, f32, f32)> {
        Some((self.valence?, self.energy?, self.danceability?))
    }
}

impl Default for SongRecord {
    fn default() -> Self {
        SongRecord {
            title: "Unknown".to_string(),
            artist: "Unknown".to_string(),
            valence: None,
            energy: None,
            danceability: None,
            play_count: None,
            year: None,
            month: None,
            day: None,
        }
    }
}

/// A row of the wine review table (WineMag layout).
///
/// Every field is optional: the 150k dataset has no `title` column at all and
/// many rows leave region or price blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub variety: Option<String>,
    #[serde(default, deserialize_with = "finite_number")]
    pub points: Option<f32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub winery: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub price: Option<f32>,
}

impl WineRecord {
    pub fn display_title(&self) -> &str {
        non_blank(&self.title).unwrap_or(UNTITLED_WINE)
    }

    pub fn display_country(&self) -> &str {
        non_blank(&self.country).unwrap_or(UNKNOWN_COUNTRY)
    }

    pub fn display_description(&self) -> &str {
        non_blank(&self.description).unwrap_or(NO_DESCRIPTION)
    }

    /// Variety text, ignoring blank cells
    pub fn variety(&self) -> Option<&str> {
        non_blank(&self.variety)
    }

    /// Country text, ignoring blank cells
    pub fn country(&self) -> Option<&str> {
        non_blank(&self.country)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// "nan" and "inf" parse as floats, so they are rejected here along with text
fn finite_number<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f32> = csv::invalid_option(deserializer)?;
    Ok(value.filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_date_requires_all_parts() {
        let song = SongRecord {
            year: Some(2023),
            month: Some(7),
            day: Some(14),
            ..SongRecord::default()
        };
        assert_eq!(song.release_date(), NaiveDate::from_ymd_opt(2023, 7, 14));

        let no_day = SongRecord { day: None, ..song.clone() };
        assert_eq!(no_day.release_date(), None);

        let bad_day = SongRecord { day: Some(31), month: Some(2), ..song };
        assert_eq!(bad_day.release_date(), None);
    }

    #[test]
    fn moods_need_all_three_values() {
        let song = SongRecord {
            valence: Some(55.0),
            energy: Some(70.0),
            danceability: Some(65.5),
            ..SongRecord::default()
        };
        assert_eq!(song.moods(), Some((55.0, 70.0, 65.5)));

        let partial = SongRecord { energy: None, ..song };
        assert_eq!(partial.moods(), None);
    }

    #[test]
    fn wine_placeholders_cover_missing_and_blank_fields() {
        let wine = WineRecord {
            title: Some("   ".to_string()),
            country: None,
            description: Some(String::new()),
            ..WineRecord::default()
        };
        assert_eq!(wine.display_title(), UNTITLED_WINE);
        assert_eq!(wine.display_country(), UNKNOWN_COUNTRY);
        assert_eq!(wine.display_description(), NO_DESCRIPTION);

        let named = WineRecord {
            title: Some("Domaine X 2012 Pinot Noir".to_string()),
            country: Some("France".to_string()),
            ..WineRecord::default()
        };
        assert_eq!(named.display_title(), "Domaine X 2012 Pinot Noir");
        assert_eq!(named.display_country(), "France");
    }
}
