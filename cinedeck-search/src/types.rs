//! Data types for media lookups and search results.

use serde::{Serialize, Serializer};

use crate::errors::MediaSearchError;

/// Media kind classification. Ids are only unique within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
    #[serde(rename = "person")]
    Person,
}

impl MediaKind {
    /// Path segment and wire tag used by the upstream API.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
            MediaKind::Person => "person",
        }
    }

    /// Parses an upstream `media_type` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Series),
            "person" => Some(MediaKind::Person),
            _ => None,
        }
    }

    /// Resolves the kind of a title entry.
    ///
    /// A recognized explicit tag always wins. Without one, a series-style
    /// `first_air_date` marks a series and anything else is a movie.
    pub fn infer(tag: Option<&str>, first_air_date: Option<&str>) -> Self {
        if let Some(kind) = tag.and_then(Self::from_tag) {
            return kind;
        }
        if first_air_date.is_some() {
            MediaKind::Series
        } else {
            MediaKind::Movie
        }
    }

    /// Movies and series; persons have no titles, trailers or listings.
    pub fn is_title(self) -> bool {
        !matches!(self, MediaKind::Person)
    }

    /// Rejects persons for title-only operations.
    ///
    /// # Errors
    ///
    /// - `MediaSearchError::InvalidMediaType` - If `self` is `Person`
    pub fn require_title(self) -> Result<Self, MediaSearchError> {
        if self.is_title() {
            Ok(self)
        } else {
            Err(MediaSearchError::InvalidMediaType {
                media_type: self.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = MediaSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "tv" | "series" | "show" => Ok(MediaKind::Series),
            "person" | "people" => Ok(MediaKind::Person),
            _ => Err(MediaSearchError::InvalidMediaType {
                media_type: s.to_string(),
            }),
        }
    }
}

/// Composite identity of a result: `(kind, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub id: u64,
}

impl MediaKey {
    pub fn new(kind: MediaKind, id: u64) -> Self {
        Self { kind, id }
    }
}

/// Release year taken from the leading component of a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseYear {
    Known(u16),
    Unknown,
}

impl ReleaseYear {
    /// Parses `YYYY-MM-DD` (or any string starting with a 4-digit year).
    pub fn from_date(date: Option<&str>) -> Self {
        let Some(year) = date.and_then(|d| d.split('-').next()) else {
            return ReleaseYear::Unknown;
        };
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return ReleaseYear::Unknown;
        }
        year.parse().map(ReleaseYear::Known).unwrap_or(ReleaseYear::Unknown)
    }

    pub fn as_option(self) -> Option<u16> {
        match self {
            ReleaseYear::Known(year) => Some(year),
            ReleaseYear::Unknown => None,
        }
    }
}

impl std::fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseYear::Known(year) => write!(f, "{year}"),
            ReleaseYear::Unknown => f.write_str("unknown"),
        }
    }
}

impl Serialize for ReleaseYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReleaseYear::Known(year) => serializer.serialize_u16(*year),
            ReleaseYear::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Unified result entry for movies, series and people.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultItem {
    pub kind: MediaKind,
    pub id: u64,
    /// Title for movies and series, name for people
    pub title: String,
    pub release_year: ReleaseYear,
    /// Poster path for titles, profile path for people
    pub image_path: Option<String>,
    /// Average rating (0.0-10.0); never set for people
    pub rating: Option<f32>,
    pub popularity: Option<f64>,
}

impl SearchResultItem {
    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.kind, self.id)
    }

    pub fn is_person(&self) -> bool {
        self.kind == MediaKind::Person
    }
}

/// How a person participated in a title.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum CreditRole {
    Cast { character: Option<String> },
    Crew { job: Option<String> },
}

/// One entry of a person's combined filmography.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonCredit {
    pub item: SearchResultItem,
    #[serde(flatten)]
    pub role: CreditRole,
}

impl PersonCredit {
    pub fn is_cast(&self) -> bool {
        matches!(self.role, CreditRole::Cast { .. })
    }
}

/// A video attached to a title.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl Video {
    /// Trailer hosted on the supported video platform.
    pub fn is_playable_trailer(&self) -> bool {
        self.video_type == "Trailer" && self.site == "YouTube"
    }
}

/// Picks the first playable trailer from a video list.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    videos.iter().find(|video| video.is_playable_trailer())
}

/// Billed cast member of a title.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

/// Full record of a movie or series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDetails {
    pub kind: MediaKind,
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub release_year: ReleaseYear,
    pub runtime_minutes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub rating: Option<f32>,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
}

impl MediaDetails {
    pub fn trailer(&self) -> Option<&Video> {
        select_trailer(&self.videos)
    }
}

/// Biographical record of a person.
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct PersonDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Options recognized by discovery listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoverFilter {
    /// Restrict by original language code (e.g. `ko`)
    pub original_language: Option<String>,
    /// Restrict by release region (e.g. `US`)
    pub region: Option<String>,
    /// Ordering key (e.g. `popularity.desc`)
    pub sort_by: Option<String>,
}

impl DiscoverFilter {
    pub fn language(code: impl Into<String>) -> Self {
        Self {
            original_language: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn region(code: impl Into<String>) -> Self {
        Self {
            region: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_parsing() {
        assert_eq!(ReleaseYear::from_date(Some("1999-03-30")), ReleaseYear::Known(1999));
        assert_eq!(ReleaseYear::from_date(Some("2021")), ReleaseYear::Known(2021));
        assert_eq!(ReleaseYear::from_date(Some("")), ReleaseYear::Unknown);
        assert_eq!(ReleaseYear::from_date(Some("n/a")), ReleaseYear::Unknown);
        assert_eq!(ReleaseYear::from_date(Some("99-01-01")), ReleaseYear::Unknown);
        assert_eq!(ReleaseYear::from_date(None), ReleaseYear::Unknown);
        assert_eq!(ReleaseYear::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_kind_inference_prefers_explicit_tag() {
        assert_eq!(MediaKind::infer(Some("movie"), Some("2008-01-20")), MediaKind::Movie);
        assert_eq!(MediaKind::infer(Some("tv"), None), MediaKind::Series);
        assert_eq!(MediaKind::infer(None, Some("2008-01-20")), MediaKind::Series);
        assert_eq!(MediaKind::infer(None, None), MediaKind::Movie);
        assert_eq!(MediaKind::infer(Some("collection"), Some("2001-01-01")), MediaKind::Series);
    }

    #[test]
    fn test_kind_parsing_and_title_guard() {
        assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert_eq!("Movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert!("album".parse::<MediaKind>().is_err());
        assert!(MediaKind::Person.require_title().is_err());
        assert_eq!(MediaKind::Series.require_title().unwrap(), MediaKind::Series);
    }

    #[test]
    fn test_select_trailer_requires_type_and_site() {
        let videos = vec![
            Video {
                key: "teaser".to_string(),
                name: "Teaser".to_string(),
                site: "YouTube".to_string(),
                video_type: "Teaser".to_string(),
            },
            Video {
                key: "vimeo-trailer".to_string(),
                name: "Trailer".to_string(),
                site: "Vimeo".to_string(),
                video_type: "Trailer".to_string(),
            },
            Video {
                key: "yt-trailer".to_string(),
                name: "Official Trailer".to_string(),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
            },
        ];

        assert_eq!(select_trailer(&videos).map(|v| v.key.as_str()), Some("yt-trailer"));
        assert!(select_trailer(&videos[..2]).is_none());
    }

    #[test]
    fn test_release_year_serializes_unknown_as_string() {
        let known = serde_json::to_value(ReleaseYear::Known(2010)).unwrap();
        let unknown = serde_json::to_value(ReleaseYear::Unknown).unwrap();
        assert_eq!(known, serde_json::json!(2010));
        assert_eq!(unknown, serde_json::json!("unknown"));
    }
}
