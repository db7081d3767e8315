//! Data structures for the reelcat catalog
//!
//! Mirrors the wire format served by the catalog service:
//! - **Records**: movies and series with descriptive metadata
//! - **Qualities**: ordered quality label to URL map for movies
//! - **Seasons**: season map for series, keyed by number after decoding

use chrono::{Datelike, NaiveDate};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Media Records
// =============================================================================

/// Kind discriminator, serialized as the service's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "Movie"),
            MediaKind::Series => write!(f, "TV Series"),
        }
    }
}

/// External cross-reference id, kept opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Number(n) => write!(f, "{}", n),
            ExternalId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One entry in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub poster_url: String,
    /// Raw `YYYY-MM-DD` string as sent by the service
    #[serde(default, deserialize_with = "string_or_absent")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(default)]
    pub tmdb_id: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_links: Option<QualityLinks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<SeasonMap>,
}

impl MediaRecord {
    pub fn is_movie(&self) -> bool {
        self.kind == MediaKind::Movie
    }

    pub fn is_series(&self) -> bool {
        self.kind == MediaKind::Series
    }

    /// Release date as a calendar date, if the service sent a valid one
    pub fn release_day(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_day().map(|d| d.year())
    }

    /// Season by number (series only)
    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.as_ref().and_then(|s| s.get(number))
    }
}

impl fmt::Display for MediaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self
            .release_year()
            .map(|y| format!(" ({})", y))
            .unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.kind)
    }
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep a value only when it is a JSON string; anything else decodes to `None`
fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

// =============================================================================
// Quality Links (movies)
// =============================================================================

/// A single encoded variant of a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityLink {
    pub label: String,
    pub url: String,
}

/// Quality label to URL map, in the order the service declared it
///
/// Labels are unique; a payload that repeats a label fails to decode.
/// Labels whose URL is `null` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityLinks {
    links: Vec<QualityLink>,
}

impl QualityLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, replacing the URL in place if it already exists
    pub fn insert(&mut self, label: impl Into<String>, url: impl Into<String>) {
        let label = label.into();
        let url = url.into();
        match self.links.iter_mut().find(|l| l.label == label) {
            Some(existing) => existing.url = url,
            None => self.links.push(QualityLink { label, url }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.label == label)
            .map(|l| l.url.as_str())
    }

    /// First declared quality
    pub fn first(&self) -> Option<&QualityLink> {
        self.links.first()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QualityLink> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<L: Into<String>, U: Into<String>> FromIterator<(L, U)> for QualityLinks {
    fn from_iter<I: IntoIterator<Item = (L, U)>>(iter: I) -> Self {
        let mut links = QualityLinks::new();
        for (label, url) in iter {
            links.insert(label, url);
        }
        links
    }
}

impl<'a> IntoIterator for &'a QualityLinks {
    type Item = &'a QualityLink;
    type IntoIter = std::slice::Iter<'a, QualityLink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

impl Serialize for QualityLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.links.len()))?;
        for link in &self.links {
            map.serialize_entry(&link.label, &link.url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QualityLinks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinksVisitor;

        impl<'de> Visitor<'de> for LinksVisitor {
            type Value = QualityLinks;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of quality labels to URLs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut links: Vec<QualityLink> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, url)) = access.next_entry::<String, Option<String>>()? {
                    if links.iter().any(|l| l.label == label) {
                        return Err(de::Error::custom(format!(
                            "duplicate quality label `{}`",
                            label
                        )));
                    }
                    if let Some(url) = url {
                        links.push(QualityLink { label, url });
                    }
                }
                Ok(QualityLinks { links })
            }
        }

        deserializer.deserialize_map(LinksVisitor)
    }
}

// =============================================================================
// Seasons (series)
// =============================================================================

/// TV episode with its direct media URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: u32,
    #[serde(rename = "video_720p", default, deserialize_with = "null_as_default")]
    pub video_url: String,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ep {}", self.episode_number)
    }
}

/// One season of a series
///
/// `total_episodes` is the service's declared count and may disagree with
/// `episodes.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_episodes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: Vec<Episode>,
}

impl Season {
    /// Find an episode by its number (not its position)
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.episode_number == number)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {} ({} episodes)",
            self.season_number, self.total_episodes
        )
    }
}

/// Wire key for a season number
pub fn season_key(number: u32) -> String {
    format!("season_{}", number)
}

fn parse_season_key(key: &str) -> Option<u32> {
    key.strip_prefix("season_")?.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SeasonEntry {
    key: String,
    number: u32,
    season: Season,
}

/// Season number to season map
///
/// Built from the wire's `season_<N>` keys when decoding. Keys that do not
/// follow the pattern fall back to the season's own `season_number`. The
/// original key is kept so the map serializes back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonMap {
    entries: Vec<SeasonEntry>,
}

impl SeasonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a season under its canonical key, replacing any existing one
    pub fn insert(&mut self, season: Season) {
        let number = season.season_number;
        match self.entries.iter_mut().find(|e| e.number == number) {
            Some(entry) => entry.season = season,
            None => self.entries.push(SeasonEntry {
                key: season_key(number),
                number,
                season,
            }),
        }
    }

    pub fn get(&self, number: u32) -> Option<&Season> {
        self.entries
            .iter()
            .find(|e| e.number == number)
            .map(|e| &e.season)
    }

    /// Seasons with their resolved numbers, in wire order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Season)> {
        self.entries.iter().map(|e| (e.number, &e.season))
    }

    /// Wire keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Season> for SeasonMap {
    fn from_iter<I: IntoIterator<Item = Season>>(iter: I) -> Self {
        let mut map = SeasonMap::new();
        for season in iter {
            map.insert(season);
        }
        map
    }
}

impl Serialize for SeasonMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.season)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SeasonMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeasonsVisitor;

        impl<'de> Visitor<'de> for SeasonsVisitor {
            type Value = SeasonMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of season keys to seasons")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<SeasonEntry> = Vec::new();
                while let Some((key, season)) = access.next_entry::<String, Season>()? {
                    let number = parse_season_key(&key).unwrap_or(season.season_number);
                    if entries.iter().any(|e| e.number == number) {
                        return Err(de::Error::custom(format!(
                            "season {} declared more than once (key `{}`)",
                            number, key
                        )));
                    }
                    entries.push(SeasonEntry {
                        key,
                        number,
                        season,
                    });
                }
                Ok(SeasonMap { entries })
            }
        }

        deserializer.deserialize_map(SeasonsVisitor)
    }
}

// =============================================================================
// Catalog Summary
// =============================================================================

/// Per-kind counts for a listing header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub movies: usize,
    pub series: usize,
}

impl CatalogStats {
    pub fn from_records(records: &[MediaRecord]) -> Self {
        let movies = records.iter().filter(|r| r.is_movie()).count();
        Self {
            total: records.len(),
            movies,
            series: records.len() - movies,
        }
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items (Movies: {} | TV Shows: {})",
            self.total, self.movies, self.series
        )
    }
}
