//! Stream resolution
//!
//! Turns a media record and a selector (quality for movies, season and
//! episode for series) into one playable URL, or a precise not-found outcome.
//! Also answers previous/next episode queries for navigation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{MediaKind, MediaRecord, QualityLinks, Season};

/// Resolution outcomes the display layer reports distinctly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Quality {quality} not available")]
    QualityNotAvailable { quality: String },

    #[error("Not available for streaming")]
    NotStreamable,

    #[error("Season {season} not found")]
    SeasonNotFound { season: String },

    #[error("Episode {episode} not found in Season {season}")]
    EpisodeNotFound { season: String, episode: String },
}

impl ResolveError {
    fn season_not_found(season: impl fmt::Display) -> Self {
        ResolveError::SeasonNotFound {
            season: season.to_string(),
        }
    }

    fn episode_not_found(season: impl fmt::Display, episode: impl fmt::Display) -> Self {
        ResolveError::EpisodeNotFound {
            season: season.to_string(),
            episode: episode.to_string(),
        }
    }
}

// =============================================================================
// Selectors
// =============================================================================

/// Which playable resource the caller wants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Selector {
    /// Movie quality; `None` picks the first declared quality
    Movie { quality: Option<String> },
    /// Series episode by season and episode number
    Episode { season: u32, episode: u32 },
}

impl Selector {
    /// Movie selector; an empty or blank label counts as unspecified
    pub fn movie(quality: Option<&str>) -> Self {
        let quality = quality
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        Selector::Movie { quality }
    }

    pub fn episode(season: u32, episode: u32) -> Self {
        Selector::Episode { season, episode }
    }

    /// Parse season/episode numbers from user-facing text
    ///
    /// Fails closed: anything that is not a positive integer resolves to the
    /// matching not-found outcome.
    pub fn episode_from_text(season: &str, episode: &str) -> Result<Self, ResolveError> {
        let season_no = parse_positive(season).ok_or_else(|| ResolveError::season_not_found(season.trim()))?;
        let episode_no = parse_positive(episode)
            .ok_or_else(|| ResolveError::episode_not_found(season_no, episode.trim()))?;
        Ok(Selector::episode(season_no, episode_no))
    }
}

fn parse_positive(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// A season/episode coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeRef {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl fmt::Display for EpisodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}E{}", self.season, self.episode)
    }
}

// =============================================================================
// Resolution Results
// =============================================================================

/// What the playback surface needs: a direct URL and a display title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStream {
    pub url: String,
    pub title: String,
    /// Selected quality label (movies only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Every quality the movie offers, for in-player switching
    #[serde(skip_serializing_if = "QualityLinks::is_empty")]
    pub qualities: QualityLinks,
    /// Resolved episode (series only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRef>,
}

/// Adjacent episodes around the one being played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub previous: Option<EpisodeRef>,
    pub next: Option<EpisodeRef>,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves selectors against a media record
///
/// With `strict_navigation`, adjacency is checked against the actual episode
/// list; otherwise the season's declared episode count is trusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamResolver {
    strict_navigation: bool,
}

impl StreamResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver whose navigation never links to a missing episode
    pub fn strict() -> Self {
        Self {
            strict_navigation: true,
        }
    }

    pub fn with_strict_navigation(mut self, strict: bool) -> Self {
        self.strict_navigation = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict_navigation
    }

    /// Resolve any selector
    pub fn resolve(&self, record: &MediaRecord, selector: &Selector) -> Result<ResolvedStream, ResolveError> {
        let result = match selector {
            Selector::Movie { quality } => self.resolve_movie(record, quality.as_deref()),
            Selector::Episode { season, episode } => self.resolve_episode(record, *season, *episode),
        };

        match &result {
            Ok(stream) => tracing::debug!(id = record.id, title = %stream.title, "Resolved stream"),
            Err(e) => tracing::debug!(id = record.id, error = %e, "Stream not resolved"),
        }
        result
    }

    /// Resolve a movie quality (first declared quality when unspecified)
    pub fn resolve_movie(&self, record: &MediaRecord, quality: Option<&str>) -> Result<ResolvedStream, ResolveError> {
        if record.kind != MediaKind::Movie {
            return Err(ResolveError::NotStreamable);
        }
        let links = record
            .video_links
            .as_ref()
            .filter(|links| !links.is_empty())
            .ok_or(ResolveError::NotStreamable)?;

        let label = match quality.map(str::trim).filter(|q| !q.is_empty()) {
            Some(label) => label,
            None => links
                .first()
                .map(|l| l.label.as_str())
                .ok_or(ResolveError::NotStreamable)?,
        };

        let url = links
            .get(label)
            .ok_or_else(|| ResolveError::QualityNotAvailable {
                quality: label.to_string(),
            })?;

        Ok(ResolvedStream {
            url: url.to_string(),
            title: format!("{} ({})", record.title, label.to_uppercase()),
            quality: Some(label.to_string()),
            qualities: links.clone(),
            episode: None,
        })
    }

    /// Resolve a series episode by season number and episode number
    pub fn resolve_episode(&self, record: &MediaRecord, season: u32, episode: u32) -> Result<ResolvedStream, ResolveError> {
        let found = self.season(record, season)?;
        let entry = found
            .episode(episode)
            .ok_or_else(|| ResolveError::episode_not_found(season, episode))?;

        Ok(ResolvedStream {
            url: entry.video_url.clone(),
            title: format!("{} - S{}E{}", record.title, season, episode),
            quality: None,
            qualities: QualityLinks::new(),
            episode: Some(EpisodeRef::new(season, episode)),
        })
    }

    fn season<'a>(&self, record: &'a MediaRecord, season: u32) -> Result<&'a Season, ResolveError> {
        if record.kind != MediaKind::Series {
            return Err(ResolveError::NotStreamable);
        }
        let seasons = record.seasons.as_ref().ok_or(ResolveError::NotStreamable)?;
        seasons
            .get(season)
            .ok_or_else(|| ResolveError::season_not_found(season))
    }

    // -------------------------------------------------------------------------
    // Adjacency
    // -------------------------------------------------------------------------

    /// Previous episode number, defined whenever `episode > 1`
    ///
    /// Does not check that the previous episode exists.
    pub fn previous(&self, at: EpisodeRef) -> Option<EpisodeRef> {
        (at.episode > 1).then(|| EpisodeRef::new(at.season, at.episode - 1))
    }

    /// Next episode number, defined while `episode < total_episodes`
    ///
    /// Trusts the season's declared count; `None` when the season is missing.
    pub fn next(&self, record: &MediaRecord, at: EpisodeRef) -> Option<EpisodeRef> {
        let season = record.season(at.season)?;
        (at.episode < season.total_episodes).then(|| EpisodeRef::new(at.season, at.episode + 1))
    }

    /// `previous`, but an in-range episode missing from the list is an error
    pub fn checked_previous(&self, record: &MediaRecord, at: EpisodeRef) -> Result<Option<EpisodeRef>, ResolveError> {
        let season = self.season(record, at.season)?;
        self.previous(at).map(|prev| ensure_listed(season, prev)).transpose()
    }

    /// `next`, but an in-range episode missing from the list is an error
    pub fn checked_next(&self, record: &MediaRecord, at: EpisodeRef) -> Result<Option<EpisodeRef>, ResolveError> {
        let season = self.season(record, at.season)?;
        self.next(record, at).map(|next| ensure_listed(season, next)).transpose()
    }

    /// Previous/next links for the episode being played
    ///
    /// In strict mode a link to a missing episode is dropped instead of shown.
    pub fn navigation(&self, record: &MediaRecord, at: EpisodeRef) -> Navigation {
        if self.strict_navigation {
            Navigation {
                previous: self.checked_previous(record, at).ok().flatten(),
                next: self.checked_next(record, at).ok().flatten(),
            }
        } else {
            Navigation {
                previous: self.previous(at),
                next: self.next(record, at),
            }
        }
    }
}

fn ensure_listed(season: &Season, at: EpisodeRef) -> Result<EpisodeRef, ResolveError> {
    match season.episode(at.episode) {
        Some(_) => Ok(at),
        None => Err(ResolveError::episode_not_found(at.season, at.episode)),
    }
}
