//! reelcat - client for a movie/TV streaming catalog
//!
//! Fetches the catalog from a remote REST service, resolves playable stream
//! URLs for movie qualities and series episodes, and exposes both through a
//! scriptable CLI.
//!
//! # Modules
//!
//! - `models` - Media records, quality links, season maps
//! - `api` - Catalog service client
//! - `stream` - Stream resolver and local player
//! - `app` - View state with superseded-request protection
//! - `config` - Config file and environment overrides
//! - `cli` / `commands` - Command-line surface

pub mod models;
pub mod api;
pub mod stream;
pub mod app;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{
    CatalogStats, Episode, ExternalId, MediaKind, MediaRecord, QualityLink, QualityLinks, Season,
    SeasonMap,
};

pub use api::{CatalogClient, CatalogConfig, CatalogError};
pub use app::{LoadingState, Ticket, ViewState};
pub use config::Config;
pub use stream::{EpisodeRef, Navigation, ResolveError, ResolvedStream, Selector, StreamResolver};
