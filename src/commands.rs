//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the catalog client and the stream
//! resolver. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::{CatalogClient, CatalogError};
use crate::app::ViewState;
use crate::cli::{ConfigCmd, ExitCode, InfoCmd, ListCmd, Output, PlayCmd, SearchCmd};
use crate::config::Config;
use crate::models::{CatalogStats, MediaKind, MediaRecord};
use crate::stream::{
    EpisodeRef, LocalPlayer, Navigation, ResolveError, ResolvedStream, Selector, StreamResolver,
};

// =============================================================================
// List Command
// =============================================================================

#[derive(Debug, Serialize)]
struct ListResponse {
    stats: CatalogStats,
    items: Vec<MediaRecord>,
}

pub async fn list_cmd(cmd: ListCmd, client: &CatalogClient, output: &Output) -> ExitCode {
    output.info("Loading catalog...");

    let mut view: ViewState<Vec<MediaRecord>> = ViewState::default();
    view.load(client.try_list_all()).await;

    if let Some(err) = view.error() {
        return output.error(
            format!("{}. Retry with `reelcat list`.", failure_message("Listing", err)),
            failure_code(err),
        );
    }

    let stats = CatalogStats::from_records(&view.data);
    let mut items = view.data;
    if let Some(filter) = cmd.media_type {
        items.retain(|r| filter.matches(r.kind));
    }
    if let Some(limit) = cmd.limit {
        items.truncate(limit);
    }

    let mut lines = vec![format!("Latest Movies & TV Series - {}", stats)];
    if items.is_empty() {
        lines.push("No content found. The catalog appears to be empty.".to_string());
    }
    lines.extend(items.iter().map(summary_line));

    let response = ListResponse { stats, items };
    if let Err(e) = output.print_or_text(&response, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: &CatalogClient, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", query));

    let mut view: ViewState<Vec<MediaRecord>> = ViewState::default();
    view.load(client.try_search(query)).await;

    if let Some(err) = view.error() {
        return output.error(
            format!(
                "{}. Retry with `reelcat search \"{}\"`.",
                failure_message("Search", err),
                query
            ),
            failure_code(err),
        );
    }

    let mut results = view.data;
    if let Some(filter) = cmd.media_type {
        results.retain(|r| filter.matches(r.kind));
    }
    results.truncate(cmd.limit);

    let mut lines = vec![format!("Search results for \"{}\"", query)];
    if results.is_empty() {
        lines.push("No results found. Try a different title.".to_string());
    }
    lines.extend(results.iter().map(summary_line));

    if let Err(e) = output.print_or_text(&results, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, client: &CatalogClient, output: &Output) -> ExitCode {
    output.info(format!("Getting info for: {}", cmd.id));

    let record = match fetch_record(client, &cmd.id, output).await {
        Ok(record) => record,
        Err(code) => return code,
    };

    let lines = detail_lines(&record);
    if let Err(e) = output.print_or_text(&record, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

/// Human-readable detail page for one record
pub fn detail_lines(record: &MediaRecord) -> Vec<String> {
    let mut lines = vec![
        format!("{} [{}]", record.title, record.kind),
        format!(
            "Release: {}  Language: {}",
            record
                .release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".into()),
            record.language.to_uppercase()
        ),
    ];
    if let Some(total) = record.total_seasons {
        lines.push(format!("Total Seasons: {}", total));
    }
    if !record.description.is_empty() {
        lines.push(String::new());
        lines.push(record.description.clone());
    }

    if let Some(links) = record.video_links.as_ref().filter(|l| !l.is_empty()) {
        lines.push(String::new());
        lines.push("Available Qualities:".to_string());
        for link in links {
            lines.push(format!(
                "  {:<6} reelcat play {} -Q {}",
                link.label.to_uppercase(),
                record.id,
                link.label
            ));
        }
        lines.push("Download Links:".to_string());
        for link in links {
            lines.push(format!("  {:<6} {}", link.label.to_uppercase(), link.url));
        }
    }

    if let Some(seasons) = record.seasons.as_ref() {
        for (number, season) in seasons.iter() {
            lines.push(String::new());
            lines.push(format!("{}:", season));
            let episodes: Vec<String> = season
                .episodes
                .iter()
                .map(|e| e.to_string())
                .collect();
            lines.push(format!("  {}", episodes.join("  ")));
            if let Some(first) = season.episodes.first() {
                lines.push(format!(
                    "  reelcat play {} -s {} -e {}",
                    record.id, number, first.episode_number
                ));
            }
        }
    }
    lines
}

// =============================================================================
// Play Command
// =============================================================================

#[derive(Debug, Serialize)]
struct PlayResponse {
    id: u64,
    #[serde(flatten)]
    stream: ResolvedStream,
    #[serde(skip_serializing_if = "Option::is_none")]
    navigation: Option<Navigation>,
}

pub async fn play_cmd(cmd: PlayCmd, client: &CatalogClient, config: &Config, output: &Output) -> ExitCode {
    let record = match fetch_record(client, &cmd.id, output).await {
        Ok(record) => record,
        Err(code) => return code,
    };

    let (expected, selector) = if cmd.is_episode() {
        let season = cmd.season.as_deref().unwrap_or_default();
        let episode = cmd.episode.as_deref().unwrap_or_default();
        match Selector::episode_from_text(season, episode) {
            Ok(selector) => (MediaKind::Series, selector),
            Err(e) => return resolve_error(&record, MediaKind::Series, e, output),
        }
    } else {
        (MediaKind::Movie, Selector::movie(cmd.quality.as_deref()))
    };

    let resolver = StreamResolver::new().with_strict_navigation(cmd.strict || config.strict_navigation());
    let stream = match resolver.resolve(&record, &selector) {
        Ok(stream) => stream,
        Err(e) => return resolve_error(&record, expected, e, output),
    };

    let navigation = stream.episode.map(|at| resolver.navigation(&record, at));

    let mut lines = vec![stream.title.clone(), stream.url.clone()];
    if stream.qualities.len() > 1 {
        let labels: Vec<String> = stream.qualities.labels().map(str::to_uppercase).collect();
        lines.push(format!("Available Qualities: {}", labels.join(", ")));
    }
    if let Some(nav) = navigation {
        lines.extend(navigation_lines(record.id, nav));
    }

    if let Some(choice) = cmd.open {
        let player = LocalPlayer::new(choice.into());
        if !player.is_available().await {
            return output.error(
                format!("{} not found. Install it or drop --open.", player.player_type()),
                ExitCode::Error,
            );
        }
        output.info(format!("Opening in {}...", player.player_type()));
        if let Err(e) = player.play(&stream).await {
            return output.error(format!("Failed to start player: {}", e), ExitCode::Error);
        }
    }

    let response = PlayResponse {
        id: record.id,
        stream,
        navigation,
    };
    if let Err(e) = output.print_or_text(&response, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

fn navigation_lines(id: u64, nav: Navigation) -> Vec<String> {
    let link = |label: &str, at: EpisodeRef| {
        format!(
            "{}: {} (reelcat play {} -s {} -e {})",
            label, at, id, at.season, at.episode
        )
    };
    nav.previous
        .map(|at| link("Previous Episode", at))
        .into_iter()
        .chain(nav.next.map(|at| link("Next Episode", at)))
        .collect()
}

/// Report a resolution failure with a link back to the detail page
///
/// `expected` is the kind the request was for (movie quality or episode).
fn resolve_error(record: &MediaRecord, expected: MediaKind, err: ResolveError, output: &Output) -> ExitCode {
    let msg = match (&err, expected) {
        (ResolveError::NotStreamable, MediaKind::Movie) if record.kind != expected => {
            "This content is not a movie".to_string()
        }
        (ResolveError::NotStreamable, MediaKind::Series) if record.kind != expected => {
            "This content is not a TV series".to_string()
        }
        (ResolveError::NotStreamable, _) => "Not found or not available for streaming".to_string(),
        _ => err.to_string(),
    };

    let code = match err {
        ResolveError::NotStreamable => ExitCode::NotStreamable,
        _ => ExitCode::NotFound,
    };
    output.error(
        format!("{}. Back to details: `reelcat info {}`", msg, record.id),
        code,
    )
}

// =============================================================================
// Config Command
// =============================================================================

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    api_url: String,
    timeout_secs: u64,
    sort_newest_first: bool,
    strict_navigation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

pub fn config_cmd(cmd: ConfigCmd, config: &Config, output: &Output) -> ExitCode {
    let catalog = config.catalog_config();
    let effective = EffectiveConfig {
        api_url: catalog.base_url.clone(),
        timeout_secs: catalog.timeout.as_secs(),
        sort_newest_first: catalog.sort_newest_first,
        strict_navigation: config.strict_navigation(),
        path: Config::path().map(|p| p.display().to_string()),
    };

    if cmd.save {
        if let Err(e) = config.save() {
            return output.error(format!("Failed to save config: {:#}", e), ExitCode::Error);
        }
        output.info("Configuration saved");
    }

    let lines = vec![
        format!("api_url           = {}", effective.api_url),
        format!("timeout_secs      = {}", effective.timeout_secs),
        format!("sort_newest_first = {}", effective.sort_newest_first),
        format!("strict_navigation = {}", effective.strict_navigation),
    ];
    if let Err(e) = output.print_or_text(&effective, &lines) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch one record, mapping absence and failures to exit codes
async fn fetch_record(client: &CatalogClient, id: &str, output: &Output) -> Result<MediaRecord, ExitCode> {
    if id.trim().is_empty() {
        return Err(output.error("Media id is empty", ExitCode::InvalidArgs));
    }

    match client.try_get_by_id(id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(output.error(format!("Media {} not found", id.trim()), ExitCode::NotFound)),
        Err(e) => {
            let subject = format!("Loading media {}", id.trim());
            Err(output.error(failure_message(&subject, &e), failure_code(&e)))
        }
    }
}

/// Unreachable catalog is a network error; a reachable catalog with a bad payload is not
fn failure_code(err: &CatalogError) -> ExitCode {
    if err.is_unreachable() {
        ExitCode::NetworkError
    } else {
        ExitCode::Error
    }
}

fn failure_message(subject: &str, err: &CatalogError) -> String {
    if err.is_unreachable() {
        format!("{} failed: the catalog is unreachable ({})", subject, err)
    } else {
        format!("{} failed: the catalog sent an unreadable response ({})", subject, err)
    }
}

fn summary_line(record: &MediaRecord) -> String {
    format!("{:>6}  {}", record.id, record)
}
