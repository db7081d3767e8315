//! CLI - Command Line Interface for reelcat
//!
//! Every catalog screen is a subcommand. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse and search
//! reelcat list --type movie
//! reelcat search "sample" --json
//!
//! # Details and playback
//! reelcat info 12
//! reelcat play 12 --quality 1080p
//! reelcat play 7 --season 1 --episode 2 --open mpv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::MediaKind;
use crate::stream::PlayerType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Catalog unreachable or returned garbage
    NetworkError = 3,
    /// Record, season, episode or quality not found
    NotFound = 4,
    /// Record has nothing playable
    NotStreamable = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// reelcat - browse a movie/TV streaming catalog
#[derive(Parser, Debug)]
#[command(
    name = "reelcat",
    version,
    about = "Browse a movie/TV streaming catalog and resolve playable streams",
    after_help = "EXAMPLES:\n\
                  reelcat list                          Latest movies & TV series\n\
                  reelcat search \"sample\"               Search the catalog\n\
                  reelcat info 12                       Qualities, seasons, episodes\n\
                  reelcat play 7 -s 1 -e 2 --open mpv   Play an episode locally"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log requests and resolution details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Catalog base URL (overrides config and REELCAT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }

    /// Apply command-line overrides on top of a loaded config
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }
        config
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the catalog, newest first
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show details for a movie or series
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Resolve a playable stream URL
    #[command(visible_alias = "p")]
    Play(PlayCmd),

    /// Show the effective configuration
    Config(ConfigCmd),
}

/// Media type filter for listings
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

impl MediaTypeFilter {
    pub fn matches(&self, kind: MediaKind) -> bool {
        match self {
            MediaTypeFilter::Movie => kind == MediaKind::Movie,
            MediaTypeFilter::Tv => kind == MediaKind::Series,
        }
    }
}

/// List the whole catalog
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Filter by media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,

    /// Maximum number of results
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Filter by media type
    #[arg(long = "type", short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Show details for one record
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Catalog id
    #[arg(required = true)]
    pub id: String,
}

/// Resolve a stream for a movie quality or a series episode
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Catalog id
    #[arg(required = true)]
    pub id: String,

    /// Movie quality label (default: first available)
    #[arg(long, short = 'Q')]
    pub quality: Option<String>,

    /// Season number (series)
    #[arg(long, short = 's', requires = "episode")]
    pub season: Option<String>,

    /// Episode number (series)
    #[arg(long, short = 'e', requires = "season")]
    pub episode: Option<String>,

    /// Only link to previous/next episodes that exist
    #[arg(long)]
    pub strict: bool,

    /// Open the stream in a local player
    #[arg(long, value_enum)]
    pub open: Option<PlayerChoice>,
}

impl PlayCmd {
    pub fn is_episode(&self) -> bool {
        self.season.is_some() || self.episode.is_some()
    }
}

/// Local player selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    /// VLC media player (default)
    #[default]
    Vlc,
    /// mpv media player
    Mpv,
}

impl From<PlayerChoice> for PlayerType {
    fn from(choice: PlayerChoice) -> Self {
        match choice {
            PlayerChoice::Vlc => PlayerType::Vlc,
            PlayerChoice::Mpv => PlayerType::Mpv,
        }
    }
}

/// Show the effective configuration
#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Write the effective configuration to the default config file
    #[arg(long)]
    pub save: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print JSON when requested, otherwise the human-readable lines
    pub fn print_or_text<T: Serialize>(&self, data: T, lines: &[String]) -> anyhow::Result<()> {
        if self.json {
            return self.print(data);
        }
        for line in lines {
            println!("{}", line);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["reelcat"]).is_err());
    }

    #[test]
    fn test_list_command() {
        let cli = Cli::parse_from(["reelcat", "list", "--type", "tv", "-l", "5"]);
        if let Command::List(cmd) = cli.command {
            assert_eq!(cmd.media_type, Some(MediaTypeFilter::Tv));
            assert_eq!(cmd.limit, Some(5));
        } else {
            panic!("Expected List command");
        }
    }

    #[test]
    fn test_play_episode_requires_both_numbers() {
        assert!(Cli::try_parse_from(["reelcat", "play", "7", "-s", "1"]).is_err());
        let cli = Cli::parse_from(["reelcat", "play", "7", "-s", "1", "-e", "2", "--open", "mpv"]);
        if let Command::Play(cmd) = cli.command {
            assert!(cmd.is_episode());
            assert_eq!(cmd.season.as_deref(), Some("1"));
            assert_eq!(cmd.episode.as_deref(), Some("2"));
            assert_eq!(cmd.open, Some(PlayerChoice::Mpv));
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "reelcat",
            "--api-url",
            "http://localhost:5000",
            "--timeout",
            "3",
            "list",
        ]);
        let config = cli.apply_overrides(Config::default());
        assert_eq!(config.api_url(), "http://localhost:5000");
        assert_eq!(config.timeout_secs, Some(3));
    }

    #[test]
    fn test_media_type_filter() {
        assert!(MediaTypeFilter::Movie.matches(MediaKind::Movie));
        assert!(!MediaTypeFilter::Movie.matches(MediaKind::Series));
        assert!(MediaTypeFilter::Tv.matches(MediaKind::Series));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::NotStreamable), 5);
    }
}
