//! Local Player - VLC/mpv playback support
//!
//! Hands a resolved stream URL and display title to VLC or mpv.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};

use super::resolver::ResolvedStream;

/// Supported local players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerType {
    /// VLC media player (default)
    #[default]
    Vlc,
    /// mpv media player
    Mpv,
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle - check for it
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Mpv => "mpv",
        }
    }

    /// Get a display name for this player
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Nothing to play: empty stream URL")]
    EmptyUrl,
}

/// Local player for streaming content
pub struct LocalPlayer {
    player_type: PlayerType,
}

impl LocalPlayer {
    /// Create a new local player with the specified type
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    /// Create a VLC player
    pub fn vlc() -> Self {
        Self::new(PlayerType::Vlc)
    }

    /// Create an mpv player
    pub fn mpv() -> Self {
        Self::new(PlayerType::Mpv)
    }

    /// Get the player type
    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        let cmd = self.player_type.command();

        // If it's a full path (macOS app bundle), check if it exists
        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        // Otherwise use 'which' to find in PATH
        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Open a resolved stream in the player
    ///
    /// The player gets the direct URL and the display title; it owns
    /// controls from there.
    pub async fn play(&self, stream: &ResolvedStream) -> Result<Child, PlayerError> {
        if stream.url.trim().is_empty() {
            return Err(PlayerError::EmptyUrl);
        }

        let mut cmd = Command::new(self.player_type.command());
        cmd.args(self.args(stream));

        // Don't capture output - let it display normally
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        tracing::debug!(player = %self.player_type, url = %stream.url, "Starting local player");

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.player_type.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })
    }

    /// Command-line arguments for a stream
    pub fn args(&self, stream: &ResolvedStream) -> Vec<String> {
        match self.player_type {
            PlayerType::Vlc => vec![
                stream.url.clone(),
                format!("--meta-title={}", stream.title),
                "--no-video-title-show".to_string(),
            ],
            PlayerType::Mpv => vec![
                stream.url.clone(),
                format!("--force-media-title={}", stream.title),
                "--force-window=immediate".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_command() {
        // On macOS with VLC installed, returns full path; otherwise "vlc"
        let vlc_cmd = PlayerType::Vlc.command();
        assert!(vlc_cmd == "vlc" || vlc_cmd == "/Applications/VLC.app/Contents/MacOS/VLC");
        assert_eq!(PlayerType::Mpv.command(), "mpv");
    }

    #[test]
    fn test_player_type_display() {
        assert_eq!(PlayerType::Vlc.to_string(), "VLC");
        assert_eq!(PlayerType::Mpv.to_string(), "mpv");
    }

    #[test]
    fn test_default_player() {
        assert_eq!(PlayerType::default(), PlayerType::Vlc);
    }

    fn stream(url: &str) -> ResolvedStream {
        ResolvedStream {
            url: url.to_string(),
            title: "Sample Series - S1E2".to_string(),
            quality: None,
            qualities: Default::default(),
            episode: None,
        }
    }

    #[test]
    fn test_player_args_carry_title() {
        let args = LocalPlayer::mpv().args(&stream("https://cdn.example/s1e2.mp4"));
        assert_eq!(args[0], "https://cdn.example/s1e2.mp4");
        assert!(args.contains(&"--force-media-title=Sample Series - S1E2".to_string()));

        let args = LocalPlayer::vlc().args(&stream("https://cdn.example/s1e2.mp4"));
        assert!(args.contains(&"--meta-title=Sample Series - S1E2".to_string()));
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let result = LocalPlayer::mpv().play(&stream("  ")).await;
        assert!(matches!(result, Err(PlayerError::EmptyUrl)));
    }
}
