//! Streaming infrastructure
//!
//! - Resolver: selector to playable URL, plus episode navigation
//! - Player: hands a resolved stream to VLC or mpv

pub mod player;
pub mod resolver;

pub use player::{LocalPlayer, PlayerType};
pub use resolver::{EpisodeRef, Navigation, ResolveError, ResolvedStream, Selector, StreamResolver};
