//! End-to-end flow tests for reelcat
//!
//! Covers the user journey: list -> detail -> play, through both the library
//! (catalog client + resolver + view state) and the CLI command handlers.

use mockito::{Matcher, Server, ServerGuard};
use reelcat::api::CatalogClient;
use reelcat::app::ViewState;
use reelcat::cli::{ExitCode, InfoCmd, ListCmd, MediaTypeFilter, Output, PlayCmd, SearchCmd};
use reelcat::commands;
use reelcat::config::Config;
use reelcat::models::MediaRecord;
use reelcat::stream::{EpisodeRef, ResolveError, Selector, StreamResolver};

// =============================================================================
// Mock Response Fixtures
// =============================================================================

fn movie_json() -> &'static str {
    r#"{
        "id": 1,
        "type": "movie",
        "title": "Sample Movie",
        "description": "This is a sample movie.",
        "poster_url": "https://img.example/movie.jpg",
        "release_date": "2024-01-01",
        "language": "en",
        "tmdb_id": 1,
        "video_links": {
            "720p": "https://cdn.example/movie-720.mp4",
            "1080p": "https://cdn.example/movie-1080.mp4"
        }
    }"#
}

fn series_json() -> &'static str {
    r#"{
        "id": 2,
        "type": "tv",
        "title": "Sample TV Series",
        "description": "This is a sample TV series.",
        "poster_url": "https://img.example/series.jpg",
        "release_date": "2024-01-01",
        "language": "en",
        "tmdb_id": 2,
        "total_seasons": 1,
        "seasons": {
            "season_1": {
                "season_number": 1,
                "total_episodes": 3,
                "episodes": [
                    {"episode_number": 1, "video_720p": "https://cdn.example/s1e1.mp4"},
                    {"episode_number": 2, "video_720p": "https://cdn.example/s1e2.mp4"}
                ]
            }
        }
    }"#
}

async fn catalog_server() -> ServerGuard {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/media")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!("[{}, {}]", movie_json(), series_json()))
        .create_async()
        .await;
    server
        .mock("GET", "/media/1")
        .with_status(200)
        .with_body(movie_json())
        .create_async()
        .await;
    server
        .mock("GET", "/media/2")
        .with_status(200)
        .with_body(series_json())
        .create_async()
        .await;
    server
        .mock("GET", "/media/404")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), "sample".into()))
        .with_status(200)
        .with_body(format!("[{}]", series_json()))
        .create_async()
        .await;

    server
}

fn quiet_json() -> Output {
    Output {
        json: true,
        quiet: true,
    }
}

fn play(id: &str) -> PlayCmd {
    PlayCmd {
        id: id.to_string(),
        quality: None,
        season: None,
        episode: None,
        strict: false,
        open: None,
    }
}

// =============================================================================
// Library Flow
// =============================================================================

#[tokio::test]
async fn test_list_detail_play_movie() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());
    let resolver = StreamResolver::new();

    let listing = client.list_all().await;
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].id, 2);

    let movie = client.get_by_id(listing[1].id).await.expect("movie");
    let stream = resolver
        .resolve(&movie, &Selector::movie(Some("1080p")))
        .unwrap();
    assert_eq!(stream.url, "https://cdn.example/movie-1080.mp4");
    assert_eq!(stream.title, "Sample Movie (1080P)");

    // In-player quality switch uses the same quality map
    assert_eq!(stream.qualities.get("720p"), Some("https://cdn.example/movie-720.mp4"));

    assert_eq!(
        resolver.resolve(&movie, &Selector::movie(Some("4k"))),
        Err(ResolveError::QualityNotAvailable {
            quality: "4k".into()
        })
    );
}

#[tokio::test]
async fn test_search_detail_play_episode_with_navigation() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());

    let results = client.search("sample").await;
    assert_eq!(results.len(), 1);

    let series = client.get_by_id(results[0].id).await.expect("series");
    let selector = Selector::episode_from_text("1", "2").unwrap();

    let resolver = StreamResolver::new();
    let stream = resolver.resolve(&series, &selector).unwrap();
    assert_eq!(stream.url, "https://cdn.example/s1e2.mp4");
    assert_eq!(stream.title, "Sample TV Series - S1E2");

    // Declared count says 3 episodes, only 2 are listed
    let at = EpisodeRef::new(1, 2);
    let nav = resolver.navigation(&series, at);
    assert_eq!(nav.previous, Some(EpisodeRef::new(1, 1)));
    assert_eq!(nav.next, Some(EpisodeRef::new(1, 3)));
    assert!(resolver.resolve(&series, &Selector::episode(1, 3)).is_err());

    let strict = StreamResolver::strict().navigation(&series, at);
    assert_eq!(strict.next, None);
}

#[tokio::test]
async fn test_superseded_search_does_not_overwrite_newer_listing() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());

    let mut view: ViewState<Vec<MediaRecord>> = ViewState::default();
    let search_ticket = view.begin();
    let list_ticket = view.begin();
    let (search, list) = futures::join!(client.try_search("sample"), client.try_list_all());

    assert!(view.apply(list_ticket, list));
    assert!(!view.apply(search_ticket, search));
    assert_eq!(view.data.len(), 2);
}

#[tokio::test]
async fn test_view_reports_unreachable_catalog() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:1");
    let mut view: ViewState<Vec<MediaRecord>> = ViewState::default();

    assert!(view.load(client.try_list_all()).await);
    assert!(view.is_unavailable());
    assert!(!view.is_confirmed_empty());
}

// =============================================================================
// CLI Command Flow
// =============================================================================

#[tokio::test]
async fn test_list_cmd_succeeds() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());

    let cmd = ListCmd {
        media_type: Some(MediaTypeFilter::Movie),
        limit: Some(10),
    };
    assert_eq!(commands::list_cmd(cmd, &client, &quiet_json()).await, ExitCode::Success);
}

#[tokio::test]
async fn test_list_cmd_reports_network_error() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:1");
    let cmd = ListCmd {
        media_type: None,
        limit: None,
    };
    assert_eq!(
        commands::list_cmd(cmd, &client, &quiet_json()).await,
        ExitCode::NetworkError
    );
}

#[tokio::test]
async fn test_list_cmd_bad_payload_is_not_a_network_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/media")
        .with_status(200)
        .with_body(r#"{"error": "database offline"}"#)
        .create_async()
        .await;
    let client = CatalogClient::with_base_url(server.url());

    let cmd = ListCmd {
        media_type: None,
        limit: None,
    };
    assert_eq!(commands::list_cmd(cmd, &client, &quiet_json()).await, ExitCode::Error);
}

#[tokio::test]
async fn test_search_cmd_failure_codes() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    async fn search(client: &CatalogClient) -> ExitCode {
        let cmd = SearchCmd {
            query: "sample".into(),
            media_type: None,
            limit: 20,
        };
        commands::search_cmd(cmd, client, &quiet_json()).await
    }

    let client = CatalogClient::with_base_url(server.url());
    assert_eq!(search(&client).await, ExitCode::Error);

    let offline = CatalogClient::with_base_url("http://127.0.0.1:1");
    assert_eq!(search(&offline).await, ExitCode::NetworkError);
}

#[tokio::test]
async fn test_search_cmd_rejects_blank_query() {
    let client = CatalogClient::with_base_url("http://127.0.0.1:1");
    let cmd = SearchCmd {
        query: "   ".into(),
        media_type: None,
        limit: 20,
    };
    assert_eq!(
        commands::search_cmd(cmd, &client, &quiet_json()).await,
        ExitCode::InvalidArgs
    );
}

#[tokio::test]
async fn test_info_cmd_exit_codes() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());
    let output = quiet_json();

    let found = InfoCmd { id: "2".into() };
    assert_eq!(commands::info_cmd(found, &client, &output).await, ExitCode::Success);

    let missing = InfoCmd { id: "404".into() };
    assert_eq!(commands::info_cmd(missing, &client, &output).await, ExitCode::NotFound);
}

#[tokio::test]
async fn test_play_cmd_exit_codes() {
    let server = catalog_server().await;
    let client = CatalogClient::with_base_url(server.url());
    let config = Config::default();
    let output = quiet_json();

    // Movie, default quality
    assert_eq!(
        commands::play_cmd(play("1"), &client, &config, &output).await,
        ExitCode::Success
    );

    // Missing quality
    let cmd = PlayCmd {
        quality: Some("4k".into()),
        ..play("1")
    };
    assert_eq!(
        commands::play_cmd(cmd, &client, &config, &output).await,
        ExitCode::NotFound
    );

    // Episode
    let cmd = PlayCmd {
        season: Some("1".into()),
        episode: Some("1".into()),
        ..play("2")
    };
    assert_eq!(
        commands::play_cmd(cmd, &client, &config, &output).await,
        ExitCode::Success
    );

    // Unparseable episode text fails closed
    let cmd = PlayCmd {
        season: Some("1".into()),
        episode: Some("two".into()),
        ..play("2")
    };
    assert_eq!(
        commands::play_cmd(cmd, &client, &config, &output).await,
        ExitCode::NotFound
    );

    // Episode selector on a movie
    let cmd = PlayCmd {
        season: Some("1".into()),
        episode: Some("1".into()),
        ..play("1")
    };
    assert_eq!(
        commands::play_cmd(cmd, &client, &config, &output).await,
        ExitCode::NotStreamable
    );

    // Movie selector on a series
    assert_eq!(
        commands::play_cmd(play("2"), &client, &config, &output).await,
        ExitCode::NotStreamable
    );

    // Unknown id
    assert_eq!(
        commands::play_cmd(play("404"), &client, &config, &output).await,
        ExitCode::NotFound
    );
}
