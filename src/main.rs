//! reelcat - browse a movie/TV streaming catalog from the terminal
//!
//! # Usage
//!
//! ```bash
//! reelcat list
//! reelcat search "sample" --json
//! reelcat info 12
//! reelcat play 7 --season 1 --episode 2
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reelcat::api::CatalogClient;
use reelcat::cli::{Cli, Command, ExitCode, Output};
use reelcat::commands;
use reelcat::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

/// Log to stderr so stdout stays parseable; RUST_LOG wins unless --verbose
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("reelcat=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reelcat=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config = match cli.config.as_deref() {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => return output.error(format!("{:#}", e), ExitCode::InvalidArgs),
        },
        None => Config::load(),
    };
    let config = cli.apply_overrides(config.with_env());
    tracing::debug!(api_url = config.api_url(), "Using catalog");

    let client = CatalogClient::new(config.catalog_config());

    match cli.command {
        Command::List(cmd) => commands::list_cmd(cmd, &client, &output).await,
        Command::Search(cmd) => commands::search_cmd(cmd, &client, &output).await,
        Command::Info(cmd) => commands::info_cmd(cmd, &client, &output).await,
        Command::Play(cmd) => commands::play_cmd(cmd, &client, &config, &output).await,
        Command::Config(cmd) => commands::config_cmd(cmd, &config, &output),
    }
}
