mod config;
mod github;
mod pulls;
mod report;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

use crate::github::{GithubClient, HttpFetch};
use crate::report::OutputFormat;

/// Merged PRs: lists the pull requests a GitHub user opened that have since
/// been merged. Only the user's recent public activity is visible to the API.
#[derive(Parser, Debug)]
#[command(name = "merged-prs", version, about)]
struct Cli {
    /// GitHub username (e.g., octocat)
    username: String,

    /// Optional output file path (markdown, or JSON with --json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the refetched pull requests as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;
    debug!(api_url = %config.github.api_url, user_agent = %config.github.user_agent, "loaded configuration");

    let client: Arc<dyn HttpFetch> = Arc::new(GithubClient::new(config.github.user_agent.clone()));

    info!("fetching merged pull requests");
    let merged = pulls::get_merged_pull_requests(client, &config.github.api_url, &cli.username)
        .instrument(info_span!("merged_prs", username = %cli.username))
        .await?;
    info!(merged = merged.len(), "fetched merged pull requests");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let built_report = report::build(&cli.username, merged);
    report::output(&built_report, format, cli.output.as_deref())?;
    info!(%format, "done");

    Ok(())
}
