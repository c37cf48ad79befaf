use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use dotenv::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use github_user_repos_lib::{error_chain, AggregatorConfig, Args, GitHubAggregator, Query};

/// Exit code for a rejected query, mirroring a client error.
const EXIT_INVALID_QUERY: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    init_tracing(args.json_logs);

    // Blank queries never reach the aggregator
    let query = match Query::parse(&args.query) {
        Ok(query) => query,
        Err(e) => {
            error!("Rejected query: {}", e);
            eprintln!("{}", json!({ "message": e.to_string() }));
            return Ok(ExitCode::from(EXIT_INVALID_QUERY));
        }
    };

    let config = AggregatorConfig::with_api_base(&args.api_url)?
        .max_users(args.max_users)
        .max_repos(args.max_repos)
        .request_timeout(Duration::from_secs(args.timeout.get()));
    let aggregator = GitHubAggregator::new(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message(format!("Searching users for '{}'", query));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = aggregator.aggregate(&query).await;
    spinner.finish_and_clear();

    let users = match result {
        Ok(users) => users,
        Err(e) => {
            let message = error_chain(&e);
            error!("Search for '{}' failed: {}", query, message);
            eprintln!("{}", json!({ "status": e.status_code(), "message": message }));
            return Ok(ExitCode::FAILURE);
        }
    };

    let body = serde_json::to_string_pretty(&users)?;
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", body)).await?;
            info!("Saved {} users to '{}'", users.len(), path);
        }
        None => println!("{}", body),
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so stdout carries only the JSON result.
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
