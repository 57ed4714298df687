mod score;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vtscout_core::Platform;

#[derive(Debug, Parser)]
#[command(name = "vtscout-cli")]
#[command(about = "Find virtual performers on Twitch and YouTube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every configured platform for a performer name.
    Search {
        name: String,
        /// Only search this platform (twitch or youtube).
        #[arg(long)]
        platform: Option<Platform>,
        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Score a hand-written channel record without any network access.
    Score {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value = "twitch")]
        platform: Platform,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vtscout_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var("RUST_LOG").ok(),
            &config.log_level,
        )?)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            name,
            platform,
            compact,
        } => search::run_search(&config, &name, platform, compact).await?,
        Commands::Score {
            name,
            title,
            description,
            tags,
            platform,
        } => score::run_score(
            score::ScoreInput {
                name,
                title,
                description,
                tags,
            },
            platform,
        )?,
    }

    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn log_filter(rust_log: Option<String>, configured: &str) -> anyhow::Result<EnvFilter> {
    match rust_log.map(EnvFilter::try_new) {
        Some(Ok(filter)) => Ok(filter),
        _ => Ok(EnvFilter::try_new(configured)?),
    }
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
