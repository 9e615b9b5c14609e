use std::sync::Arc;

use clap::{Parser, Subcommand};
use recommendations_admin::{
    cache::QueryCache,
    config::Config,
    models::RecommendationId,
    services::HttpRecommendationsClient,
    view::{ListFeatures, RecommendationsList, Tab},
};
use tracing_subscriber::EnvFilter;

/// Moderate user-submitted recommendations
#[derive(Parser)]
#[command(name = "recommendations-admin", version, about)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pending or approved tab
    List {
        #[arg(long, default_value = "pending")]
        tab: Tab,
    },

    /// Approve a pending recommendation, then show the refreshed list
    Approve {
        id: String,

        #[arg(long, default_value = "pending")]
        tab: Tab,
    },

    /// Delete a recommendation, then show the refreshed list
    Delete {
        id: String,

        #[arg(long, default_value = "pending")]
        tab: Tab,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so the rendered list on stdout stays clean
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = Config::from_env()?;
    tracing::debug!(api_base_url = %config.api_base_url, enable_delete = config.enable_delete, "Configuration loaded");

    let client = HttpRecommendationsClient::new(&config.api_base_url, QueryCache::new())?;
    let features = ListFeatures {
        delete: config.enable_delete,
    };
    let list = RecommendationsList::new(Arc::new(client), features)
        .with_default_avatar(config.default_avatar_url.clone());

    list.mount().await;

    // Mutation failures are logged by the list and leave it unchanged
    match cli.command {
        Commands::List { tab } => {
            list.select_tab(tab).await;
        }
        Commands::Approve { id, tab } => {
            list.select_tab(tab).await;
            list.approve(RecommendationId::new(id)).await;
        }
        Commands::Delete { id, tab } => {
            list.select_tab(tab).await;
            list.delete(RecommendationId::new(id)).await?;
        }
    }

    print!("{}", list.snapshot().await);
    Ok(())
}
