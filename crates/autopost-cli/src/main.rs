mod post;
mod run;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "autopost")]
#[command(about = "Publish due spreadsheet rows to a Facebook page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once over every due row
    Run {
        /// Stop after this many rows have been posted (overrides AUTOPOST_MAX_POSTS_PER_RUN)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_posts: Option<u64>,

        /// Fetch rows and show which are due without posting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Publish a single row now and record the outcome
    Post {
        /// Row key in the store (1-based)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        row_index: u64,

        #[arg(long)]
        description: String,

        /// Comma-separated image URLs
        #[arg(long)]
        image_url: Option<String>,

        /// Hashtags to end the post with
        #[arg(long)]
        tags: Option<String>,

        /// Use this prompt instead of the default one
        #[arg(long)]
        prompt_template: Option<String>,

        /// Store URL to record the outcome at (defaults to SHEET_API_URL)
        #[arg(long)]
        source_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = autopost_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let services = autopost_pipeline::Services::from_config(&config)?;

    match cli.command {
        Commands::Run { max_posts, dry_run } => {
            if dry_run {
                run::run_dry(&services).await?;
            } else {
                run::run_once(services, max_posts).await?;
            }
        }
        Commands::Post {
            row_index,
            description,
            image_url,
            tags,
            prompt_template,
            source_url,
        } => {
            let args = post::PostArgs {
                row_index,
                description,
                image_url,
                tags,
                prompt_template,
                source_url,
            };
            post::post_row(&services, &args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
