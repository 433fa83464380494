//! # Folio CLI (`folio`)
//!
//! Builds the article index from the configured content root and prints
//! or exports the views derived from it.
//!
//! ## Usage
//!
//! ```bash
//! folio --config ./config/folio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `folio check` | Build and report excluded articles; fails if any |
//! | `folio tree` | Category tree with display dates |
//! | `folio categories` | Flat category → articles listing |
//! | `folio cards` | Presentation cards with catalog metadata |
//! | `folio summary` | Context summary as JSON |
//! | `folio featured` | Newest articles across the index |
//! | `folio get <id>` | One article's content |
//! | `folio export` | Full JSON export to a file or stdout |
//! | `folio watch` | Rebuild whenever the content changes |
//! | `folio completions <shell>` | Shell completion script |

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use folio::config::{self, Config};
use folio::connector_fs::FilesystemSource;
use folio::ingest::run_pipeline;
use folio::traits::ArticleSource;
use folio::{check, export, get, listing, logging, watch};

/// Folio: ingestion and indexing for a personal article site.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file.
#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: ingest Markdown articles and build the site index",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/folio.toml")]
    config: PathBuf,

    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and report every excluded article.
    ///
    /// Exits non-zero if any article was excluded.
    Check,

    /// Print the category tree.
    Tree,

    /// Print each category with its articles.
    Categories,

    /// Print the card projection.
    Cards {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the context summary as JSON.
    Summary,

    /// Print the newest articles across the index.
    Featured {
        /// Number of articles (defaults to `[summary].featured_limit`).
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Retrieve one article by id.
    Get {
        /// Article id.
        id: String,

        /// Print the render bundle as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export the index as JSON.
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rebuild the index whenever the content changes.
    Watch {
        /// Seconds between polls.
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,

        /// Re-write this export file after every rebuild.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn print_completions(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut std::io::stdout());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_json);

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        print_completions(shell);
        return Ok(());
    }

    let cfg: Config = config::load_config(&cli.config)?;
    let source: Arc<dyn ArticleSource> = Arc::new(FilesystemSource::new(cfg.content.clone()));

    match cli.command {
        Commands::Check => {
            let site = run_pipeline(source).await?;
            check::run_check(&cfg, &site)?;
        }
        Commands::Tree => {
            let site = run_pipeline(source).await?;
            listing::run_tree(&site)?;
        }
        Commands::Categories => {
            let site = run_pipeline(source).await?;
            listing::run_categories(&site)?;
        }
        Commands::Cards { json } => {
            let site = run_pipeline(source).await?;
            listing::run_cards(&cfg, &site, json)?;
        }
        Commands::Summary => {
            let site = run_pipeline(source).await?;
            listing::run_summary(&cfg, &site)?;
        }
        Commands::Featured { limit } => {
            let site = run_pipeline(source).await?;
            listing::run_featured(&cfg, &site, limit)?;
        }
        Commands::Get { id, json } => {
            let site = run_pipeline(source).await?;
            get::run_get(&site, &id, json)?;
        }
        Commands::Export { output } => {
            let site = run_pipeline(source).await?;
            export::run_export(&cfg, &site, output.as_deref())?;
        }
        Commands::Watch {
            interval_secs,
            output,
        } => {
            let interval = Duration::from_secs(interval_secs.max(1));
            watch::run_watch(&cfg, source, interval, output).await?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
        }
    }

    Ok(())
}
