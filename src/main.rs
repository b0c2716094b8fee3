use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use zine_weaver::{config, output, store, sync};

#[derive(Parser)]
#[command(name = "zine-weaver")]
#[command(about = "Validate and publish zine content for the offline reader")]
#[command(long_about = "\
Validate and publish zine content for the offline reader

Every *.json file under the content directory is a zine document. Documents
are checked against the block schema; only documents without errors are
published.

Content structure:

  content/
  ├── config.toml                  # Pipeline config (optional)
  ├── 001-the-black-box.json       # Zine document
  ├── series/
  │   └── 002-static.json          # Subdirectories are scanned too
  └── .drafts/                     # Hidden entries are ignored

Sync output:

  dist/
  ├── zines.json                   # Published zines, issue order
  └── precache.json                # Asset URLs for the offline cache

Set RUST_LOG (e.g. RUST_LOG=zine_weaver=debug) for diagnostics on stderr.

Run 'zine-weaver gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for the published bundle
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Language used for titles in printed output
    #[arg(long, default_value = "en", global = true)]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every document without publishing
    Check,
    /// Validate, then write zines.json and precache.json
    Sync,
    /// List the zines that pass validation
    List,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let outcome = store::load_dir(&cli.source)?;
            output::print_check_output(&outcome, &cli.lang);
            if !outcome.is_clean() {
                return Err(format!(
                    "{} document(s) failed validation",
                    outcome.rejected.len()
                )
                .into());
            }
            println!("==> Content is valid");
        }
        Command::Sync => {
            let site_config = config::load_config(&cli.source)?;
            println!(
                "==> Syncing {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            match sync::sync(&cli.source, &cli.output, &site_config) {
                Ok(result) => output::print_sync_output(&result, &cli.output, &cli.lang),
                Err(sync::SyncError::Rejected(rejected)) => {
                    let outcome = store::LoadOutcome {
                        store: store::ZineStore::new(),
                        rejected,
                    };
                    output::print_check_output(&outcome, &cli.lang);
                    return Err(format!(
                        "{} document(s) failed validation, nothing written",
                        outcome.rejected.len()
                    )
                    .into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::List => {
            let outcome = store::load_dir(&cli.source)?;
            output::print_list_output(&outcome.store, &cli.lang);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "zine_weaver=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
