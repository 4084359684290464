//! Wrangler CLI - Batch image resizing, color inversion and renaming.
//!
//! Every command takes image files and/or directories, processes them one at
//! a time, and keeps going when a single file fails. The exit code is
//! non-zero when any file failed.
//!
//! # Usage
//!
//! ```bash
//! # Resize to exactly 800x600 JPEGs in ./out
//! wrangler resize photos/ --width 800 --height 600 --format jpeg --out out
//!
//! # Invert colors next to the originals, prefixing the names
//! wrangler invert scan.png --in-place --prefix inv_
//!
//! # Rename IMG_*.jpg to 2024_PIC_*.jpg, copying bytes unchanged
//! wrangler rename photos/ --replace IMG --with PIC --prefix 2024_ --out renamed
//!
//! # View configuration
//! wrangler config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Wrangler - Batch image resizing, color inversion and renaming.
#[derive(Parser, Debug)]
#[command(name = "wrangler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resize images to exact dimensions (aspect ratio is not kept)
    Resize(cli::run::ResizeArgs),

    /// Invert image colors; transparent areas become black
    Invert(cli::run::InvertArgs),

    /// Rename images, copying them unchanged or re-encoding with --convert
    Rename(cli::run::RenameArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match wrangler_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `wrangler config path`."
            );
            wrangler_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Wrangler v{}", wrangler_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Resize(args) => cli::run::resize(args).await,
        Commands::Invert(args) => cli::run::invert(args).await,
        Commands::Rename(args) => cli::run::rename(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
