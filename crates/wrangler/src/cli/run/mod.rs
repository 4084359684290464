//! The `wrangler resize`, `wrangler invert` and `wrangler rename` commands.

mod progress;
mod setup;
pub mod types;

pub use types::{Collision, ImageFormat, ReportKind};

use clap::Args;
use std::path::PathBuf;
use wrangler_core::output::write_report_file;
use wrangler_core::{BatchRunner, CancelFlag, Config, TransformConfig};

use progress::{print_summary, BarObserver};
use setup::{build_job, invert_config, rename_config, resize_config};

/// Arguments shared by every batch command.
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Image files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Also process images in subdirectories of directory inputs
    #[arg(short, long)]
    pub recursive: bool,

    /// Output directory (created if missing; `~` is expanded)
    #[arg(short, long, conflicts_with = "in_place")]
    pub out: Option<String>,

    /// Write each output next to its source, ignoring any configured default directory
    #[arg(long)]
    pub in_place: bool,

    /// Text to replace in output file names
    #[arg(long)]
    pub replace: Option<String>,

    /// Replacement for --replace
    #[arg(long = "with", requires = "replace")]
    pub with_text: Option<String>,

    /// Text to prepend to output file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// What to do when an output file already exists (defaults to config)
    #[arg(long, value_enum)]
    pub collision: Option<Collision>,

    /// Write a per-file report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportKind,
}

/// Arguments for the `resize` command.
#[derive(Args, Debug)]
pub struct ResizeArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Target width in pixels (defaults to config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels (defaults to config)
    #[arg(long)]
    pub height: Option<u32>,

    /// Output format (defaults to config)
    #[arg(short, long, value_enum)]
    pub format: Option<ImageFormat>,
}

/// Arguments for the `invert` command.
#[derive(Args, Debug)]
pub struct InvertArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Output format (defaults to config)
    #[arg(short, long, value_enum)]
    pub format: Option<ImageFormat>,
}

/// Arguments for the `rename` command.
#[derive(Args, Debug)]
pub struct RenameArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Re-encode into this format instead of copying the file unchanged
    #[arg(long, value_enum)]
    pub convert: Option<ImageFormat>,
}

pub async fn resize(args: ResizeArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let transform = resize_config(&args, &config);
    run_batch(&args.batch, transform, config).await
}

pub async fn invert(args: InvertArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let transform = invert_config(&args, &config);
    run_batch(&args.batch, transform, config).await
}

pub async fn rename(args: RenameArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let transform = rename_config(&args);
    run_batch(&args.batch, transform, config).await
}

async fn run_batch(
    args: &BatchArgs,
    transform: TransformConfig,
    config: Config,
) -> anyhow::Result<()> {
    let job = build_job(args, transform, &config)?;
    tracing::info!(
        "{} {} files ({:?}, collisions: {:?})",
        job.operation(),
        job.len(),
        job.directory(),
        job.collision()
    );

    // Ctrl-C stops the batch after the file in flight
    let cancel = CancelFlag::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping after the current file");
                cancel.cancel();
            }
        })
    };

    let runner = BatchRunner::new(&config);
    let mut observer = BarObserver::new();
    let report = runner
        .start_with_cancel(job, cancel)
        .observe(&mut observer)
        .await;
    interrupt.abort();
    let report = report?;

    if let Some(path) = &args.report {
        write_report_file(&report, path, args.report_format.into())?;
        tracing::info!("Report written to {:?} ({})", path, args.report_format);
    }

    print_summary(&report);

    if report.stats.failed > 0 {
        anyhow::bail!(
            "{} of {} files failed",
            report.stats.failed,
            report.items.len()
        );
    }
    if report.cancelled {
        anyhow::bail!("Cancelled with {} files left", report.stats.skipped);
    }
    Ok(())
}
