//! Terminal progress bar and end-of-run summary.

use indicatif::{ProgressBar, ProgressStyle};
use wrangler_core::{BatchReport, ItemOutcome, ProgressObserver, StatusEvent, StatusKind};

/// Drives an `indicatif` bar from batch events.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    pub fn new() -> Self {
        Self::with_bar(create_progress_bar())
    }

    pub fn with_bar(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Default for BarObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for BarObserver {
    fn on_started(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_percent(&mut self, percent: u8) {
        self.bar.set_prefix(percent.to_string());
    }

    fn on_count(&mut self, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }

    fn on_status(&mut self, status: &StatusEvent) {
        match status.kind {
            StatusKind::Processing => self.bar.set_message(status.message.clone()),
            StatusKind::Failed | StatusKind::Cancelled => {
                self.bar.println(format!("  {}", status.message))
            }
            StatusKind::Complete => self.bar.set_message(status.message.clone()),
        }
    }

    fn on_complete(&mut self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({prefix}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_prefix("0");
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a batch.
pub fn print_summary(report: &BatchReport) {
    let stats = &report.stats;
    let total = report.items.len();

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("           {} summary", report.operation);
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.skipped > 0 {
        eprintln!("    Cancelled:    {:>8}", stats.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", stats.images_per_second);
    eprintln!("  ====================================");

    for item in report.failures() {
        if let ItemOutcome::Failed { reason } = &item.outcome {
            eprintln!("    - {}: {}", item.source.display(), reason);
        }
    }
}
