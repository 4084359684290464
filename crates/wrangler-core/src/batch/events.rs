//! Events emitted by a running batch, and the observer that consumes them.

use serde::Serialize;
use std::path::Path;

use crate::types::{BatchReport, ItemReport};

/// Progress after an item finished, successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// 1-based count of processed items
    pub index: usize,
    pub total: usize,
    /// `round(index / total * 100)`
    pub percent: u8,
}

impl ProgressEvent {
    pub fn new(index: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((index as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Self {
            index,
            total,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Processing,
    Failed,
    Cancelled,
    Complete,
}

/// Human-readable status with structured fields alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEvent {
    pub kind: StatusKind,
    pub message: String,
    /// 1-based item the status refers to (processed count for batch-level kinds)
    pub current: usize,
    pub total: usize,
}

impl StatusEvent {
    pub fn processing(current: usize, total: usize, source: &Path) -> Self {
        Self {
            kind: StatusKind::Processing,
            message: format!("Processing: {}", display_name(source)),
            current,
            total,
        }
    }

    pub fn failed(current: usize, total: usize, source: &Path, reason: &str) -> Self {
        Self {
            kind: StatusKind::Failed,
            message: format!("Error processing {}: {}", display_name(source), reason),
            current,
            total,
        }
    }

    pub fn cancelled(current: usize, total: usize) -> Self {
        Self {
            kind: StatusKind::Cancelled,
            message: "Processing cancelled".to_string(),
            current,
            total,
        }
    }

    pub fn complete(current: usize, total: usize) -> Self {
        Self {
            kind: StatusKind::Complete,
            message: "Processing complete".to_string(),
            current,
            total,
        }
    }
}

/// Everything a batch reports, in emission order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    Started { total: usize },
    Status(StatusEvent),
    Progress(ProgressEvent),
    Item(ItemReport),
    Completed(BatchReport),
}

/// Callback-style view of the event stream.
///
/// Front ends implement the four required hooks; the optional ones default
/// to doing nothing.
pub trait ProgressObserver {
    fn on_started(&mut self, _total: usize) {}

    fn on_percent(&mut self, percent: u8);

    fn on_count(&mut self, current: usize, total: usize);

    fn on_status(&mut self, status: &StatusEvent);

    fn on_item(&mut self, _item: &ItemReport) {}

    fn on_complete(&mut self, report: &BatchReport);
}

/// Route one event to the matching observer hooks.
pub fn dispatch<O: ProgressObserver + ?Sized>(observer: &mut O, event: &BatchEvent) {
    match event {
        BatchEvent::Started { total } => observer.on_started(*total),
        BatchEvent::Status(status) => observer.on_status(status),
        BatchEvent::Progress(progress) => {
            observer.on_percent(progress.percent);
            observer.on_count(progress.index, progress.total);
        }
        BatchEvent::Item(item) => observer.on_item(item),
        BatchEvent::Completed(report) => observer.on_complete(report),
    }
}

/// File name for status messages, falling back to the whole path.
pub(crate) fn display_name(source: &Path) -> String {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}
