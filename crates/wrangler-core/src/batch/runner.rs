//! Drives a batch job on a background task.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::channel::{bounded_channel, EventSink};
use crate::transform::{TransformContext, TransformProcessor};
use crate::types::{BatchReport, ItemOutcome, ItemReport, ProcessingStats};

use super::events::{dispatch, BatchEvent, ProgressEvent, ProgressObserver, StatusEvent};
use super::job::BatchJob;
use super::CancelFlag;

/// Starts batch jobs with a fixed configuration.
pub struct BatchRunner {
    config: Config,
}

impl BatchRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Spawn the job and return immediately. Must be called inside a tokio
    /// runtime.
    pub fn start(&self, job: BatchJob) -> BatchHandle {
        self.start_with_cancel(job, CancelFlag::new())
    }

    /// Like [`start`](Self::start), observing an existing cancel flag.
    pub fn start_with_cancel(&self, job: BatchJob, cancel: CancelFlag) -> BatchHandle {
        let (tx, rx) = bounded_channel(&self.config.pipeline);

        let context = TransformContext::new(&self.config, job.directory().clone(), job.collision());
        let processor = Arc::new(TransformProcessor::new(job.transform().build(), context));

        let task = tokio::spawn(run_job(
            job,
            processor,
            EventSink::new(tx),
            cancel.clone(),
        ));

        BatchHandle {
            events: rx,
            cancel,
            task,
        }
    }

    /// Run a job to completion, feeding every event to `observer`.
    pub async fn run<O: ProgressObserver + ?Sized>(
        &self,
        job: BatchJob,
        observer: &mut O,
    ) -> Result<BatchReport> {
        self.start(job).observe(observer).await
    }
}

/// A running batch.
pub struct BatchHandle {
    events: mpsc::Receiver<BatchEvent>,
    cancel: CancelFlag,
    task: JoinHandle<BatchReport>,
}

impl BatchHandle {
    /// Ask the batch to stop after the item in flight.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A flag that can be moved elsewhere (e.g. a signal handler).
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Next event, or `None` once the batch has finished.
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Feed all remaining events to `observer` and return the final report.
    pub async fn observe<O: ProgressObserver + ?Sized>(
        mut self,
        observer: &mut O,
    ) -> Result<BatchReport> {
        while let Some(event) = self.events.recv().await {
            dispatch(observer, &event);
        }
        Ok(self.task.await?)
    }

    /// Wait for the report without looking at events.
    pub async fn finish(self) -> Result<BatchReport> {
        drop(self.events);
        Ok(self.task.await?)
    }
}

async fn run_job(
    job: BatchJob,
    processor: Arc<TransformProcessor>,
    mut sink: EventSink<BatchEvent>,
    cancel: CancelFlag,
) -> BatchReport {
    let total = job.len();
    let start_time = Instant::now();
    let mut items: Vec<ItemReport> = Vec::with_capacity(total);
    let mut succeeded = 0;
    let mut failed = 0;
    let mut cancelled = false;

    tracing::info!("Starting {} of {} files", job.operation(), total);
    sink.emit(BatchEvent::Started { total }).await;

    for (i, source) in job.sources().iter().enumerate() {
        if cancel.is_cancelled() {
            cancelled = true;
            break;
        }
        let index = i + 1;

        sink.emit(BatchEvent::Status(StatusEvent::processing(
            index, total, source,
        )))
        .await;

        let item = match process_item(&processor, source.clone()).await {
            Ok(output) => {
                succeeded += 1;
                ItemReport {
                    index,
                    source: source.clone(),
                    output: Some(output),
                    outcome: ItemOutcome::Succeeded,
                }
            }
            Err(reason) => {
                failed += 1;
                tracing::error!("Failed: {:?} - {}", source, reason);
                sink.emit(BatchEvent::Status(StatusEvent::failed(
                    index, total, source, &reason,
                )))
                .await;
                ItemReport {
                    index,
                    source: source.clone(),
                    output: None,
                    outcome: ItemOutcome::Failed { reason },
                }
            }
        };

        sink.emit(BatchEvent::Item(item.clone())).await;
        items.push(item);
        sink.emit(BatchEvent::Progress(ProgressEvent::new(index, total)))
            .await;
    }

    let processed = items.len();
    if cancelled {
        tracing::warn!("Cancelled after {} of {} files", processed, total);
        for (i, source) in job.sources().iter().enumerate().skip(processed) {
            items.push(ItemReport {
                index: i + 1,
                source: source.clone(),
                output: None,
                outcome: ItemOutcome::Cancelled,
            });
        }
        sink.emit(BatchEvent::Status(StatusEvent::cancelled(processed, total)))
            .await;
    }

    let elapsed = start_time.elapsed().as_secs_f64();
    let stats = ProcessingStats {
        succeeded,
        failed,
        skipped: total - processed,
        images_per_second: if elapsed > 0.0 {
            processed as f64 / elapsed
        } else {
            0.0
        },
        total_seconds: elapsed,
    };
    tracing::info!(
        "Finished {}: {} succeeded, {} failed, {} skipped in {:.2}s",
        job.operation(),
        stats.succeeded,
        stats.failed,
        stats.skipped,
        stats.total_seconds
    );

    let report = BatchReport {
        operation: job.operation(),
        items,
        stats,
        cancelled,
    };

    sink.emit(BatchEvent::Status(StatusEvent::complete(processed, total)))
        .await;
    sink.emit(BatchEvent::Completed(report.clone())).await;
    report
}

/// Run one item on the blocking pool and wait for it, so its file handles
/// and pixel buffers are gone before the next item starts.
async fn process_item(
    processor: &Arc<TransformProcessor>,
    source: PathBuf,
) -> std::result::Result<PathBuf, String> {
    let processor = Arc::clone(processor);
    match tokio::task::spawn_blocking(move || processor.process(&source)).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("Worker task failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::StatusKind;
    use crate::pipeline::OutputDirectoryPolicy;
    use crate::transform::{InvertConfig, TransformConfig};
    use crate::types::OutputFormat;
    use image::DynamicImage;

    fn invert_job(sources: Vec<PathBuf>, out: PathBuf) -> BatchJob {
        BatchJob::new(
            sources,
            TransformConfig::Invert(InvertConfig::new(OutputFormat::Png)),
            OutputDirectoryPolicy::ExplicitDirectory(out),
            &Config::default().limits,
        )
        .unwrap()
    }

    fn write_sources(dir: &std::path::Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| {
                let path = dir.join(format!("img_{}.png", i));
                DynamicImage::new_rgb8(4, 4).save(&path).unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_event_order() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), 2);
        let runner = BatchRunner::new(&Config::default());
        let mut handle = runner.start(invert_job(sources, dir.path().join("out")));

        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }

        assert!(matches!(events.first(), Some(BatchEvent::Started { total: 2 })));
        assert!(matches!(events.last(), Some(BatchEvent::Completed(_))));

        let progress: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                BatchEvent::Progress(p) => Some(p.index),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![1, 2]);

        let report = handle.finish().await.unwrap();
        assert_eq!(report.stats.succeeded, 2);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), 3);
        let out = dir.path().join("out");
        let runner = BatchRunner::new(&Config::default());

        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut handle = runner.start_with_cancel(invert_job(sources, out.clone()), cancel);

        let mut kinds = Vec::new();
        while let Some(event) = handle.next_event().await {
            if let BatchEvent::Status(status) = event {
                kinds.push(status.kind);
            }
        }
        assert_eq!(kinds, vec![StatusKind::Cancelled, StatusKind::Complete]);

        let report = handle.finish().await.unwrap();
        assert!(report.cancelled);
        assert_eq!(report.stats.skipped, 3);
        assert!(report
            .items
            .iter()
            .all(|i| matches!(i.outcome, ItemOutcome::Cancelled)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_dropped_receiver_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let sources = write_sources(dir.path(), 3);
        let out = dir.path().join("out");
        let runner = BatchRunner::new(&Config {
            pipeline: crate::config::PipelineConfig { event_buffer: 1 },
            ..Config::default()
        });

        let report = runner
            .start(invert_job(sources, out.clone()))
            .finish()
            .await
            .unwrap();
        assert_eq!(report.stats.succeeded, 3);
        assert!(out.join("img_2.png").exists());
    }

    #[tokio::test]
    async fn test_failure_status_carries_reason() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let runner = BatchRunner::new(&Config::default());
        let mut handle = runner.start(invert_job(vec![missing], dir.path().join("out")));

        let mut failure = None;
        while let Some(event) = handle.next_event().await {
            if let BatchEvent::Status(status) = event {
                if status.kind == StatusKind::Failed {
                    failure = Some(status);
                }
            }
        }

        let failure = failure.unwrap();
        assert_eq!(failure.current, 1);
        assert!(failure.message.starts_with("Error processing missing.png: "));
    }
}
