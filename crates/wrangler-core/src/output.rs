//! Batch report serialization to JSON and JSONL.
//!
//! JSON writes the whole report as one document. JSON Lines writes one line
//! per item followed by a summary line, each tagged with a `type` field.

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::{BatchReport, ItemReport, Operation, ProcessingStats};

/// Report file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl ReportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReportLine<'a> {
    Item(&'a ItemReport),
    Summary {
        operation: Operation,
        stats: &'a ProcessingStats,
        cancelled: bool,
    },
}

/// Serializes batch reports.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    pretty: bool,
    lines_written: usize,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects [`ReportFormat::Json`].
    pub fn new(writer: W, format: ReportFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            lines_written: 0,
        }
    }

    pub fn write_report(&mut self, report: &BatchReport) -> io::Result<()> {
        match self.format {
            ReportFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, report)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
                self.lines_written += 1;
            }
            ReportFormat::JsonLines => {
                for item in &report.items {
                    self.write_line(&ReportLine::Item(item))?;
                }
                self.write_line(&ReportLine::Summary {
                    operation: report.operation,
                    stats: &report.stats,
                    cancelled: report.cancelled,
                })?;
            }
        }
        Ok(())
    }

    fn write_line(&mut self, line: &ReportLine<'_>) -> io::Result<()> {
        // JSONL is never pretty-printed (one object per line)
        serde_json::to_writer(&mut self.writer, line).map_err(io::Error::other)?;
        writeln!(self.writer)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of top-level JSON values written so far.
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Write a report to a file, replacing it if it exists.
pub fn write_report_file(report: &BatchReport, path: &Path, format: ReportFormat) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = ReportWriter::new(BufWriter::new(file), format, true);
    writer.write_report(report)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemOutcome;
    use std::path::PathBuf;

    fn sample_report() -> BatchReport {
        BatchReport {
            operation: Operation::Resize,
            items: vec![
                ItemReport {
                    index: 1,
                    source: PathBuf::from("a.png"),
                    output: Some(PathBuf::from("out/a.jpg")),
                    outcome: ItemOutcome::Succeeded,
                },
                ItemReport {
                    index: 2,
                    source: PathBuf::from("b.png"),
                    output: None,
                    outcome: ItemOutcome::Failed {
                        reason: "Decode error".to_string(),
                    },
                },
            ],
            stats: ProcessingStats {
                succeeded: 1,
                failed: 1,
                ..Default::default()
            },
            cancelled: false,
        }
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::Json, false);
        writer.write_report(&sample_report()).unwrap();
        assert_eq!(writer.lines_written(), 1);

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["operation"], "resize");
        assert_eq!(value["items"][0]["status"], "succeeded");
        assert_eq!(value["items"][1]["reason"], "Decode error");
        assert!(value["items"][1].get("output").is_none());
    }

    #[test]
    fn test_write_jsonl() {
        let mut buffer = Vec::new();
        let mut writer = ReportWriter::new(&mut buffer, ReportFormat::JsonLines, true);
        writer.write_report(&sample_report()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "item");
        assert_eq!(lines[0]["index"], 1);
        assert_eq!(lines[1]["status"], "failed");
        assert_eq!(lines[2]["type"], "summary");
        assert_eq!(lines[2]["stats"]["failed"], 1);
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_file(&sample_report(), &path, ReportFormat::Json).unwrap();

        let back: BatchReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.items.len(), 2);
        assert_eq!(back.failures().count(), 1);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ReportFormat::parse("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::parse("jsonl"), Some(ReportFormat::JsonLines));
        assert_eq!(ReportFormat::parse("NDJSON"), Some(ReportFormat::JsonLines));
        assert_eq!(ReportFormat::parse("invalid"), None);
    }
}
