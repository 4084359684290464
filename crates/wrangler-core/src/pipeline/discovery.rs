//! Expands command-line inputs into an ordered list of source files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Discovers image files in directories.
pub struct FileDiscovery {
    config: ProcessingConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    /// Expand inputs in the order given.
    ///
    /// Files are kept as-is whatever their extension (the caller named them
    /// explicitly). Directories contribute their supported files, sorted by
    /// path; only the top level unless `recursive` is set. A file reached
    /// twice is listed once, at its first position.
    pub fn expand(&self, inputs: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();

        for input in inputs {
            if input.is_dir() {
                for path in self.scan_dir(input, recursive) {
                    push_unique(&mut files, path);
                }
            } else {
                push_unique(&mut files, input.clone());
            }
        }
        files
    }

    fn scan_dir(&self, dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let walker = if recursive {
            WalkDir::new(dir).follow_links(true)
        } else {
            WalkDir::new(dir).max_depth(1)
        };

        let mut found: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && self.is_supported(e.path()))
            .map(|e| e.into_path())
            .collect();

        // Sort by path for deterministic ordering
        found.sort();
        found
    }

    /// Check if a file has a supported extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .supported_formats
                    .iter()
                    .any(|fmt| fmt.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn push_unique(files: &mut Vec<PathBuf>, path: PathBuf) {
    if !files.contains(&path) {
        files.push(path);
    }
}
