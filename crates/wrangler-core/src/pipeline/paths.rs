//! Output path derivation and collision handling.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::types::{CollisionPolicy, OutputFormat};

/// Filename rewrite applied to every output stem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameRule {
    /// Literal text to look for in the stem (ignored when empty)
    pub replace_text: String,
    /// Replacement for every occurrence of `replace_text`
    pub with_text: String,
    /// Text prepended to the stem (ignored when empty)
    pub prefix_text: String,
}

impl RenameRule {
    pub fn new(
        replace_text: impl Into<String>,
        with_text: impl Into<String>,
        prefix_text: impl Into<String>,
    ) -> Self {
        Self {
            replace_text: replace_text.into(),
            with_text: with_text.into(),
            prefix_text: prefix_text.into(),
        }
    }

    /// True when applying the rule leaves every stem unchanged.
    pub fn is_noop(&self) -> bool {
        self.replace_text.is_empty() && self.prefix_text.is_empty()
    }

    /// Replace first, then prefix.
    pub fn apply(&self, stem: &str) -> String {
        let mut name = if self.replace_text.is_empty() {
            stem.to_string()
        } else {
            stem.replace(&self.replace_text, &self.with_text)
        };
        if !self.prefix_text.is_empty() {
            name.insert_str(0, &self.prefix_text);
        }
        name
    }
}

/// Where outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDirectoryPolicy {
    /// Every output lands in this directory
    ExplicitDirectory(PathBuf),
    /// Each output lands next to its own source
    OriginalDirectory,
}

/// Where the output extension comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetExtension {
    /// Reuse the source's extension verbatim (format-preserving copy)
    KeepSource,
    /// Canonical extension of the target container
    Format(OutputFormat),
}

/// Derives destination paths. Pure: never touches the filesystem.
#[derive(Debug, Clone)]
pub struct OutputPathResolver {
    policy: OutputDirectoryPolicy,
}

impl OutputPathResolver {
    pub fn new(policy: OutputDirectoryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &OutputDirectoryPolicy {
        &self.policy
    }

    /// Compute `<dir>/<rule(stem)>.<ext>` for a source file.
    pub fn resolve(
        &self,
        source: &Path,
        rule: &RenameRule,
        extension: TargetExtension,
    ) -> Result<PathBuf, PipelineError> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy())
            .ok_or_else(|| PipelineError::FileNotFound(source.to_path_buf()))?;

        let mut file_name = rule.apply(&stem);
        match extension {
            TargetExtension::KeepSource => {
                if let Some(ext) = source.extension() {
                    file_name.push('.');
                    file_name.push_str(&ext.to_string_lossy());
                }
            }
            TargetExtension::Format(format) => {
                file_name.push('.');
                file_name.push_str(format.extension());
            }
        }

        let dir = match &self.policy {
            OutputDirectoryPolicy::ExplicitDirectory(dir) => dir.as_path(),
            OutputDirectoryPolicy::OriginalDirectory => source.parent().unwrap_or(Path::new("")),
        };
        Ok(dir.join(file_name))
    }
}

impl CollisionPolicy {
    /// Turn a resolved destination into the path that will actually be
    /// written, according to the policy.
    pub fn claim(self, destination: PathBuf) -> Result<PathBuf, PipelineError> {
        if !destination.exists() {
            return Ok(destination);
        }

        match self {
            CollisionPolicy::Overwrite => Ok(destination),
            CollisionPolicy::Fail => Err(PipelineError::DestinationExists(destination)),
            CollisionPolicy::Suffix => {
                let claimed = (1u32..)
                    .map(|n| numbered(&destination, n))
                    .find(|candidate| !candidate.exists())
                    .ok_or_else(|| PipelineError::DestinationExists(destination.clone()))?;
                tracing::debug!("{:?} exists, writing {:?} instead", destination, claimed);
                Ok(claimed)
            }
        }
    }
}

/// `dir/name.ext` -> `dir/name_<n>.ext`
fn numbered(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(file_name)
}

/// Whether two paths name the same existing file.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
