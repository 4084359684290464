//! Job setup: config fallbacks, input discovery, and job validation.

use std::path::PathBuf;
use wrangler_core::{
    BatchJob, Config, FileDiscovery, InvertConfig, OutputDirectoryPolicy, OutputFormat,
    RenameConfig, RenameRule, ResizeConfig, TransformConfig,
};

use super::{BatchArgs, InvertArgs, RenameArgs, ResizeArgs};

impl BatchArgs {
    pub fn rule(&self) -> RenameRule {
        RenameRule::new(
            self.replace.as_deref().unwrap_or_default(),
            self.with_text.as_deref().unwrap_or_default(),
            self.prefix.as_deref().unwrap_or_default(),
        )
    }
}

pub fn resize_config(args: &ResizeArgs, config: &Config) -> TransformConfig {
    let width = args.width.unwrap_or(config.defaults.width);
    let height = args.height.unwrap_or(config.defaults.height);
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.defaults.format);

    TransformConfig::Resize(ResizeConfig::new(width, height, format).with_rule(args.batch.rule()))
}

pub fn invert_config(args: &InvertArgs, config: &Config) -> TransformConfig {
    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.defaults.format);

    TransformConfig::Invert(InvertConfig::new(format).with_rule(args.batch.rule()))
}

pub fn rename_config(args: &RenameArgs) -> TransformConfig {
    let rule = args.batch.rule();
    TransformConfig::Rename(match args.convert {
        Some(format) => RenameConfig::converting(rule, format.into()),
        None => RenameConfig::preserving(rule),
    })
}

/// `--in-place` wins, then `--out`, then the configured default directory;
/// with none of them outputs go next to their sources.
pub fn directory_policy(args: &BatchArgs, config: &Config) -> OutputDirectoryPolicy {
    if args.in_place {
        return OutputDirectoryPolicy::OriginalDirectory;
    }
    if let Some(out) = &args.out {
        let expanded = shellexpand::tilde(out);
        return OutputDirectoryPolicy::ExplicitDirectory(PathBuf::from(expanded.as_ref()));
    }
    match config.default_output_dir() {
        Some(dir) => OutputDirectoryPolicy::ExplicitDirectory(dir),
        None => OutputDirectoryPolicy::OriginalDirectory,
    }
}

/// Expand inputs and assemble a validated job.
pub fn build_job(
    args: &BatchArgs,
    transform: TransformConfig,
    config: &Config,
) -> anyhow::Result<BatchJob> {
    for input in &args.inputs {
        if !input.exists() {
            anyhow::bail!(
                "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
                input
            );
        }
    }

    let sources = FileDiscovery::new(config.processing.clone()).expand(&args.inputs, args.recursive);
    if sources.is_empty() {
        anyhow::bail!(
            "No image files found in {:?}{}",
            args.inputs,
            if args.recursive {
                ""
            } else {
                " (use --recursive to include subdirectories)"
            }
        );
    }
    tracing::debug!("Found {} source files", sources.len());

    let collision = args
        .collision
        .map(Into::into)
        .unwrap_or(config.output.collision);
    let job = BatchJob::new(
        sources,
        transform,
        directory_policy(args, config),
        &config.limits,
    )?
    .with_collision_policy(collision);
    Ok(job)
}
