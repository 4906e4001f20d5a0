//! File driver: select target files, apply transforms, write back.
//!
//! Each file is read, transformed in memory, and written once. A failure on
//! one file is recorded in the report and the run moves on to the next.

use std::path::{Path, PathBuf};

use glob_match::glob_match;

use crate::config::RescribeConfig;
use crate::error::{Error, Result};
use crate::log_status;
use crate::output::{RunReport, TransformStats};
use crate::rewrite::{SourceFile, Transform};
use crate::utils::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Write,
    DryRun,
}

/// What happened to one file's content.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub content: String,
    pub changed: bool,
    pub stats: Vec<TransformStats>,
}

/// Files directly in `dir` whose name ends with `suffix` and matches no `exclude` glob.
pub fn select_files(dir: &Path, suffix: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::validation_invalid_argument(
            "dir",
            "Directory does not exist",
            Some(dir.display().to_string()),
            None,
        )
        .with_hint("Pass --dir or set \"dir\" in rescribe.json"));
    }

    let files = io::list_files(dir)?
        .into_iter()
        .filter(|path| {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            name.ends_with(suffix) && !exclude.iter().any(|pattern| glob_match(pattern, name))
        })
        .collect();

    Ok(files)
}

/// Apply `transforms` in order to `content`.
pub fn transform_content(content: &str, transforms: &[Transform]) -> Transformed {
    let mut file = SourceFile::parse(content);
    let stats = transforms
        .iter()
        .map(|t| TransformStats {
            transform: t.name.clone(),
            stats: t.apply(&mut file),
        })
        .collect();

    let rendered = file.render();
    let changed = rendered != content;
    Transformed {
        content: rendered,
        changed,
        stats,
    }
}

/// Read, transform, and (in `Write` mode) write back one file.
pub fn process_file(path: &Path, transforms: &[Transform], mode: RunMode) -> Result<Transformed> {
    let content = io::read_file(path, "read test file")?;
    let result = transform_content(&content, transforms);

    if result.changed && mode == RunMode::Write {
        io::write_file_atomic(path, &result.content, "write test file")?;
    }

    Ok(result)
}

pub fn run(config: &RescribeConfig, transforms: &[Transform], mode: RunMode) -> Result<RunReport> {
    let dir = config.resolved_dir();
    let files = select_files(&dir, &config.suffix, &config.exclude)?;

    let mut report = RunReport::new(
        dir.display().to_string(),
        config.suffix.clone(),
        mode == RunMode::DryRun,
        transforms.iter().map(|t| t.name.clone()).collect(),
    );

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log_status!("rescribe", "Processing {}", name);

        match process_file(path, transforms, mode) {
            Ok(result) => {
                let unclosed: usize = result.stats.iter().map(|s| s.stats.unclosed_spans).sum();
                if unclosed > 0 {
                    log_status!("rescribe", "{}: {} unclosed span(s)", name, unclosed);
                }
                if result.changed {
                    report.record_changed(name, result.stats);
                } else {
                    report.record_unchanged(name, result.stats);
                }
            }
            Err(e) => {
                let message = match e.details.get("error").and_then(|v| v.as_str()) {
                    Some(cause) => format!("{}: {}", e.message, cause),
                    None => e.to_string(),
                };
                log_status!("rescribe", "Failed {}: {}", name, message);
                report.record_error(name, message);
            }
        }
    }

    let verb = if mode == RunMode::DryRun {
        "would change"
    } else {
        "changed"
    };
    log_status!(
        "rescribe",
        "Done: {} of {} file(s) {}, {} error(s)",
        report.summary.modified,
        report.summary.files,
        verb,
        report.summary.errors
    );

    Ok(report)
}
