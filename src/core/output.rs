//! Public output types for rescribe command responses.

use serde::Serialize;

use crate::rewrite::RewriteStats;

// ============================================================================
// Run Reports
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileOutcome {
    Modified,
    WouldModify,
    Unchanged,
    Error,
}

/// Stats for one transform applied to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    pub transform: String,
    #[serde(flatten)]
    pub stats: RewriteStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub outcome: FileOutcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TransformStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Stats summed across every transform applied to the file.
    pub fn totals(&self) -> RewriteStats {
        let mut total = RewriteStats::default();
        for t in &self.transforms {
            total += t.stats;
        }
        total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub files: u32,
    pub modified: u32,
    pub unchanged: u32,
    pub errors: u32,
}

/// Result of applying transforms across a directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub dir: String,
    pub suffix: String,
    pub dry_run: bool,
    pub transforms: Vec<String>,
    pub summary: RunSummary,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn new(dir: String, suffix: String, dry_run: bool, transforms: Vec<String>) -> Self {
        Self {
            dir,
            suffix,
            dry_run,
            transforms,
            summary: RunSummary::default(),
            files: Vec::new(),
        }
    }

    pub fn record_changed(&mut self, file: String, transforms: Vec<TransformStats>) {
        self.summary.files += 1;
        self.summary.modified += 1;
        let outcome = if self.dry_run {
            FileOutcome::WouldModify
        } else {
            FileOutcome::Modified
        };
        self.files.push(FileReport {
            file,
            outcome,
            transforms,
            error: None,
        });
    }

    pub fn record_unchanged(&mut self, file: String, transforms: Vec<TransformStats>) {
        self.summary.files += 1;
        self.summary.unchanged += 1;
        self.files.push(FileReport {
            file,
            outcome: FileOutcome::Unchanged,
            transforms,
            error: None,
        });
    }

    pub fn record_error(&mut self, file: String, error: String) {
        self.summary.files += 1;
        self.summary.errors += 1;
        self.files.push(FileReport {
            file,
            outcome: FileOutcome::Error,
            transforms: Vec::new(),
            error: Some(error),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(inserted: usize) -> Vec<TransformStats> {
        vec![TransformStats {
            transform: "add-derivation".to_string(),
            stats: RewriteStats {
                matched: 1,
                inserted,
                ..RewriteStats::default()
            },
        }]
    }

    #[test]
    fn records_update_summary() {
        let mut report = RunReport::new(
            "src/test".to_string(),
            ".integration.test.ts".to_string(),
            false,
            vec!["add-derivation".to_string()],
        );
        report.record_changed("a.integration.test.ts".to_string(), stats(7));
        report.record_unchanged("b.integration.test.ts".to_string(), stats(0));
        report.record_error("c.integration.test.ts".to_string(), "denied".to_string());

        assert_eq!(
            report.summary,
            RunSummary {
                files: 3,
                modified: 1,
                unchanged: 1,
                errors: 1,
            }
        );
        assert!(report.has_errors());
        assert_eq!(report.files[0].outcome, FileOutcome::Modified);
        assert_eq!(report.files[0].totals().inserted, 7);
    }

    #[test]
    fn dry_run_marks_would_modify() {
        let mut report = RunReport::new(String::new(), ".ts".to_string(), true, Vec::new());
        report.record_changed("a.ts".to_string(), stats(1));
        assert_eq!(report.files[0].outcome, FileOutcome::WouldModify);
    }

    #[test]
    fn serializes_flattened_stats() {
        let mut report = RunReport::new(String::new(), ".ts".to_string(), true, Vec::new());
        report.record_changed("a.ts".to_string(), stats(2));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["dryRun"], true);
        assert_eq!(value["files"][0]["outcome"], "would_modify");
        assert_eq!(value["files"][0]["transforms"][0]["transform"], "add-derivation");
        assert_eq!(value["files"][0]["transforms"][0]["inserted"], 2);
        assert_eq!(value["files"][0]["transforms"][0]["unclosedSpans"], 0);
    }
}
