use std::collections::BTreeMap;
use std::ops::AddAssign;

use regex::Regex;
use serde::Serialize;

use super::emit::{LineEdit, Template};
use super::guard::Guard;
use super::matcher::{leading_whitespace, Match, Matcher};
use super::source::SourceFile;
use super::span::{collect_span, span_text, SpanStrategy};
use crate::utils::template::render_map;

/// Counters for one pass, one transform, or one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteStats {
    /// Start lines (or content matches) found.
    pub matched: usize,
    /// Lines or content matches changed in place.
    pub rewritten: usize,
    /// Lines added after spans.
    pub inserted: usize,
    /// Insertions suppressed by a guard.
    pub skipped: usize,
    /// Spans that ran to end-of-file without closing.
    pub unclosed_spans: usize,
}

impl RewriteStats {
    pub fn changed(&self) -> bool {
        self.rewritten > 0 || self.inserted > 0
    }
}

impl AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.matched += other.matched;
        self.rewritten += other.rewritten;
        self.inserted += other.inserted;
        self.skipped += other.skipped;
        self.unclosed_spans += other.unclosed_spans;
    }
}

/// Block inserted immediately after a span unless its guard fires.
#[derive(Debug, Clone)]
pub struct Insertion {
    pub template: Template,
    pub guard: Option<Guard>,
}

/// Rewrite of the line two past the span when the line right after it holds `anchor`.
#[derive(Debug, Clone)]
pub struct FollowUp {
    pub anchor: String,
    pub edit: LineEdit,
}

/// One scan/match/inject pass over a file's lines.
pub struct LineRule {
    pub matcher: Box<dyn Matcher>,
    pub span: SpanStrategy,
    /// Only rewrite spans whose text contains this substring.
    pub require: Option<String>,
    pub rewrite_start: Option<LineEdit>,
    pub rewrite_end: Option<LineEdit>,
    pub replace_span: Option<Template>,
    pub insert_after: Option<Insertion>,
    pub follow_up: Option<FollowUp>,
}

impl LineRule {
    pub fn new(matcher: Box<dyn Matcher>, span: SpanStrategy) -> Self {
        Self {
            matcher,
            span,
            require: None,
            rewrite_start: None,
            rewrite_end: None,
            replace_span: None,
            insert_after: None,
            follow_up: None,
        }
    }

    /// Single forward pass. Lines inside a collected span are never matched again.
    pub fn apply(&self, lines: &[String]) -> (Vec<String>, RewriteStats) {
        let mut out = Vec::with_capacity(lines.len());
        let mut stats = RewriteStats::default();
        let mut i = 0;

        while i < lines.len() {
            let Some(mut m) = self.matcher.match_line(&lines[i]) else {
                out.push(lines[i].clone());
                i += 1;
                continue;
            };

            let span = collect_span(lines, i, &self.span);
            stats.matched += 1;
            if !span.closed {
                stats.unclosed_spans += 1;
            }
            m.insert("end_indent", leading_whitespace(&lines[span.end]));

            let original = &lines[span.start..=span.end];

            if let Some(required) = &self.require {
                if !span_text(lines, &span).contains(required.as_str()) {
                    out.extend(original.iter().cloned());
                    i = span.end + 1;
                    continue;
                }
            }

            if let Some(template) = &self.replace_span {
                let rendered = template.render_lines(&m);
                if rendered.as_slice() != original {
                    stats.rewritten += original.len();
                }
                out.extend(rendered);
            } else {
                for (idx, line) in original.iter().enumerate() {
                    let at = span.start + idx;
                    let mut edited = line.clone();
                    if at == span.start {
                        if let Some(edit) = &self.rewrite_start {
                            edited = edit.apply(&edited, &m);
                        }
                    }
                    if at == span.end {
                        if let Some(edit) = &self.rewrite_end {
                            edited = edit.apply(&edited, &m);
                        }
                    }
                    if edited != *line {
                        stats.rewritten += 1;
                    }
                    out.push(edited);
                }
            }

            if let Some(insertion) = &self.insert_after {
                let guarded = insertion
                    .guard
                    .as_ref()
                    .is_some_and(|g| g.already_applied(lines, span.end, &m));
                if guarded {
                    stats.skipped += 1;
                } else {
                    let block = insertion.template.render_lines(&m);
                    stats.inserted += block.len();
                    out.extend(block);
                }
            }

            let mut next = span.end + 1;
            if let Some(follow) = &self.follow_up {
                if next + 1 < lines.len() && lines[next].contains(follow.anchor.as_str()) {
                    out.push(lines[next].clone());
                    let edited = follow.edit.apply(&lines[next + 1], &m);
                    if edited != lines[next + 1] {
                        stats.rewritten += 1;
                    }
                    out.push(edited);
                    next += 2;
                }
            }

            i = next;
        }

        (out, stats)
    }
}

/// Whole-content regex substitution for constructs that span several lines.
///
/// The replacement is a template over the pattern's captures: named groups
/// by name, every group by position ("1", "2", ...).
#[derive(Debug, Clone)]
pub struct ContentRule {
    pub pattern: Regex,
    pub replace: Template,
}

impl ContentRule {
    pub fn new(pattern: Regex, replace: impl Into<String>) -> Self {
        Self {
            pattern,
            replace: Template::new(replace),
        }
    }

    pub fn apply(&self, content: &str) -> (String, RewriteStats) {
        let mut stats = RewriteStats::default();

        let replaced = self
            .pattern
            .replace_all(content, |caps: &regex::Captures| {
                let mut vars = BTreeMap::new();
                for (idx, name) in self.pattern.capture_names().enumerate().skip(1) {
                    let Some(group) = caps.get(idx) else {
                        continue;
                    };
                    vars.insert(idx.to_string(), group.as_str().to_string());
                    if let Some(name) = name {
                        vars.insert(name.to_string(), group.as_str().to_string());
                    }
                }

                let whole = caps.get(0).map(|g| g.as_str()).unwrap_or_default();
                let rendered = render_map(self.replace.as_str(), &vars);
                stats.matched += 1;
                if rendered != whole {
                    stats.rewritten += 1;
                }
                rendered
            })
            .into_owned();

        (replaced, stats)
    }
}

/// One step of a transform.
pub enum Pass {
    Lines(LineRule),
    Content(ContentRule),
}

impl Pass {
    pub fn apply(&self, file: &mut SourceFile) -> RewriteStats {
        match self {
            Pass::Lines(rule) => {
                let (lines, stats) = rule.apply(&file.lines);
                if stats.changed() {
                    file.lines = lines;
                }
                stats
            }
            Pass::Content(rule) => {
                let before = file.joined();
                let (after, stats) = rule.apply(&before);
                if after != before {
                    file.set_joined(&after);
                }
                stats
            }
        }
    }
}

/// A named, ordered list of passes applied to a file in memory.
pub struct Transform {
    pub name: String,
    pub description: String,
    pub passes: Vec<Pass>,
}

impl Transform {
    pub fn apply(&self, file: &mut SourceFile) -> RewriteStats {
        let mut total = RewriteStats::default();
        for pass in &self.passes {
            total += pass.apply(file);
        }
        total
    }
}
