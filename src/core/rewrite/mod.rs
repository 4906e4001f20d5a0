//! Line-scanner rewriter: find a construct by pattern, collect its span,
//! and emit substitutions or insertions around it.
//!
//! This is syntactic pattern matching, not semantic parsing. Constructs
//! are recognised by regular expressions and their extent by terminator
//! tokens or delimiter balance. Unusually formatted input may be missed or
//! mismatched; that is an accepted limitation of the approach.
//!
//! Layers, leaves first:
//! - `matcher` - recognise a start line, extract captures
//! - `span` - find where the matched construct ends
//! - `guard` - bounded lookahead that keeps insertions idempotent
//! - `emit` - templates and line edits that produce output lines
//! - `rule` - the single scan/match/inject loop, plus whole-content passes

mod emit;
mod guard;
mod matcher;
mod rule;
mod source;
mod span;

pub use emit::{LineEdit, Template};
pub use guard::{Guard, DEFAULT_WINDOW};
pub use matcher::{ContainsMatcher, Match, Matcher, RegexMatcher};
pub use rule::{ContentRule, FollowUp, Insertion, LineRule, Pass, RewriteStats, Transform};
pub use source::{LineEnding, SourceFile};
pub use span::{collect_span, span_text, Span, SpanStrategy};
