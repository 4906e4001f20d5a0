use serde::{Deserialize, Serialize};

/// How far a matched construct extends past its start line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanStrategy {
    /// The construct is the start line alone.
    #[default]
    Line,
    /// Consume lines until one contains `token`. The start line is checked first.
    Terminator { token: String },
    /// Track `open` minus `close` from the start line until it falls back to zero.
    Braces {
        #[serde(default = "default_open")]
        open: char,
        #[serde(default = "default_close")]
        close: char,
    },
}

fn default_open() -> char {
    '{'
}

fn default_close() -> char {
    '}'
}

impl SpanStrategy {
    pub fn terminator(token: impl Into<String>) -> Self {
        SpanStrategy::Terminator {
            token: token.into(),
        }
    }

    pub fn braces() -> Self {
        SpanStrategy::Braces {
            open: default_open(),
            close: default_close(),
        }
    }
}

/// Inclusive line range of one logical statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// False when end-of-file was reached before the terminator or balance.
    pub closed: bool,
}

/// Determine the end of the construct starting at `start`.
///
/// Always terminates: without a terminator or balance-zero the span runs to
/// the last line and is marked unclosed.
pub fn collect_span(lines: &[String], start: usize, strategy: &SpanStrategy) -> Span {
    let last = lines.len().saturating_sub(1);
    if start >= lines.len() {
        return Span {
            start,
            end: start,
            closed: false,
        };
    }

    match strategy {
        SpanStrategy::Line => Span {
            start,
            end: start,
            closed: true,
        },
        SpanStrategy::Terminator { token } => {
            let mut i = start;
            loop {
                if lines[i].contains(token.as_str()) {
                    return Span {
                        start,
                        end: i,
                        closed: true,
                    };
                }
                if i >= last {
                    return Span {
                        start,
                        end: last,
                        closed: false,
                    };
                }
                i += 1;
            }
        }
        SpanStrategy::Braces { open, close } => {
            let delta = |line: &str| {
                line.matches(*open).count() as i64 - line.matches(*close).count() as i64
            };

            let mut balance = delta(&lines[start]);
            let mut i = start;
            while balance > 0 {
                if i >= last {
                    return Span {
                        start,
                        end: last,
                        closed: false,
                    };
                }
                i += 1;
                balance += delta(&lines[i]);
            }

            Span {
                start,
                end: i,
                closed: true,
            }
        }
    }
}

/// Text of the span, lines joined with `\n`.
pub fn span_text(lines: &[String], span: &Span) -> String {
    let end = span.end.min(lines.len().saturating_sub(1));
    if span.start > end || lines.is_empty() {
        return String::new();
    }
    lines[span.start..=end].join("\n")
}
