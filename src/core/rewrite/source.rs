/// Line terminator detected in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A file held as an ordered sequence of lines without terminators.
///
/// `parse` followed by `render` reproduces the input byte for byte. CRLF is
/// only assumed when every line break in the file is CRLF; otherwise any
/// stray `\r` stays part of its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl SourceFile {
    pub fn parse(content: &str) -> Self {
        if content.is_empty() {
            return Self {
                lines: Vec::new(),
                line_ending: LineEnding::Lf,
                trailing_newline: false,
            };
        }

        let breaks = content.matches('\n').count();
        let crlf_breaks = content.matches("\r\n").count();
        let line_ending = if breaks > 0 && breaks == crlf_breaks {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        };

        let trailing_newline = content.ends_with('\n');
        let body = if trailing_newline {
            &content[..content.len() - line_ending.as_str().len()]
        } else {
            content
        };

        let lines = body
            .split(line_ending.as_str())
            .map(|s| s.to_string())
            .collect();

        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }

        let sep = self.line_ending.as_str();
        let mut out = self.lines.join(sep);
        if self.trailing_newline {
            out.push_str(sep);
        }
        out
    }

    /// Lines joined with `\n`, the form whole-content passes operate on.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the lines from `\n`-joined content produced by a content pass.
    pub fn set_joined(&mut self, content: &str) {
        self.lines = content.split('\n').map(|s| s.to_string()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_preserves_lf_with_trailing_newline() {
        let content = "a\nb\n";
        let file = SourceFile::parse(content);
        assert_eq!(file.lines, vec!["a", "b"]);
        assert!(file.trailing_newline);
        assert_eq!(file.render(), content);
    }

    #[test]
    fn parse_render_preserves_missing_trailing_newline() {
        let content = "a\n\nb";
        let file = SourceFile::parse(content);
        assert_eq!(file.lines, vec!["a", "", "b"]);
        assert!(!file.trailing_newline);
        assert_eq!(file.render(), content);
    }

    #[test]
    fn parse_render_preserves_crlf() {
        let content = "a\r\nb\r\n";
        let file = SourceFile::parse(content);
        assert_eq!(file.line_ending, LineEnding::CrLf);
        assert_eq!(file.lines, vec!["a", "b"]);
        assert_eq!(file.render(), content);
    }

    #[test]
    fn mixed_endings_fall_back_to_lf_and_round_trip() {
        let content = "a\r\nb\nc\n";
        let file = SourceFile::parse(content);
        assert_eq!(file.line_ending, LineEnding::Lf);
        assert_eq!(file.lines, vec!["a\r", "b", "c"]);
        assert_eq!(file.render(), content);
    }

    #[test]
    fn empty_content_round_trips() {
        let file = SourceFile::parse("");
        assert!(file.lines.is_empty());
        assert_eq!(file.render(), "");
    }
}
