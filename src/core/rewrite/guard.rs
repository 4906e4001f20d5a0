use serde::{Deserialize, Serialize};

use super::matcher::Match;
use crate::utils::template::render_map;

/// Lines inspected after a span when no window is configured.
pub const DEFAULT_WINDOW: usize = 10;

fn default_window() -> usize {
    DEFAULT_WINDOW
}

/// Forward lookahead that detects an insertion made by an earlier run.
///
/// A marker further than `window` lines past the span is not seen, so the
/// insertion would be repeated. Markers may reference match captures with
/// `{{name}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    pub marker: String,
    #[serde(default = "default_window")]
    pub window: usize,
}

impl Guard {
    pub fn new(marker: impl Into<String>, window: usize) -> Self {
        Self {
            marker: marker.into(),
            window,
        }
    }

    /// True when the rendered marker appears in lines `span_end + 1 ..= span_end + window`.
    pub fn already_applied(&self, lines: &[String], span_end: usize, m: &Match) -> bool {
        let marker = render_map(&self.marker, m.vars());
        let from = span_end + 1;
        let to = from.saturating_add(self.window).min(lines.len());

        from < to && lines[from..to].iter().any(|line| line.contains(&marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_marker_inside_window() {
        let src = lines("submit();\n\n// derive\nderiveFromObservation(obs);");
        let guard = Guard::new("deriveFromObservation", 5);
        assert!(guard.already_applied(&src, 0, &Match::new()));
    }

    #[test]
    fn misses_marker_beyond_window() {
        let src = lines("submit();\na\nb\nc\nderiveFromObservation(obs);");
        let guard = Guard::new("deriveFromObservation", 3);
        assert!(!guard.already_applied(&src, 0, &Match::new()));
    }

    #[test]
    fn does_not_look_at_span_itself() {
        let src = lines("deriveFromObservation(obs);\nnext();");
        let guard = Guard::new("deriveFromObservation", 10);
        assert!(!guard.already_applied(&src, 0, &Match::new()));
    }

    #[test]
    fn window_clamped_at_eof() {
        let src = lines("submit();");
        let guard = Guard::new("anything", 10);
        assert!(!guard.already_applied(&src, 0, &Match::new()));
    }

    #[test]
    fn marker_renders_captures() {
        let src = lines("submit();\nconst obsId = _result_obsId.observationId;");
        let mut m = Match::new();
        m.insert("var", "obsId");
        let guard = Guard::new("_result_{{var}}.observationId", 1);
        assert!(guard.already_applied(&src, 0, &m));

        m.insert("var", "otherId");
        assert!(!guard.already_applied(&src, 0, &m));
    }

    #[test]
    fn window_defaults_when_omitted() {
        let guard: Guard = serde_json::from_str(r#"{"marker":"x"}"#).unwrap();
        assert_eq!(guard.window, DEFAULT_WINDOW);
    }
}
