use std::collections::BTreeMap;

use regex::Regex;

use super::matcher::Match;
use crate::utils::template::render_map;

/// Text with `{{name}}` placeholders filled from match captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn render(&self, m: &Match) -> String {
        render_map(&self.0, m.vars())
    }

    /// Render and split on `\n` into output lines.
    pub fn render_lines(&self, m: &Match) -> Vec<String> {
        self.render(m).split('\n').map(|s| s.to_string()).collect()
    }
}

/// Regex substitution applied to a single line.
///
/// `replace` uses regex replacement syntax (`${1}`, `${name}`) for groups of
/// `pattern`, and `{{name}}` for captures of the start-line match. Capture
/// values are escaped so a `$` in an identifier stays literal.
#[derive(Debug, Clone)]
pub struct LineEdit {
    pattern: Regex,
    replace: Template,
}

impl LineEdit {
    pub fn new(pattern: Regex, replace: impl Into<String>) -> Self {
        Self {
            pattern,
            replace: Template::new(replace),
        }
    }

    pub fn apply(&self, line: &str, m: &Match) -> String {
        let escaped: BTreeMap<String, String> = m
            .vars()
            .iter()
            .map(|(k, v)| (k.clone(), v.replace('$', "$$")))
            .collect();
        let replacement = render_map(self.replace.as_str(), &escaped);

        self.pattern
            .replace_all(line, replacement.as_str())
            .into_owned()
    }
}
