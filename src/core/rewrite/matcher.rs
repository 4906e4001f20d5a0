use std::collections::BTreeMap;

use regex::Regex;

/// Captured values from a start-line match, keyed by group name.
///
/// Always carries `indent` (leading whitespace of the start line) unless the
/// pattern names its own `indent` group. Positional groups are keyed "1", "2", ...
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    vars: BTreeMap<String, String>,
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.as_str())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    fn with_indent(line: &str) -> Self {
        let mut m = Self::new();
        m.insert("indent", leading_whitespace(line));
        m
    }
}

/// Leading spaces and tabs of a line.
pub(crate) fn leading_whitespace(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Recognises the first line of a target construct.
pub trait Matcher {
    fn match_line(&self, line: &str) -> Option<Match>;
}

/// Start pattern as a regular expression, with an optional veto pattern.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    pattern: Regex,
    unless: Option<Regex>,
}

impl RegexMatcher {
    pub fn new(pattern: Regex, unless: Option<Regex>) -> Self {
        Self { pattern, unless }
    }
}

impl Matcher for RegexMatcher {
    fn match_line(&self, line: &str) -> Option<Match> {
        if self.unless.as_ref().is_some_and(|re| re.is_match(line)) {
            return None;
        }

        let caps = self.pattern.captures(line)?;
        let mut m = Match::with_indent(line);

        for (idx, name) in self.pattern.capture_names().enumerate().skip(1) {
            let Some(group) = caps.get(idx) else {
                continue;
            };
            m.insert(idx.to_string(), group.as_str());
            if let Some(name) = name {
                m.insert(name, group.as_str());
            }
        }

        Some(m)
    }
}

/// Start pattern as a fixed substring.
#[derive(Debug, Clone)]
pub struct ContainsMatcher {
    needle: String,
    unless: Option<Regex>,
}

impl ContainsMatcher {
    pub fn new(needle: impl Into<String>, unless: Option<Regex>) -> Self {
        Self {
            needle: needle.into(),
            unless,
        }
    }
}

impl Matcher for ContainsMatcher {
    fn match_line(&self, line: &str) -> Option<Match> {
        if !line.contains(&self.needle) {
            return None;
        }
        if self.unless.as_ref().is_some_and(|re| re.is_match(line)) {
            return None;
        }
        Some(Match::with_indent(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit_matcher() -> RegexMatcher {
        RegexMatcher::new(
            Regex::new(
                r"^\s*(?P<kw>const|let|var)\s+(?P<var>\w*[Oo]bs\w*[Ii]d\w*)\s*=\s*await observationService\.submit\(",
            )
            .unwrap(),
            Some(Regex::new(r"^\s*(?:const|let|var)\s+_result_").unwrap()),
        )
    }

    #[test]
    fn regex_matcher_extracts_named_and_positional_groups() {
        let m = submit_matcher()
            .match_line("      const obs2Id = await observationService.submit({")
            .unwrap();
        assert_eq!(m.get("var"), Some("obs2Id"));
        assert_eq!(m.get("kw"), Some("const"));
        assert_eq!(m.get("1"), Some("const"));
        assert_eq!(m.get("2"), Some("obs2Id"));
        assert_eq!(m.get("indent"), Some("      "));
    }

    #[test]
    fn regex_matcher_rejects_non_matching_line() {
        assert!(submit_matcher()
            .match_line("      const result = await observationService.submit({")
            .is_none());
        assert!(submit_matcher().match_line("expect(obsId).toBe(1);").is_none());
    }

    #[test]
    fn unless_pattern_vetoes_match() {
        assert!(submit_matcher()
            .match_line("  const _result_obsId = await observationService.submit({")
            .is_none());
    }

    #[test]
    fn named_indent_group_overrides_builtin() {
        let matcher = RegexMatcher::new(Regex::new(r"^(?P<indent> )\s*x").unwrap(), None);
        let m = matcher.match_line("    x").unwrap();
        assert_eq!(m.get("indent"), Some(" "));
    }

    #[test]
    fn contains_matcher_captures_indent() {
        let matcher = ContainsMatcher::new("await observationService.submit({", None);
        let m = matcher
            .match_line("\t\tawait observationService.submit({")
            .unwrap();
        assert_eq!(m.get("indent"), Some("\t\t"));
        assert!(matcher.match_line("await other.submit({").is_none());
    }

    #[test]
    fn leading_whitespace_handles_blank_lines() {
        assert_eq!(leading_whitespace(""), "");
        assert_eq!(leading_whitespace("   "), "   ");
        assert_eq!(leading_whitespace("  a b"), "  ");
    }
}
