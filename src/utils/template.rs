//! String template rendering utilities.
//!
//! Placeholders are written `{{name}}`. Single braces pass through untouched,
//! so templates can carry source code blocks verbatim.

use std::collections::BTreeMap;

pub fn render_map(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

/// Names of every `{{name}}` placeholder in the template, in order of first use.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !names.iter().any(|n| n == name)
        {
            names.push(name.to_string());
        }
        rest = &after[end + 2..];
    }

    names
}
