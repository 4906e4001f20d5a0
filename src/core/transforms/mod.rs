//! Transform catalog: built-ins plus configured transforms, compiled to
//! runnable passes.
//!
//! Compilation fails fast on regexes that do not compile and on template
//! placeholders that name no capture, so a bad definition never reaches a file.

mod builtin;
mod spec;

use regex::Regex;

use crate::error::{Error, Result};
use crate::rewrite::{
    ContainsMatcher, ContentRule, FollowUp, Insertion, LineEdit, LineRule, Matcher, Pass,
    RegexMatcher, SpanStrategy, Template, Transform,
};
use crate::utils::template::placeholders;

pub use builtin::RECOMMENDED_ORDER;
pub use spec::{
    ContentRuleSpec, EditSpec, FollowUpSpec, InsertSpec, LineRuleSpec, PassSpec, StartSpec,
    TransformSpec,
};

/// Captures every line rule provides regardless of its start pattern.
const BUILTIN_CAPTURES: &[&str] = &["indent", "end_indent"];

/// Available transform definitions, built-ins first.
#[derive(Debug, Clone)]
pub struct Catalog {
    specs: Vec<TransformSpec>,
    custom: Vec<String>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            specs: builtin::all(),
            custom: Vec::new(),
        }
    }

    /// Built-ins plus `custom`. A custom transform replaces a built-in of the same name.
    pub fn with_custom(custom: &[TransformSpec]) -> Self {
        let mut catalog = Self::builtin();
        for spec in custom {
            if let Some(existing) = catalog.specs.iter_mut().find(|s| s.name == spec.name) {
                *existing = spec.clone();
            } else {
                catalog.specs.push(spec.clone());
            }
            catalog.custom.push(spec.name.clone());
        }
        catalog
    }

    pub fn specs(&self) -> &[TransformSpec] {
        &self.specs
    }

    pub fn names(&self) -> Vec<String> {
        self.specs.iter().map(|s| s.name.clone()).collect()
    }

    pub fn is_custom(&self, name: &str) -> bool {
        self.custom.iter().any(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Result<&TransformSpec> {
        self.specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::transform_not_found(name, self.names()))
    }

    /// Compile the named transforms, preserving the requested order.
    pub fn compile(&self, names: &[String]) -> Result<Vec<Transform>> {
        if names.is_empty() {
            return Err(Error::validation_missing_argument(vec![
                "transform".to_string()
            ]));
        }
        names.iter().map(|name| compile(self.get(name)?)).collect()
    }
}

/// Compile one definition into runnable passes.
pub fn compile(spec: &TransformSpec) -> Result<Transform> {
    let passes = spec
        .passes
        .iter()
        .enumerate()
        .map(|(idx, pass)| compile_pass(&spec.name, idx, pass))
        .collect::<Result<Vec<_>>>()?;

    Ok(Transform {
        name: spec.name.clone(),
        description: spec.description.clone(),
        passes,
    })
}

fn compile_pass(transform: &str, idx: usize, pass: &PassSpec) -> Result<Pass> {
    match pass {
        PassSpec::Lines(rule) => compile_line_rule(transform, idx, rule).map(Pass::Lines),
        PassSpec::Content(rule) => {
            let pattern = compile_regex(transform, &rule.pattern)?;
            let known = capture_names(&pattern);
            check_placeholders(transform, idx, "replace", &rule.replace, &known)?;
            Ok(Pass::Content(ContentRule::new(pattern, rule.replace.clone())))
        }
    }
}

fn compile_line_rule(transform: &str, idx: usize, spec: &LineRuleSpec) -> Result<LineRule> {
    let unless = spec
        .start
        .unless
        .as_deref()
        .map(|p| compile_regex(transform, p))
        .transpose()?;

    let mut known: Vec<String> = BUILTIN_CAPTURES.iter().map(|s| s.to_string()).collect();

    let matcher: Box<dyn Matcher> = match (&spec.start.regex, &spec.start.contains) {
        (Some(pattern), None) => {
            let re = compile_regex(transform, pattern)?;
            known.extend(capture_names(&re));
            Box::new(RegexMatcher::new(re, unless))
        }
        (None, Some(needle)) if !needle.is_empty() => {
            Box::new(ContainsMatcher::new(needle.clone(), unless))
        }
        _ => {
            return Err(Error::config_invalid_value(
                format!("{}.passes[{}].match", transform, idx),
                None,
                "Set exactly one of 'regex' or a non-empty 'contains'",
            ))
        }
    };

    if let SpanStrategy::Terminator { token } = &spec.span {
        if token.is_empty() {
            return Err(Error::config_invalid_value(
                format!("{}.passes[{}].span.token", transform, idx),
                Some(String::new()),
                "Terminator token must not be empty",
            ));
        }
    }

    let mut rule = LineRule::new(matcher, spec.span.clone());
    rule.require = spec.require.clone();

    if let Some(edit) = &spec.rewrite_start {
        check_placeholders(transform, idx, "rewrite_start", &edit.replace, &known)?;
        rule.rewrite_start = Some(LineEdit::new(
            compile_regex(transform, &edit.pattern)?,
            edit.replace.clone(),
        ));
    }

    if let Some(edit) = &spec.rewrite_end {
        check_placeholders(transform, idx, "rewrite_end", &edit.replace, &known)?;
        rule.rewrite_end = Some(LineEdit::new(
            compile_regex(transform, &edit.pattern)?,
            edit.replace.clone(),
        ));
    }

    if let Some(template) = &spec.replace_span {
        check_placeholders(transform, idx, "replace_span", template, &known)?;
        rule.replace_span = Some(Template::new(template.clone()));
    }

    if let Some(insert) = &spec.insert_after {
        check_placeholders(transform, idx, "insert_after", &insert.template, &known)?;
        if let Some(guard) = &insert.guard {
            if guard.marker.is_empty() {
                return Err(Error::config_invalid_value(
                    format!("{}.passes[{}].insert_after.guard.marker", transform, idx),
                    None,
                    "Guard marker must not be empty",
                ));
            }
            check_placeholders(transform, idx, "insert_after.guard", &guard.marker, &known)?;
        }
        rule.insert_after = Some(Insertion {
            template: Template::new(insert.template.clone()),
            guard: insert.guard.clone(),
        });
    }

    if let Some(follow) = &spec.follow_up {
        check_placeholders(transform, idx, "follow_up", &follow.replace, &known)?;
        rule.follow_up = Some(FollowUp {
            anchor: follow.anchor.clone(),
            edit: LineEdit::new(compile_regex(transform, &follow.pattern)?, follow.replace.clone()),
        });
    }

    Ok(rule)
}

fn compile_regex(transform: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::pattern_invalid(transform, pattern, e))
}

/// Named groups plus positional indices ("1", "2", ...).
fn capture_names(re: &Regex) -> Vec<String> {
    re.capture_names()
        .enumerate()
        .skip(1)
        .flat_map(|(idx, name)| {
            std::iter::once(idx.to_string()).chain(name.map(|n| n.to_string()))
        })
        .collect()
}

fn check_placeholders(
    transform: &str,
    idx: usize,
    field: &str,
    template: &str,
    known: &[String],
) -> Result<()> {
    for name in placeholders(template) {
        if !known.contains(&name) {
            return Err(Error::config_invalid_value(
                format!("{}.passes[{}].{}", transform, idx, field),
                Some(name.clone()),
                format!(
                    "Placeholder '{{{{{}}}}}' does not name a capture (known: {})",
                    name,
                    known.join(", ")
                ),
            ));
        }
    }
    Ok(())
}
