//! Serializable transform definitions.
//!
//! Built-in transforms and those declared in `rescribe.json` share this
//! schema and are compiled through the same path.

use serde::{Deserialize, Serialize};

use crate::rewrite::{Guard, SpanStrategy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub passes: Vec<PassSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassSpec {
    Lines(LineRuleSpec),
    Content(ContentRuleSpec),
}

/// How the start line of a construct is recognised. Exactly one of
/// `regex` or `contains` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSpec {
    pub pattern: String,
    pub replace: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertSpec {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Guard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpSpec {
    pub anchor: String,
    pub pattern: String,
    pub replace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRuleSpec {
    #[serde(rename = "match")]
    pub start: StartSpec,
    #[serde(default)]
    pub span: SpanStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_start: Option<EditSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_end: Option<EditSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_span: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<InsertSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUpSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRuleSpec {
    pub pattern: String,
    pub replace: String,
}
