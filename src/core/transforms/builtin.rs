//! Built-in transforms for the observation/violation integration tests.

use super::spec::{
    ContentRuleSpec, EditSpec, FollowUpSpec, InsertSpec, LineRuleSpec, PassSpec, StartSpec,
    TransformSpec,
};
use crate::rewrite::{Guard, SpanStrategy, DEFAULT_WINDOW};

/// Order in which the built-ins compose into a full migration.
pub const RECOMMENDED_ORDER: &[&str] = &[
    "fix-vehicle-fields",
    "add-submitted-by",
    "add-derivation",
    "fix-duplicate-obs",
    "fix-submit-response",
];

/// Assignment of an observation id from a submit call, e.g. `const obs2Id = await observationService.submit(`.
const SUBMIT_ASSIGNMENT: &str = r"^(?P<indent>\s*)(?P<kw>const|let|var)\s+(?P<var>\w*[Oo]bs\w*[Ii]d\w*)\s*=\s*await observationService\.submit\(";

const DERIVE_MARKER: &str = "deriveFromObservation";

const DERIVATION_BLOCK: &str = "
{{indent}}// Derive violations (as done by API)
{{indent}}const obs = await observationService.getById({{var}});
{{indent}}if (obs && obs.parkingPositionId) {
{{indent}}  const position = await parkingPositionService.getById(obs.parkingPositionId);
{{indent}}  await violationService.deriveFromObservation(obs, position, 'test-user');
{{indent}}}";

const LEGACY_DERIVATION_BLOCK: &str = "
      // Derive violations (as done by API)
      const obs = await observationService.getById(observationId);
      if (obs && obs.parkingPositionId) {
        const position = await parkingPositionService.getById(obs.parkingPositionId);
        await violationService.deriveFromObservation(obs, position, 'test-user');
      }";

const SHARED_DERIVATION: &str = r"(?m)^(?P<indent>[ \t]*)// Derive violations \(as done by API\)\n[ \t]*const obs = await observationService\.getById\((?P<var>\w+)\);\n[ \t]*if \(obs && obs\.parkingPositionId\) \{\n[ \t]*const position = await parkingPositionService\.getById\(obs\.parkingPositionId\);\n[ \t]*await violationService\.deriveFromObservation\(obs, position, 'test-user'\);\n[ \t]*\}";

const SCOPED_DERIVATION: &str = "{{indent}}// Derive violations (as done by API)
{{indent}}const _obs_{{var}} = await observationService.getById({{var}});
{{indent}}if (_obs_{{var}} && _obs_{{var}}.parkingPositionId) {
{{indent}}  const _pos_{{var}} = await parkingPositionService.getById(_obs_{{var}}.parkingPositionId);
{{indent}}  await violationService.deriveFromObservation(_obs_{{var}}, _pos_{{var}}, 'test-user');
{{indent}}}";

/// Vehicle fixture id, plate, issuing state.
const VEHICLES: &[(&str, &str, &str)] = &[
    ("abc123", "ABC123", "CA"),
    ("xyz789", "XYZ789", "WA"),
    ("def456", "DEF456", "OR"),
];

pub fn all() -> Vec<TransformSpec> {
    vec![
        add_derivation(),
        add_violation_derivation(),
        add_submitted_by(),
        fix_tests(),
        fix_vehicle_fields(),
        fix_duplicate_obs(),
        fix_submit_response(),
        simple_fix(),
    ]
}

fn lines(rule: LineRuleSpec) -> PassSpec {
    PassSpec::Lines(rule)
}

fn content(pattern: &str, replace: &str) -> PassSpec {
    PassSpec::Content(ContentRuleSpec {
        pattern: pattern.to_string(),
        replace: replace.to_string(),
    })
}

fn regex_start(pattern: &str) -> StartSpec {
    StartSpec {
        regex: Some(pattern.to_string()),
        ..StartSpec::default()
    }
}

fn contains_start(needle: &str) -> StartSpec {
    StartSpec {
        contains: Some(needle.to_string()),
        ..StartSpec::default()
    }
}

fn add_derivation() -> TransformSpec {
    TransformSpec {
        name: "add-derivation".to_string(),
        description: "Insert a violation derivation block after each observation submit assigned to an id variable".to_string(),
        passes: vec![lines(LineRuleSpec {
            start: regex_start(SUBMIT_ASSIGNMENT),
            span: SpanStrategy::terminator(");"),
            insert_after: Some(InsertSpec {
                template: DERIVATION_BLOCK.to_string(),
                guard: Some(Guard::new(DERIVE_MARKER, DEFAULT_WINDOW)),
            }),
            ..LineRuleSpec::default()
        })],
    }
}

fn add_violation_derivation() -> TransformSpec {
    TransformSpec {
        name: "add-violation-derivation".to_string(),
        description: "Legacy: insert a derivation block for submits that mention observationId".to_string(),
        passes: vec![lines(LineRuleSpec {
            start: contains_start("await observationService.submit("),
            span: SpanStrategy::terminator(");"),
            require: Some("observationId".to_string()),
            insert_after: Some(InsertSpec {
                template: LEGACY_DERIVATION_BLOCK.to_string(),
                guard: Some(Guard::new(DERIVE_MARKER, DEFAULT_WINDOW)),
            }),
            ..LineRuleSpec::default()
        })],
    }
}

fn add_submitted_by() -> TransformSpec {
    TransformSpec {
        name: "add-submitted-by".to_string(),
        description: "Pass 'test-user' as the second argument of multi-line observation submits".to_string(),
        passes: vec![lines(LineRuleSpec {
            start: contains_start("await observationService.submit({"),
            span: SpanStrategy::braces(),
            rewrite_end: Some(EditSpec {
                pattern: r"^(\s*)\}\)([;,])(\s*)$".to_string(),
                replace: "${1}}, 'test-user')${2}${3}".to_string(),
            }),
            ..LineRuleSpec::default()
        })],
    }
}

fn fix_tests() -> TransformSpec {
    TransformSpec {
        name: "fix-tests".to_string(),
        description: "Whole-file variant of add-submitted-by for submits whose object has no nested braces".to_string(),
        passes: vec![content(
            r"(?P<call>await observationService\.submit\(\{[^}]+\})\)(?P<delim>[,;])",
            "{{call}}, 'test-user'){{delim}}",
        )],
    }
}

fn fix_vehicle_fields() -> TransformSpec {
    // A reference on its own line becomes two indented lines; one inside an
    // inline object literal is replaced in place.
    let own_line = VEHICLES.iter().map(|(key, plate, state)| {
        lines(LineRuleSpec {
            start: regex_start(&format!(
                r"^(?P<indent>\s*)vehicleId: context\.vehicleIds\.{},(?P<rest>.*)$",
                key
            )),
            replace_span: Some(format!(
                "{{{{indent}}}}licensePlate: '{}',\n{{{{indent}}}}issuingState: '{}',{{{{rest}}}}",
                plate, state
            )),
            ..LineRuleSpec::default()
        })
    });
    let inline = VEHICLES.iter().map(|(key, plate, state)| {
        content(
            &format!(r"vehicleId: context\.vehicleIds\.{},", key),
            &format!("licensePlate: '{}', issuingState: '{}',", plate, state),
        )
    });
    let passes = own_line.chain(inline).collect();

    TransformSpec {
        name: "fix-vehicle-fields".to_string(),
        description: "Replace vehicleId fixture references with licensePlate and issuingState fields".to_string(),
        passes,
    }
}

fn fix_duplicate_obs() -> TransformSpec {
    TransformSpec {
        name: "fix-duplicate-obs".to_string(),
        description: "Give each derivation block its own _obs_/_pos_ temporaries so blocks can share a scope".to_string(),
        passes: vec![content(SHARED_DERIVATION, SCOPED_DERIVATION)],
    }
}

fn fix_submit_response() -> TransformSpec {
    TransformSpec {
        name: "fix-submit-response".to_string(),
        description: "Bind submit results to _result_<id> and extract the observation id from them".to_string(),
        passes: vec![lines(LineRuleSpec {
            start: StartSpec {
                regex: Some(SUBMIT_ASSIGNMENT.to_string()),
                contains: None,
                unless: Some(r"^\s*(?:const|let|var)\s+_result_".to_string()),
            },
            span: SpanStrategy::terminator(");"),
            rewrite_start: Some(EditSpec {
                pattern: r"(const|let|var)\s+(\w*[Oo]bs\w*[Ii]d\w*)\s*=".to_string(),
                replace: "{{kw}} _result_{{var}} =".to_string(),
            }),
            insert_after: Some(InsertSpec {
                template: "{{indent}}const {{var}} = _result_{{var}}.observationId;".to_string(),
                guard: None,
            }),
            follow_up: Some(FollowUpSpec {
                anchor: "// Derive violations".to_string(),
                pattern: r"const (_obs_\w+) = await observationService\.getById\((\w+)\);"
                    .to_string(),
                replace: "const ${1} = await observationService.getById({{var}});".to_string(),
            }),
            ..LineRuleSpec::default()
        })],
    }
}

fn simple_fix() -> TransformSpec {
    TransformSpec {
        name: "simple-fix".to_string(),
        description: "Extract observationId after `result = submit(...)` and collapse per-id derivation temporaries".to_string(),
        passes: vec![
            lines(LineRuleSpec {
                start: contains_start("result = await observationService.submit("),
                span: SpanStrategy::terminator(");"),
                insert_after: Some(InsertSpec {
                    template: "{{end_indent}}const observationId = result.observationId;"
                        .to_string(),
                    guard: Some(Guard::new("observationId = result.observationId", 1)),
                }),
                ..LineRuleSpec::default()
            }),
            content(
                r"const _obs_result = await observationService\.getById\(result\.observationId\);",
                "const _obs = await observationService.getById(observationId);",
            ),
            content(
                r"if \(_obs_\w+ && _obs_\w+\.parkingPositionId\) \{",
                "if (_obs && _obs.parkingPositionId) {",
            ),
            content(
                r"const _pos_\w+ = await parkingPositionService\.getById\(_obs_\w+\.parkingPositionId\);",
                "const _pos = await parkingPositionService.getById(_obs.parkingPositionId);",
            ),
            content(
                r"await violationService\.deriveFromObservation\(_obs_\w+, _pos_\w+,",
                "await violationService.deriveFromObservation(_obs, _pos,",
            ),
        ],
    }
}
