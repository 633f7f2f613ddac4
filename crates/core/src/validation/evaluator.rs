//! Rule evaluator — pure logic, no registry or I/O access.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::format::{parse, Parsed, StrftimeItems};
use regex::Regex;
use serde_json::{json, Value};

use super::rules::{CustomOutcome, CustomValidator, ExpectedType, Rule, RuleParams, Violation};
use crate::types::FieldMap;

/// Evaluate one rule against the field map, producing at most one violation.
///
/// Every rule type except `required` skips silently when the field is
/// missing, null, or the empty string, so an absent optional field is
/// reported once (by `required`, if declared) rather than once per rule.
///
/// `custom` holds the validator resolved from the registry's side-table for
/// `custom` rules; it is ignored for every other rule type.
pub fn evaluate_rule(
    rule: &Rule,
    fields: &FieldMap,
    custom: Option<&CustomValidator>,
) -> Option<Violation> {
    let value = fields.get(&rule.field);

    if matches!(rule.params, RuleParams::Required) {
        return evaluate_required(rule, value);
    }

    let value = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.is_empty() => return None,
        Some(v) => v,
    };

    match &rule.params {
        RuleParams::Required => None,
        RuleParams::Type { expected } => evaluate_type(rule, *expected, value),
        RuleParams::Range { min, max } => evaluate_range(rule, *min, *max, value),
        RuleParams::Regex { pattern, compiled } => evaluate_regex(rule, pattern, compiled, value),
        RuleParams::Length { min, max } => evaluate_length(rule, *min, *max, value),
        RuleParams::Enum { allowed } => evaluate_enum(rule, allowed, value),
        RuleParams::DateFormat { format } => evaluate_date_format(rule, format, value),
        RuleParams::Custom => evaluate_custom(rule, value, custom),
    }
}

/// `required` fails on missing, null, empty string, and empty collections.
/// Numeric `0` and `false` count as present.
fn evaluate_required(rule: &Rule, value: Option<&Value>) -> Option<Violation> {
    let empty = match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    };
    if !empty {
        return None;
    }
    Some(Violation::new(
        rule,
        format!("Field '{}' is required", rule.field),
        json!("non-empty value"),
        value.cloned().unwrap_or(Value::Null),
    ))
}

fn evaluate_type(rule: &Rule, expected: ExpectedType, value: &Value) -> Option<Violation> {
    if expected.matches(value) {
        return None;
    }
    Some(type_mismatch(rule, expected.as_str(), value))
}

fn evaluate_range(rule: &Rule, min: f64, max: f64, value: &Value) -> Option<Violation> {
    let Some(num) = value.as_f64() else {
        return Some(type_mismatch(rule, "number", value));
    };
    if num >= min && num <= max {
        return None;
    }
    Some(Violation::new(
        rule,
        format!("Field '{}' must be between {min} and {max}", rule.field),
        json!(format!("between {min} and {max}")),
        value.clone(),
    ))
}

fn evaluate_regex(
    rule: &Rule,
    pattern: &str,
    compiled: &Regex,
    value: &Value,
) -> Option<Violation> {
    let Some(s) = value.as_str() else {
        return Some(type_mismatch(rule, "string", value));
    };
    if compiled.is_match(s) {
        return None;
    }
    Some(Violation::new(
        rule,
        format!("Field '{}' does not match required pattern", rule.field),
        json!(format!("pattern: {pattern}")),
        value.clone(),
    ))
}

fn evaluate_length(rule: &Rule, min: usize, max: usize, value: &Value) -> Option<Violation> {
    let len = match value {
        Value::String(s) => s.chars().count(),
        Value::Array(a) => a.len(),
        other => return Some(type_mismatch(rule, "string or array", other)),
    };
    if len >= min && len <= max {
        return None;
    }
    Some(Violation::new(
        rule,
        format!(
            "Field '{}' length must be between {min} and {max}",
            rule.field
        ),
        json!(format!("length between {min} and {max}")),
        json!(format!("length = {len}")),
    ))
}

fn evaluate_enum(rule: &Rule, allowed: &[Value], value: &Value) -> Option<Violation> {
    if allowed.contains(value) {
        return None;
    }
    let listing = allowed
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ");
    Some(Violation::new(
        rule,
        format!("Field '{}' must be one of: {listing}", rule.field),
        Value::Array(allowed.to_vec()),
        value.clone(),
    ))
}

fn evaluate_date_format(rule: &Rule, format: &str, value: &Value) -> Option<Violation> {
    let matches = value.as_str().is_some_and(|s| parses_with_format(s, format));
    if matches {
        return None;
    }
    Some(Violation::new(
        rule,
        format!("Field '{}' must match date format {format}", rule.field),
        json!(format),
        value.clone(),
    ))
}

/// strptime-style check: the format must consume the whole string and every
/// parsed field must be in range, but the fields are not required to form a
/// complete date (`%Y-%m` alone is a valid format).
fn parses_with_format(s: &str, format: &str) -> bool {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(format)).is_ok()
}

fn evaluate_custom(
    rule: &Rule,
    value: &Value,
    custom: Option<&CustomValidator>,
) -> Option<Violation> {
    let Some(validator) = custom else {
        return Some(Violation::new(
            rule,
            format!("No custom validator registered for rule '{}'", rule.rule_id),
            Value::Null,
            value.clone(),
        ));
    };
    let validator = validator.as_ref();
    match catch_unwind(AssertUnwindSafe(|| validator(value))) {
        Ok(CustomOutcome::Pass) => None,
        Ok(CustomOutcome::Fail(message)) => {
            Some(Violation::new(rule, message, Value::Null, value.clone()))
        }
        // A panicking validator fails the rule, never the process.
        Err(_) => Some(Violation::new(
            rule,
            format!("Custom validator for rule '{}' panicked", rule.rule_id),
            Value::Null,
            value.clone(),
        )),
    }
}

fn type_mismatch(rule: &Rule, expected: &str, value: &Value) -> Violation {
    Violation::new(
        rule,
        format!(
            "Field '{}' expected type {expected}, got {}",
            rule.field,
            json_type_name(value)
        ),
        json!(expected),
        value.clone(),
    )
}

/// Human-readable name of a JSON value's runtime type.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
