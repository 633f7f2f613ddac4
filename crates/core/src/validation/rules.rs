//! Validation rule model: rule types, severities, typed parameters, and the
//! failure entry produced when a rule does not hold.

use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::Timestamp;

/// The supported rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Required,
    Type,
    Range,
    Regex,
    Length,
    Enum,
    DateFormat,
    Custom,
}

impl RuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Required => "required",
            RuleType::Type => "type",
            RuleType::Range => "range",
            RuleType::Regex => "regex",
            RuleType::Length => "length",
            RuleType::Enum => "enum",
            RuleType::DateFormat => "date_format",
            RuleType::Custom => "custom",
        }
    }
}

/// Violation severity.
///
/// Ordered so strict-mode threshold checks are an ordinal comparison:
/// `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Runtime JSON types accepted by the `type` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ExpectedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpectedType::String => "string",
            ExpectedType::Number => "number",
            ExpectedType::Boolean => "boolean",
            ExpectedType::Array => "array",
            ExpectedType::Object => "object",
        }
    }

    /// Whether a JSON value inhabits this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ExpectedType::String => value.is_string(),
            ExpectedType::Number => value.is_number(),
            ExpectedType::Boolean => value.is_boolean(),
            ExpectedType::Array => value.is_array(),
            ExpectedType::Object => value.is_object(),
        }
    }
}

/// Outcome of a custom validator call.
#[derive(Debug)]
pub enum CustomOutcome {
    Pass,
    /// Failure with the validator-supplied message.
    Fail(String),
}

/// Programmatically registered behavior for a `custom` rule, keyed by rule
/// id in the registry's side-table. The rule definition itself stays
/// serializable; only the side-table holds the function.
pub type CustomValidator = Arc<dyn Fn(&Value) -> CustomOutcome + Send + Sync>;

/// Type-specific rule configuration, validated when the schema loads.
///
/// Each variant carries exactly the parameters its rule type needs, so the
/// evaluator never re-checks parameter shapes at evaluation time.
#[derive(Debug, Clone)]
pub enum RuleParams {
    Required,
    Type {
        expected: ExpectedType,
    },
    /// Inclusive numeric bounds.
    Range {
        min: f64,
        max: f64,
    },
    /// Anchored semantics: `compiled` wraps the pattern as `^(?:…)$`, so it
    /// must match the entire string, not a substring.
    Regex {
        pattern: String,
        compiled: Regex,
    },
    /// Inclusive length bounds. Strings are measured in characters,
    /// arrays in elements.
    Length {
        min: usize,
        max: usize,
    },
    /// Membership is exact JSON equality, case-sensitive.
    Enum {
        allowed: Vec<Value>,
    },
    /// strftime-style format string, e.g. `%Y-%m-%d`.
    DateFormat {
        format: String,
    },
    Custom,
}

impl RuleParams {
    /// Parse and validate the raw `params` object for the given rule type.
    ///
    /// Any shape problem is reported as a message naming the offending
    /// parameter; the caller wraps it with schema/rule context.
    pub fn parse(rule_type: RuleType, raw: &Value) -> Result<Self, String> {
        match rule_type {
            RuleType::Required => Ok(RuleParams::Required),
            RuleType::Custom => Ok(RuleParams::Custom),
            RuleType::Type => {
                let name = raw
                    .get("expectedType")
                    .and_then(Value::as_str)
                    .ok_or("type rule requires a string `expectedType` param")?;
                let expected = match name {
                    "string" => ExpectedType::String,
                    "number" => ExpectedType::Number,
                    "boolean" => ExpectedType::Boolean,
                    "array" => ExpectedType::Array,
                    "object" => ExpectedType::Object,
                    other => return Err(format!("unknown expected type '{other}'")),
                };
                Ok(RuleParams::Type { expected })
            }
            RuleType::Range => {
                let min = require_f64(raw, "min", "range")?;
                let max = require_f64(raw, "max", "range")?;
                if min > max {
                    return Err(format!("range min {min} must not exceed max {max}"));
                }
                Ok(RuleParams::Range { min, max })
            }
            RuleType::Regex => {
                let pattern = raw
                    .get("pattern")
                    .and_then(Value::as_str)
                    .ok_or("regex rule requires a string `pattern` param")?;
                let compiled = Regex::new(&format!("^(?:{pattern})$"))
                    .map_err(|e| format!("invalid regex pattern '{pattern}': {e}"))?;
                Ok(RuleParams::Regex {
                    pattern: pattern.to_string(),
                    compiled,
                })
            }
            RuleType::Length => {
                let min = require_usize(raw, "min", "length")?;
                let max = require_usize(raw, "max", "length")?;
                if min > max {
                    return Err(format!("length min {min} must not exceed max {max}"));
                }
                Ok(RuleParams::Length { min, max })
            }
            RuleType::Enum => {
                let allowed = raw
                    .get("allowedValues")
                    .and_then(Value::as_array)
                    .ok_or("enum rule requires an `allowedValues` array param")?;
                if allowed.is_empty() {
                    return Err("enum rule requires at least one allowed value".to_string());
                }
                Ok(RuleParams::Enum {
                    allowed: allowed.clone(),
                })
            }
            RuleType::DateFormat => {
                let format = raw
                    .get("format")
                    .and_then(Value::as_str)
                    .ok_or("date_format rule requires a string `format` param")?;
                if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                    return Err(format!("invalid date format string '{format}'"));
                }
                Ok(RuleParams::DateFormat {
                    format: format.to_string(),
                })
            }
        }
    }

    /// Rebuild the declarative `params` object, used when serving schema
    /// detail back to callers.
    pub fn to_json(&self) -> Value {
        match self {
            RuleParams::Required | RuleParams::Custom => json!({}),
            RuleParams::Type { expected } => json!({ "expectedType": expected.as_str() }),
            RuleParams::Range { min, max } => json!({ "min": min, "max": max }),
            RuleParams::Regex { pattern, .. } => json!({ "pattern": pattern }),
            RuleParams::Length { min, max } => json!({ "min": min, "max": max }),
            RuleParams::Enum { allowed } => json!({ "allowedValues": allowed }),
            RuleParams::DateFormat { format } => json!({ "format": format }),
        }
    }
}

fn require_f64(raw: &Value, key: &str, rule: &str) -> Result<f64, String> {
    raw.get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| format!("{rule} rule requires a numeric `{key}` param"))
}

fn require_usize(raw: &Value, key: &str, rule: &str) -> Result<usize, String> {
    raw.get(key)
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .ok_or_else(|| format!("{rule} rule requires a non-negative integer `{key}` param"))
}

/// Declarative rule document as it appears in schema definition files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    /// Defaults to `{field}_{ruleType}` when omitted.
    #[serde(default)]
    pub rule_id: Option<String>,
    pub field: String,
    pub rule_type: RuleType,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    #[serde(default)]
    pub params: Value,
}

fn default_severity() -> Severity {
    Severity::Error
}

/// A single compiled validation rule. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique within its schema.
    pub rule_id: String,
    /// Dot-free key into the input field map.
    pub field: String,
    pub rule_type: RuleType,
    pub severity: Severity,
    pub params: RuleParams,
}

impl Rule {
    /// Rebuild the declarative document form of this rule.
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition {
            rule_id: Some(self.rule_id.clone()),
            field: self.field.clone(),
            rule_type: self.rule_type,
            severity: self.severity,
            params: self.params.to_json(),
        }
    }
}

/// A single failed rule evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    pub severity: Severity,
    /// Description of the satisfying condition.
    pub expected: Value,
    /// The offending value, or null when the field was absent.
    pub actual: Value,
    pub rule_id: Option<String>,
    /// Evaluation time, not rule-definition time.
    pub timestamp: Timestamp,
}

impl Violation {
    /// Build a violation for the given rule, stamped with the current time.
    pub fn new(rule: &Rule, message: String, expected: Value, actual: Value) -> Self {
        Self {
            field: rule.field.clone(),
            rule_type: rule.rule_type.as_str().to_string(),
            message,
            severity: rule.severity,
            expected,
            actual,
            rule_id: Some(rule.rule_id.clone()),
            timestamp: Utc::now(),
        }
    }
}
