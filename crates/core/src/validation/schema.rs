//! Schema model and load-time compilation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::rules::{Rule, RuleDefinition, RuleParams};
use crate::error::CoreError;

/// Declarative schema document (JSON) before compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    pub schema_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A compiled, immutable validation schema.
///
/// Rule order is the declared order; the engine evaluates rules in this
/// order so report entries are stably ordered.
#[derive(Debug, Clone)]
pub struct Schema {
    pub schema_id: String,
    pub name: String,
    pub description: String,
    rules: Vec<Rule>,
}

impl Schema {
    /// Compile a declarative definition, validating every rule's params.
    ///
    /// Fails on the first malformed rule with a message naming the schema,
    /// the rule, and the problem. A failed compile registers nothing.
    pub fn compile(definition: SchemaDefinition) -> Result<Self, CoreError> {
        if definition.schema_id.is_empty() {
            return Err(CoreError::SchemaLoad(
                "schema is missing a schemaId".to_string(),
            ));
        }

        let mut rules = Vec::with_capacity(definition.rules.len());
        let mut seen_ids = HashSet::new();

        for def in definition.rules {
            let rule_id = def
                .rule_id
                .unwrap_or_else(|| format!("{}_{}", def.field, def.rule_type.as_str()));

            if !seen_ids.insert(rule_id.clone()) {
                return Err(CoreError::SchemaLoad(format!(
                    "schema '{}': duplicate rule id '{rule_id}'",
                    definition.schema_id
                )));
            }

            let params = RuleParams::parse(def.rule_type, &def.params).map_err(|reason| {
                CoreError::SchemaLoad(format!(
                    "schema '{}', rule '{rule_id}': {reason}",
                    definition.schema_id
                ))
            })?;

            rules.push(Rule {
                rule_id,
                field: def.field,
                rule_type: def.rule_type,
                severity: def.severity,
                params,
            });
        }

        Ok(Self {
            schema_id: definition.schema_id,
            name: definition.name,
            description: definition.description,
            rules,
        })
    }

    /// Rules in declared (evaluation) order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rebuild the declarative document, served by schema detail lookups.
    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition {
            schema_id: self.schema_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            rules: self.rules.iter().map(Rule::to_definition).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{RuleType, Severity};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn definition(value: serde_json::Value) -> SchemaDefinition {
        serde_json::from_value(value).expect("definition should deserialize")
    }

    #[test]
    fn compile_preserves_rule_order() {
        let schema = Schema::compile(definition(json!({
            "schemaId": "ordered",
            "name": "Ordered",
            "rules": [
                {"field": "b", "ruleType": "required"},
                {"field": "a", "ruleType": "required"},
                {"field": "c", "ruleType": "length", "params": {"min": 1, "max": 5}}
            ]
        })))
        .expect("schema should compile");

        let fields: Vec<_> = schema.rules().iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, ["b", "a", "c"]);
        assert_eq!(schema.rule_count(), 3);
    }

    #[test]
    fn compile_defaults_rule_id_and_severity() {
        let schema = Schema::compile(definition(json!({
            "schemaId": "defaults",
            "name": "Defaults",
            "rules": [
                {"field": "policy_number", "ruleType": "required"}
            ]
        })))
        .expect("schema should compile");

        let rule = &schema.rules()[0];
        assert_eq!(rule.rule_id, "policy_number_required");
        assert_eq!(rule.severity, Severity::Error);
        assert_eq!(rule.rule_type, RuleType::Required);
    }

    #[test]
    fn compile_rejects_inconsistent_params() {
        let err = Schema::compile(definition(json!({
            "schemaId": "bad_range",
            "name": "Bad",
            "rules": [
                {"field": "amount", "ruleType": "range", "params": {"min": 100, "max": 1}}
            ]
        })))
        .expect_err("inverted bounds should fail load");

        assert_matches!(err, CoreError::SchemaLoad(msg) => {
            assert!(msg.contains("bad_range"));
            assert!(msg.contains("amount_range"));
        });
    }

    #[test]
    fn compile_rejects_missing_params() {
        let err = Schema::compile(definition(json!({
            "schemaId": "bad",
            "name": "Bad",
            "rules": [
                {"field": "code", "ruleType": "regex"}
            ]
        })))
        .expect_err("missing pattern should fail load");
        assert_matches!(err, CoreError::SchemaLoad(_));
    }

    #[test]
    fn compile_rejects_duplicate_rule_ids() {
        let err = Schema::compile(definition(json!({
            "schemaId": "dup",
            "name": "Dup",
            "rules": [
                {"ruleId": "r1", "field": "a", "ruleType": "required"},
                {"ruleId": "r1", "field": "b", "ruleType": "required"}
            ]
        })))
        .expect_err("duplicate ids should fail load");

        assert_matches!(err, CoreError::SchemaLoad(msg) => {
            assert!(msg.contains("duplicate rule id 'r1'"));
        });
    }

    #[test]
    fn compile_rejects_missing_schema_id() {
        let err = Schema::compile(definition(json!({
            "schemaId": "",
            "name": "Anonymous"
        })))
        .expect_err("empty schemaId should fail load");
        assert_matches!(err, CoreError::SchemaLoad(_));
    }

    #[test]
    fn to_definition_round_trips_rules() {
        let schema = Schema::compile(definition(json!({
            "schemaId": "round",
            "name": "Round Trip",
            "description": "desc",
            "rules": [
                {"field": "kind", "ruleType": "enum", "severity": "warning",
                 "params": {"allowedValues": ["a", "b"]}}
            ]
        })))
        .expect("schema should compile");

        let def = schema.to_definition();
        assert_eq!(def.schema_id, "round");
        assert_eq!(def.description, "desc");
        assert_eq!(def.rules.len(), 1);
        assert_eq!(def.rules[0].rule_id.as_deref(), Some("kind_enum"));
        assert_eq!(def.rules[0].severity, Severity::Warning);
        assert_eq!(def.rules[0].params, json!({"allowedValues": ["a", "b"]}));
    }
}
