//! Validation engine: orchestrates schema resolution, rule evaluation, and
//! report assembly.

use chrono::Utc;
use serde::Deserialize;

use super::evaluator::evaluate_rule;
use super::registry::SchemaRegistry;
use super::report::{BatchReport, ReportSummary, ValidationReport};
use super::rules::{RuleType, Severity};
use crate::error::CoreError;
use crate::types::FieldMap;

/// One validation request, also the slot shape for batch calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub doc_id: String,
    pub fields: FieldMap,
    pub schema_id: String,
    #[serde(default)]
    pub strict: bool,
}

/// Stateless-per-call validation engine.
///
/// The only shared state is the read-mostly schema registry, so any number
/// of callers may validate concurrently; registration is the sole mutating
/// operation and is atomic per schema.
pub struct ValidationEngine {
    registry: SchemaRegistry,
}

impl ValidationEngine {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// The schema registry, for listing, detail lookups, and registration.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate one document against one schema.
    ///
    /// Fails fast with [`CoreError::SchemaNotFound`] when the schema id is
    /// unknown. Otherwise every rule is evaluated in declared order and each
    /// violation is partitioned by its declared severity. In strict mode
    /// warnings additionally gate the `valid` flag; the partitions are
    /// unaffected.
    pub fn validate(
        &self,
        doc_id: &str,
        fields: &FieldMap,
        schema_id: &str,
        strict: bool,
    ) -> Result<ValidationReport, CoreError> {
        let schema = self.registry.get(schema_id)?;

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut info = Vec::new();

        for rule in schema.rules() {
            let custom = match rule.rule_type {
                RuleType::Custom => self.registry.custom_validator(&rule.rule_id),
                _ => None,
            };
            if let Some(violation) = evaluate_rule(rule, fields, custom.as_ref()) {
                match violation.severity {
                    Severity::Error => errors.push(violation),
                    Severity::Warning => warnings.push(violation),
                    Severity::Info => info.push(violation),
                }
            }
        }

        // `info < warning < error`: strict mode lowers the validity
        // threshold from Error to Warning.
        let threshold = if strict {
            Severity::Warning
        } else {
            Severity::Error
        };
        let valid = errors
            .iter()
            .chain(warnings.iter())
            .all(|entry| entry.severity < threshold);

        let summary = ReportSummary {
            total_errors: errors.len(),
            total_warnings: warnings.len(),
            total_info: info.len(),
            fields_validated: fields.len(),
            rules_checked: schema.rule_count(),
            schema_id: schema.schema_id.clone(),
            schema_name: Some(schema.name.clone()),
            strict_mode: strict,
        };

        Ok(ValidationReport {
            valid,
            doc_id: doc_id.to_string(),
            errors,
            warnings,
            info,
            summary,
            timestamp: Utc::now(),
        })
    }

    /// Validate a batch of documents, one report per request slot.
    ///
    /// Items are independent: a slot whose schema cannot be resolved gets a
    /// failure report in place and sibling slots are unaffected. Output
    /// order is unconditionally input order.
    pub fn validate_batch(&self, requests: &[ValidateRequest]) -> BatchReport {
        let results: Vec<ValidationReport> = requests
            .iter()
            .map(|req| {
                self.validate(&req.doc_id, &req.fields, &req.schema_id, req.strict)
                    .unwrap_or_else(|e| {
                        ValidationReport::schema_failure(
                            &req.doc_id,
                            &req.schema_id,
                            req.fields.len(),
                            req.strict,
                            e.to_string(),
                        )
                    })
            })
            .collect();

        BatchReport {
            total_documents: results.len(),
            results,
            timestamp: Utc::now(),
        }
    }
}
