//! Per-document and batch validation report types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::rules::{Severity, Violation};
use crate::types::Timestamp;

/// Aggregate counts for one document's evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_info: usize,
    /// Size of the input field map.
    pub fields_validated: usize,
    /// Number of rules evaluated.
    pub rules_checked: usize,
    pub schema_id: String,
    /// Absent on slot-level failure reports (the schema never resolved).
    pub schema_name: Option<String>,
    pub strict_mode: bool,
}

/// Structured result of validating one document against one schema.
///
/// Entries are partitioned by their *declared* severity; strict mode only
/// affects the `valid` flag, never the partitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    /// Opaque passthrough identifier.
    pub doc_id: String,
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
    pub info: Vec<Violation>,
    pub summary: ReportSummary,
    /// Evaluation completion time.
    pub timestamp: Timestamp,
}

impl ValidationReport {
    /// Build the failure report used when a document cannot be validated at
    /// all (unknown schema). The fault is contained in the report itself as
    /// a single error entry on the synthetic `_schema` field, so a batch
    /// slot carries data instead of an exception.
    pub fn schema_failure(
        doc_id: impl Into<String>,
        schema_id: impl Into<String>,
        fields_validated: usize,
        strict: bool,
        message: impl Into<String>,
    ) -> Self {
        let schema_id = schema_id.into();
        let entry = Violation {
            field: "_schema".to_string(),
            rule_type: "schema".to_string(),
            message: message.into(),
            severity: Severity::Error,
            expected: json!("a registered schema id"),
            actual: Value::String(schema_id.clone()),
            rule_id: None,
            timestamp: Utc::now(),
        };
        Self {
            valid: false,
            doc_id: doc_id.into(),
            errors: vec![entry],
            warnings: Vec::new(),
            info: Vec::new(),
            summary: ReportSummary {
                total_errors: 1,
                total_warnings: 0,
                total_info: 0,
                fields_validated,
                rules_checked: 0,
                schema_id,
                schema_name: None,
                strict_mode: strict,
            },
            timestamp: Utc::now(),
        }
    }

    /// Whether this report is a slot-level failure (the schema could not be
    /// resolved) rather than a rule evaluation outcome.
    pub fn is_schema_failure(&self) -> bool {
        self.summary.schema_name.is_none()
    }
}

/// Ordered batch results; slot `i` always corresponds to request `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_documents: usize,
    pub results: Vec<ValidationReport>,
    pub timestamp: Timestamp,
}
