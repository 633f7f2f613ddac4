//! Schema registry: load, list, resolve, and atomically replace schemas.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;

use super::rules::{CustomOutcome, CustomValidator};
use super::schema::{Schema, SchemaDefinition};
use crate::error::CoreError;

/// Listing entry for a registered schema (no rule dump).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub schema_id: String,
    pub name: String,
    pub description: String,
    pub rule_count: usize,
}

/// Process-lifetime schema store.
///
/// Reads vastly outnumber writes: lookups take the read lock and clone an
/// `Arc<Schema>`, while registration swaps the entry under the write lock.
/// Concurrent readers therefore observe either the old or the new schema,
/// never a partial rule list.
///
/// The registry also owns the side-table of custom validator functions,
/// keyed by rule id, so `custom` rules stay serializable while resolving
/// their behavior through an injected function.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<String, Arc<Schema>>>,
    custom_validators: RwLock<HashMap<String, CustomValidator>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a definition, replacing any schema already
    /// registered under the same id.
    pub fn register(&self, definition: SchemaDefinition) -> Result<(), CoreError> {
        let schema = Schema::compile(definition)?;
        let mut schemas = self.schemas.write().expect("schema registry lock poisoned");
        schemas.insert(schema.schema_id.clone(), Arc::new(schema));
        Ok(())
    }

    /// Load every `*.json` schema file in a directory.
    ///
    /// Each file is compiled independently, so a malformed file fails only
    /// its own schema. Returns the number of schemas registered plus the
    /// per-file failures for the caller to log.
    pub fn load_dir(&self, dir: &Path) -> (usize, Vec<(PathBuf, CoreError)>) {
        let mut loaded = 0;
        let mut failures = Vec::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                failures.push((
                    dir.to_path_buf(),
                    CoreError::SchemaLoad(format!("cannot read schema directory: {e}")),
                ));
                return (0, failures);
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            match load_definition(&path).and_then(|def| self.register(def)) {
                Ok(()) => loaded += 1,
                Err(e) => failures.push((path, e)),
            }
        }

        (loaded, failures)
    }

    /// Resolve a schema by id.
    pub fn get(&self, schema_id: &str) -> Result<Arc<Schema>, CoreError> {
        let schemas = self.schemas.read().expect("schema registry lock poisoned");
        schemas
            .get(schema_id)
            .cloned()
            .ok_or_else(|| CoreError::SchemaNotFound {
                schema_id: schema_id.to_string(),
            })
    }

    /// Summaries of all registered schemas, sorted by id for stable output.
    pub fn list(&self) -> Vec<SchemaSummary> {
        let schemas = self.schemas.read().expect("schema registry lock poisoned");
        let mut summaries: Vec<_> = schemas
            .values()
            .map(|schema| SchemaSummary {
                schema_id: schema.schema_id.clone(),
                name: schema.name.clone(),
                description: schema.description.clone(),
                rule_count: schema.rule_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.schema_id.cmp(&b.schema_id));
        summaries
    }

    /// Register the behavior for a `custom` rule, keyed by its rule id.
    pub fn register_custom_validator<F>(&self, rule_id: impl Into<String>, validator: F)
    where
        F: Fn(&Value) -> CustomOutcome + Send + Sync + 'static,
    {
        let mut validators = self
            .custom_validators
            .write()
            .expect("custom validator lock poisoned");
        validators.insert(rule_id.into(), Arc::new(validator));
    }

    /// Look up the validator registered for a custom rule.
    pub fn custom_validator(&self, rule_id: &str) -> Option<CustomValidator> {
        let validators = self
            .custom_validators
            .read()
            .expect("custom validator lock poisoned");
        validators.get(rule_id).cloned()
    }
}

/// Read and parse one schema definition file.
fn load_definition(path: &Path) -> Result<SchemaDefinition, CoreError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CoreError::SchemaLoad(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CoreError::SchemaLoad(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn definition(value: Value) -> SchemaDefinition {
        serde_json::from_value(value).expect("definition should deserialize")
    }

    fn basic_definition(schema_id: &str, rule_count: usize) -> SchemaDefinition {
        let rules: Vec<Value> = (0..rule_count)
            .map(|i| json!({"field": format!("field_{i}"), "ruleType": "required"}))
            .collect();
        definition(json!({
            "schemaId": schema_id,
            "name": "Test Schema",
            "description": "registry test fixture",
            "rules": rules
        }))
    }

    #[test]
    fn register_and_get() {
        let registry = SchemaRegistry::new();
        registry
            .register(basic_definition("test_schema", 2))
            .expect("schema should register");

        let schema = registry.get("test_schema").expect("schema should resolve");
        assert_eq!(schema.rule_count(), 2);
    }

    #[test]
    fn get_unknown_id_is_schema_not_found() {
        let registry = SchemaRegistry::new();
        let err = registry.get("missing").expect_err("should not resolve");
        assert_matches!(err, CoreError::SchemaNotFound { schema_id } => {
            assert_eq!(schema_id, "missing");
        });
    }

    #[test]
    fn register_replaces_whole_schema() {
        let registry = SchemaRegistry::new();
        registry.register(basic_definition("evolving", 1)).unwrap();
        let before = registry.get("evolving").unwrap();
        assert_eq!(before.rule_count(), 1);

        registry.register(basic_definition("evolving", 3)).unwrap();
        let after = registry.get("evolving").unwrap();
        assert_eq!(after.rule_count(), 3);

        // The Arc handed out earlier still sees the old definition.
        assert_eq!(before.rule_count(), 1);
    }

    #[test]
    fn malformed_definition_registers_nothing() {
        let registry = SchemaRegistry::new();
        let err = registry
            .register(definition(json!({
                "schemaId": "broken",
                "name": "Broken",
                "rules": [
                    {"field": "ok", "ruleType": "required"},
                    {"field": "bad", "ruleType": "range", "params": {"min": 5, "max": 1}}
                ]
            })))
            .expect_err("bad params should fail load");
        assert_matches!(err, CoreError::SchemaLoad(_));
        assert!(registry.get("broken").is_err());
    }

    #[test]
    fn list_is_sorted_by_schema_id() {
        let registry = SchemaRegistry::new();
        registry.register(basic_definition("zeta", 1)).unwrap();
        registry.register(basic_definition("alpha", 2)).unwrap();

        let summaries = registry.list();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].schema_id, "alpha");
        assert_eq!(summaries[0].rule_count, 2);
        assert_eq!(summaries[1].schema_id, "zeta");
    }

    #[test]
    fn load_dir_isolates_per_file_failures() {
        let dir = tempfile::tempdir().expect("tempdir should create");

        std::fs::write(
            dir.path().join("good.json"),
            serde_json::to_string(&json!({
                "schemaId": "good",
                "name": "Good",
                "rules": [{"field": "name", "ruleType": "required"}]
            }))
            .unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = SchemaRegistry::new();
        let (loaded, failures) = registry.load_dir(dir.path());

        assert_eq!(loaded, 1);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].0.ends_with("broken.json"));
        assert!(registry.get("good").is_ok());
    }

    #[test]
    fn load_dir_missing_directory_reports_failure() {
        let registry = SchemaRegistry::new();
        let (loaded, failures) = registry.load_dir(Path::new("/nonexistent/schemas"));
        assert_eq!(loaded, 0);
        assert_eq!(failures.len(), 1);
    }

    #[test]
    fn custom_validator_side_table() {
        let registry = SchemaRegistry::new();
        assert!(registry.custom_validator("heir_id_check").is_none());

        registry.register_custom_validator("heir_id_check", |value: &Value| {
            if value.as_str().is_some_and(|s| s.starts_with("HEIR-")) {
                CustomOutcome::Pass
            } else {
                CustomOutcome::Fail("identifier must start with HEIR-".to_string())
            }
        });

        let validator = registry
            .custom_validator("heir_id_check")
            .expect("validator should resolve");
        assert_matches!(validator(&json!("HEIR-001")), CustomOutcome::Pass);
        assert_matches!(validator(&json!("X-001")), CustomOutcome::Fail(_));
    }
}
