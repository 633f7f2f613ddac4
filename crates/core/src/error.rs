#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Requested schema id is absent from the registry.
    #[error("Schema '{schema_id}' not found")]
    SchemaNotFound { schema_id: String },

    /// A schema definition failed load-time validation.
    #[error("Schema load failed: {0}")]
    SchemaLoad(String),
}
