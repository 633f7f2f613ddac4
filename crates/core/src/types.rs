/// A flat document field map, exactly as submitted by callers.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
