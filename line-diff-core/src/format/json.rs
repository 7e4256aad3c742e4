use crate::diff::result::DiffRow;

/// Format rows as JSON.
pub fn format_json(rows: &[DiffRow]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
}
