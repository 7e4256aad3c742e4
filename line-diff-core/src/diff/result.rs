use serde::Serialize;

/// A single aligned row in a line-level comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DiffRow {
    /// Line present in both inputs with identical content.
    Unchanged { line: String },
    /// Line only in the right input.
    Added { right: String },
    /// Line only in the left input.
    Removed { left: String },
    /// Left and right lines aligned at the same position but with
    /// different content.
    Changed { left: String, right: String },
}

impl DiffRow {
    /// The left-side text of the row, if any.
    pub fn left(&self) -> Option<&str> {
        match self {
            DiffRow::Unchanged { line } => Some(line),
            DiffRow::Removed { left } | DiffRow::Changed { left, .. } => Some(left),
            DiffRow::Added { .. } => None,
        }
    }

    /// The right-side text of the row, if any.
    pub fn right(&self) -> Option<&str> {
        match self {
            DiffRow::Unchanged { line } => Some(line),
            DiffRow::Added { right } | DiffRow::Changed { right, .. } => Some(right),
            DiffRow::Removed { .. } => None,
        }
    }
}
