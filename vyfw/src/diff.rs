//! Compiled-output comparison of two snapshots.

use line_diff_core::{diff_lines, split_embedded, DiffRow};
use serde::Serialize;

use crate::compile::compile;
use crate::context::RequestContext;
use crate::error::{Result, ValidationError};
use crate::repo;
use crate::store::DocumentStore;

/// Aligned comparison of two snapshots' compiled directives.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotComparison {
    pub left_label: String,
    pub right_label: String,
    pub rows: Vec<DiffRow>,
}

/// Compile two snapshots and align their output line by line.
///
/// The label `current` addresses the live document. Both loads are
/// read-only; diffing never touches "current". Equal or empty labels are
/// rejected before any work happens.
pub fn diff_snapshots<S: DocumentStore>(
    store: &S,
    ctx: &RequestContext,
    left_label: &str,
    right_label: &str,
) -> Result<SnapshotComparison> {
    if left_label.is_empty() || right_label.is_empty() {
        return Err(ValidationError::EmptyField("snapshot label").into());
    }
    if left_label == right_label {
        return Err(ValidationError::SameSnapshot.into());
    }

    let left_doc = repo::load_for_diff(store, ctx, left_label)?;
    let right_doc = repo::load_for_diff(store, ctx, right_label)?;

    let left = split_embedded(&compile(&left_doc));
    let right = split_embedded(&compile(&right_doc));

    Ok(SnapshotComparison {
        left_label: left_label.to_string(),
        right_label: right_label.to_string(),
        rows: diff_lines(&left, &right),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::diff_snapshots;
    use crate::context::RequestContext;
    use crate::error::{Error, ValidationError};
    use crate::store::{DocumentKey, DocumentStore, MemoryStore};

    fn ctx() -> RequestContext {
        RequestContext::new("alice", "edge")
    }

    #[test]
    fn equal_labels_are_rejected_before_any_load() {
        let store = MemoryStore::new();
        let err = diff_snapshots(&store, &ctx(), "a", "a").expect_err("rejected");
        assert!(matches!(
            err,
            Error::Validation(ValidationError::SameSnapshot)
        ));
    }

    #[test]
    fn empty_labels_are_rejected() {
        let store = MemoryStore::new();
        let err = diff_snapshots(&store, &ctx(), "", "a").expect_err("rejected");
        assert!(matches!(err, Error::Validation(ValidationError::EmptyField(_))));
    }

    #[test]
    fn missing_snapshot_labels_surface_as_not_found() {
        let store = MemoryStore::new();
        let err = diff_snapshots(&store, &ctx(), "a", "current").expect_err("missing");
        assert!(err.to_string().contains("snapshot 'a' not found"));
    }

    #[test]
    fn diff_against_current_never_mutates_it() {
        let mut store = MemoryStore::new();
        store
            .put(
                "alice",
                &DocumentKey::snapshot("edge", "a"),
                json!({"version": 1, "extra-items": ["set firewall x"]}),
            )
            .expect("seed snapshot");

        diff_snapshots(&store, &ctx(), "a", "current").expect("diff");

        assert!(store
            .get("alice", &DocumentKey::current("edge"))
            .expect("get")
            .is_none());
    }
}
