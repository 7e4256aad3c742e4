//! Load and save of the live ("current") document.
//!
//! Every read migrates the raw tree first; when migration changed
//! anything the upgraded document is persisted back immediately, so a
//! given document migrates at most once. An absent document is an empty
//! configuration, not an error.

use tracing::debug;

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::migrate;
use crate::model::ConfigDocument;
use crate::store::{DocumentKey, DocumentStore};

pub fn load_current<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<ConfigDocument> {
    let key = DocumentKey::current(&ctx.firewall);
    let Some(mut raw) = store.get(&ctx.owner, &key)? else {
        return Ok(ConfigDocument::default());
    };

    if migrate::migrate(&mut raw) {
        debug!(firewall = %ctx.firewall, "persisting migrated document");
        store.put(&ctx.owner, &key, raw.clone())?;
    }

    decode(ctx, raw)
}

pub fn save_current<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    doc: &mut ConfigDocument,
) -> Result<()> {
    doc.normalize();
    let value = doc.to_value().map_err(Error::Encode)?;
    store
        .put(&ctx.owner, &DocumentKey::current(&ctx.firewall), value)
        .map_err(Into::into)
}

/// Read-only load for diffing: the label `current` addresses the live
/// document, anything else a snapshot. Never writes, not even the
/// migrated form.
pub fn load_for_diff<S: DocumentStore>(
    store: &S,
    ctx: &RequestContext,
    label: &str,
) -> Result<ConfigDocument> {
    let key = if label == "current" {
        DocumentKey::current(&ctx.firewall)
    } else {
        DocumentKey::snapshot(&ctx.firewall, label)
    };

    let Some(mut raw) = store.get(&ctx.owner, &key)? else {
        if label == "current" {
            return Ok(ConfigDocument::default());
        }
        return Err(Error::not_found("snapshot", label));
    };

    migrate::migrate(&mut raw);
    decode(ctx, raw)
}

/// The current document (migrated) pretty-printed for download/backup.
pub fn export_json<S: DocumentStore>(store: &mut S, ctx: &RequestContext) -> Result<String> {
    let doc = load_current(store, ctx)?;
    serde_json::to_string_pretty(&doc).map_err(Error::Encode)
}

fn decode(ctx: &RequestContext, raw: serde_json::Value) -> Result<ConfigDocument> {
    let mut doc = ConfigDocument::from_value(raw).map_err(|source| Error::Decode {
        name: ctx.firewall.clone(),
        source,
    })?;
    doc.normalize();
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{load_current, load_for_diff};
    use crate::context::RequestContext;
    use crate::store::{DocumentKey, DocumentStore, MemoryStore};

    fn ctx() -> RequestContext {
        RequestContext::new("alice", "edge")
    }

    #[test]
    fn absent_document_loads_as_empty_configuration() {
        let mut store = MemoryStore::new();
        let doc = load_current(&mut store, &ctx()).expect("load");
        assert!(doc.is_empty_ruleset());
    }

    #[test]
    fn migration_is_persisted_back_on_read() {
        let mut store = MemoryStore::new();
        let key = DocumentKey::current("edge");
        store
            .put("alice", &key, json!({"ipv4": {"tables": {}}}))
            .expect("seed");

        load_current(&mut store, &ctx()).expect("load");

        let raw = store.get("alice", &key).expect("get").expect("present");
        assert!(raw["ipv4"].get("tables").is_none());
        assert_eq!(raw["version"], json!(1));
    }

    #[test]
    fn diff_read_of_missing_snapshot_is_an_error() {
        let store = MemoryStore::new();
        let err = load_for_diff(&store, &ctx(), "nope").expect_err("missing");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn diff_read_of_current_never_writes() {
        let store = MemoryStore::new();
        let doc = load_for_diff(&store, &ctx(), "current").expect("load");
        assert!(doc.is_empty_ruleset());
    }
}
