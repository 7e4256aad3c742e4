//! Point-in-time copies of a firewall document.
//!
//! Snapshot labels are creation timestamps, so they are unique and sort
//! the way humans expect. The payload stored for a snapshot is the
//! current document stripped of volatile keys, with `firewall` and
//! `snapshot` linkage re-attached by the store for query-ability.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result};
use crate::store::{DocumentKey, DocumentStore};

/// One row in a snapshot listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotInfo {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Copy "current" into a new snapshot and return its generated label.
pub fn create<S: DocumentStore>(store: &mut S, ctx: &RequestContext) -> Result<String> {
    let label = Utc::now().format("%Y-%m-%d-%H:%M:%S%.6f").to_string();

    let current = store
        .get(&ctx.owner, &DocumentKey::current(&ctx.firewall))?
        .ok_or_else(|| Error::not_found("firewall", &ctx.firewall))?;
    store.put(
        &ctx.owner,
        &DocumentKey::snapshot(&ctx.firewall, &label),
        current,
    )?;

    info!(firewall = %ctx.firewall, %label, "snapshot created");
    Ok(label)
}

/// Snapshots for a firewall, newest first.
pub fn list<S: DocumentStore>(store: &mut S, ctx: &RequestContext) -> Result<Vec<SnapshotInfo>> {
    let mut rows: Vec<SnapshotInfo> = store
        .list_snapshots(&ctx.owner, &ctx.firewall)?
        .into_iter()
        .filter_map(|doc| {
            let label = doc.get("snapshot")?.as_str()?.to_string();
            let tag = doc
                .get("tag")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            Some(SnapshotInfo { label, tag })
        })
        .collect();
    rows.sort_by(|a, b| b.label.cmp(&a.label));
    Ok(rows)
}

/// Attach free text to a snapshot. Tags are snapshot-scoped; they never
/// travel back to "current".
pub fn tag<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    label: &str,
    text: &str,
) -> Result<()> {
    let key = DocumentKey::snapshot(&ctx.firewall, label);
    let mut doc = store
        .get(&ctx.owner, &key)?
        .ok_or_else(|| Error::not_found("snapshot", label))?;
    if let Some(map) = doc.as_object_mut() {
        map.insert("tag".to_string(), Value::String(text.to_string()));
    }
    store.put(&ctx.owner, &key, doc)?;

    info!(firewall = %ctx.firewall, %label, "snapshot tagged");
    Ok(())
}

/// Replace "current" with a snapshot's content. The store strips the
/// linkage keys and any tag on the way in. Selecting "current" itself is
/// a no-op read.
pub fn select<S: DocumentStore>(store: &mut S, ctx: &RequestContext, label: &str) -> Result<()> {
    if label == "current" {
        return Ok(());
    }

    let snapshot = store
        .get(&ctx.owner, &DocumentKey::snapshot(&ctx.firewall, label))?
        .ok_or_else(|| Error::not_found("snapshot", label))?;
    store.put(&ctx.owner, &DocumentKey::current(&ctx.firewall), snapshot)?;

    info!(firewall = %ctx.firewall, %label, "snapshot selected into current");
    Ok(())
}

pub fn delete<S: DocumentStore>(store: &mut S, ctx: &RequestContext, label: &str) -> Result<()> {
    let removed = store.delete(&ctx.owner, &DocumentKey::snapshot(&ctx.firewall, label))?;
    if !removed {
        return Err(Error::not_found("snapshot", label));
    }

    info!(firewall = %ctx.firewall, %label, "snapshot deleted");
    Ok(())
}
