use tracing::info;

use crate::context::RequestContext;
use crate::error::Result;
use crate::model::SystemSettings;
use crate::repo;
use crate::store::DocumentStore;

/// Starter lines shown when no extra items are stored yet.
pub const EXTRA_ITEMS_TEMPLATE: &[&str] = &[
    "# Enter set commands here, one per line.",
    "# set firewall global-options all-ping 'enable'",
    "# set firewall global-options log-martians 'disable'",
];

/// Store raw extra directive lines, passed through verbatim by the
/// compiler. Blank lines are dropped. Storing exactly the starter
/// template is a no-op; returns whether anything was written.
pub fn set_extra_items<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    lines: &[String],
) -> Result<bool> {
    let items: Vec<String> = lines
        .iter()
        .map(|line| line.trim_end_matches(&['\r', '\n'][..]).to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if items == EXTRA_ITEMS_TEMPLATE {
        return Ok(false);
    }

    let mut doc = repo::load_current(store, ctx)?;
    doc.extra_items = items;
    repo::save_current(store, ctx, &mut doc)?;

    info!(count = doc.extra_items.len(), "extra items stored");
    Ok(true)
}

/// Stored extra items, or the starter template when none exist.
pub fn extra_items_or_template<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<String>> {
    let doc = repo::load_current(store, ctx)?;
    if doc.extra_items.is_empty() {
        return Ok(EXTRA_ITEMS_TEMPLATE
            .iter()
            .map(ToString::to_string)
            .collect());
    }
    Ok(doc.extra_items)
}

/// Set the hostname and port the device client connects to.
pub fn set_system<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    hostname: &str,
    port: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    doc.system = Some(SystemSettings {
        hostname: hostname.to_string(),
        port: port.to_string(),
    });
    repo::save_current(store, ctx, &mut doc)?;

    info!(%hostname, %port, "system settings stored");
    Ok(())
}

pub fn system_settings<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Option<SystemSettings>> {
    Ok(repo::load_current(store, ctx)?.system)
}
