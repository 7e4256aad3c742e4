use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result, ValidationError};
use crate::model::Flowtable;
use crate::repo;
use crate::store::DocumentStore;

/// Add a flowtable, replacing any previous definition of the same name.
pub fn add_flowtable<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    name: &str,
    description: &str,
    interfaces: Vec<String>,
) -> Result<()> {
    let name = name.replace(' ', "");
    if name.is_empty() {
        return Err(ValidationError::EmptyField("flowtable name").into());
    }

    let mut doc = repo::load_current(store, ctx)?;
    doc.flowtables.retain(|flowtable| flowtable.name != name);
    doc.flowtables.push(Flowtable {
        name: name.clone(),
        description: description.to_string(),
        interfaces,
    });
    repo::save_current(store, ctx, &mut doc)?;

    info!(flowtable = %name, "flowtable added");
    Ok(())
}

pub fn delete_flowtable<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    name: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let before = doc.flowtables.len();
    doc.flowtables.retain(|flowtable| flowtable.name != name);
    if doc.flowtables.len() == before {
        return Err(Error::not_found("flowtable", name));
    }
    repo::save_current(store, ctx, &mut doc)?;

    info!(flowtable = %name, "flowtable deleted");
    Ok(())
}

/// Flowtables sorted by name.
pub fn list_flowtables<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<Flowtable>> {
    let doc = repo::load_current(store, ctx)?;
    let mut flowtables = doc.flowtables;
    flowtables.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(flowtables)
}
