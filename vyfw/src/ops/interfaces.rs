use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result, ValidationError};
use crate::model::Interface;
use crate::repo;
use crate::store::DocumentStore;

/// Add an interface, replacing any previous definition of the same name.
pub fn add_interface<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    name: &str,
    description: &str,
) -> Result<()> {
    let name = name.replace(' ', "");
    if name.is_empty() {
        return Err(ValidationError::EmptyField("interface name").into());
    }

    let mut doc = repo::load_current(store, ctx)?;
    doc.interfaces.retain(|interface| interface.name != name);
    doc.interfaces.push(Interface {
        name: name.clone(),
        description: description.to_string(),
    });
    repo::save_current(store, ctx, &mut doc)?;

    info!(interface = %name, "interface added");
    Ok(())
}

pub fn delete_interface<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    name: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let before = doc.interfaces.len();
    doc.interfaces.retain(|interface| interface.name != name);
    if doc.interfaces.len() == before {
        return Err(Error::not_found("interface", name));
    }
    repo::save_current(store, ctx, &mut doc)?;

    info!(interface = %name, "interface deleted");
    Ok(())
}

/// Interfaces sorted by name.
pub fn list_interfaces<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<Interface>> {
    let doc = repo::load_current(store, ctx)?;
    let mut interfaces = doc.interfaces;
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(interfaces)
}

#[cfg(test)]
mod tests {
    use super::{add_interface, list_interfaces};
    use crate::context::RequestContext;
    use crate::store::MemoryStore;

    fn ctx() -> RequestContext {
        RequestContext::new("alice", "edge")
    }

    #[test]
    fn interfaces_list_sorted_by_name() {
        let mut store = MemoryStore::new();
        add_interface(&mut store, &ctx(), "eth1", "wan").expect("add");
        add_interface(&mut store, &ctx(), "eth0", "lan").expect("add");

        let interfaces = list_interfaces(&mut store, &ctx()).expect("list");
        let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "eth1"]);
    }

    #[test]
    fn spaces_are_stripped_from_interface_names() {
        let mut store = MemoryStore::new();
        add_interface(&mut store, &ctx(), "eth 0", "lan").expect("add");
        let interfaces = list_interfaces(&mut store, &ctx()).expect("list");
        assert_eq!(interfaces[0].name, "eth0");
    }
}
