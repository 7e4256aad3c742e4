use serde::Serialize;
use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result, ValidationError};
use crate::model::{Group, GroupKind, IpVersion};
use crate::repo;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct GroupInput {
    pub ip_version: IpVersion,
    pub name: String,
    pub description: String,
    pub kind: GroupKind,
    pub values: Vec<String>,
}

/// Add a group, overwriting any previous definition of the same name.
/// Only address and network groups are IP-versioned; every other kind is
/// stored in the v4 block regardless of the requested version.
pub fn add_group<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    input: GroupInput,
) -> Result<()> {
    let name = input.name.replace(' ', "");
    if name.is_empty() {
        return Err(ValidationError::EmptyField("group name").into());
    }

    let version = if input.kind.ip_versioned() {
        input.ip_version
    } else {
        IpVersion::V4
    };

    let mut doc = repo::load_current(store, ctx)?;
    let values = input
        .values
        .iter()
        .map(|value| value.trim().to_string())
        .collect();
    doc.block_mut(version).groups.insert(
        name.clone(),
        Group {
            description: input.description,
            kind: input.kind,
            values,
        },
    );
    repo::save_current(store, ctx, &mut doc)?;

    info!(group = %name, %version, "group added");
    Ok(())
}

pub fn delete_group<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    name: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    if doc.block_mut(version).groups.remove(name).is_none() {
        return Err(Error::not_found("group", name));
    }
    doc.drop_block_if_empty(version);
    repo::save_current(store, ctx, &mut doc)?;

    info!(group = %name, %version, "group deleted");
    Ok(())
}

/// One row per defined group, both IP versions, v4 first.
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetail {
    pub ip_version: IpVersion,
    pub name: String,
    pub description: String,
    pub kind: GroupKind,
    pub values: Vec<String>,
}

pub fn list_groups<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<GroupDetail>> {
    let doc = repo::load_current(store, ctx)?;
    let mut out = Vec::new();
    for version in [IpVersion::V4, IpVersion::V6] {
        let Some(block) = doc.block(version) else {
            continue;
        };
        for (name, group) in &block.groups {
            out.push(GroupDetail {
                ip_version: version,
                name: name.clone(),
                description: group.description.clone(),
                kind: group.kind,
                values: group.values.clone(),
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{add_group, delete_group, list_groups, GroupInput};
    use crate::context::RequestContext;
    use crate::model::{GroupKind, IpVersion};
    use crate::store::MemoryStore;

    fn ctx() -> RequestContext {
        RequestContext::new("alice", "edge")
    }

    #[test]
    fn unversioned_group_kinds_land_in_the_v4_block() {
        let mut store = MemoryStore::new();
        add_group(
            &mut store,
            &ctx(),
            GroupInput {
                ip_version: IpVersion::V6,
                name: "office macs".to_string(),
                description: String::new(),
                kind: GroupKind::Mac,
                values: vec!["00:11:22:33:44:55".to_string()],
            },
        )
        .expect("add");

        let groups = list_groups(&mut store, &ctx()).expect("list");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].ip_version, IpVersion::V4);
        assert_eq!(groups[0].name, "officemacs");
    }

    #[test]
    fn deleting_a_missing_group_is_reported() {
        let mut store = MemoryStore::new();
        let err = delete_group(&mut store, &ctx(), IpVersion::V4, "nope").expect_err("missing");
        assert!(err.to_string().contains("not found"));
    }
}
