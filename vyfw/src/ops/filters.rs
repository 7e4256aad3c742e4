use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result, ValidationError};
use crate::model::{Filter, FilterAction, FilterKind, FilterRule, IpVersion, RuleAction};
use crate::ops::validated_rule_number;
use crate::repo;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct FilterInput {
    pub ip_version: IpVersion,
    pub kind: FilterKind,
    pub description: String,
    pub default_action: RuleAction,
    pub log: bool,
}

/// Add a filter, or replace the settings of an existing one. Rules
/// already attached to the filter are kept.
pub fn add_filter<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    input: FilterInput,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let filter = doc
        .block_mut(input.ip_version)
        .filters
        .entry(input.kind)
        .or_insert_with(|| Filter {
            description: String::new(),
            default_action: input.default_action,
            log: false,
            rule_order: Vec::new(),
            rules: Default::default(),
        });
    filter.description = input.description;
    filter.default_action = input.default_action;
    filter.log = input.log;
    repo::save_current(store, ctx, &mut doc)?;

    info!(filter = %input.kind, version = %input.ip_version, "filter added");
    Ok(())
}

/// Add a rule to an existing filter. Jump rules must name a target chain,
/// interface, and direction; offload rules a target flowtable. Fields
/// that do not apply to the action are dropped.
pub fn add_filter_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    kind: FilterKind,
    number: &str,
    mut rule: FilterRule,
) -> Result<()> {
    let number = validated_rule_number(number)?;
    match rule.action {
        FilterAction::Jump => {
            if rule.target.as_deref().unwrap_or("").is_empty() {
                return Err(ValidationError::MissingJumpField("a target chain").into());
            }
            if rule.interface.as_deref().unwrap_or("").is_empty() {
                return Err(ValidationError::MissingJumpField("an interface").into());
            }
            if rule.direction.is_none() {
                return Err(ValidationError::MissingJumpField("a direction").into());
            }
        }
        FilterAction::Offload => {
            if rule.target.as_deref().unwrap_or("").is_empty() {
                return Err(ValidationError::MissingOffloadTarget.into());
            }
            rule.interface = None;
            rule.direction = None;
        }
        FilterAction::Accept | FilterAction::Drop => {
            rule.interface = None;
            rule.direction = None;
            rule.target = None;
        }
    }

    let mut doc = repo::load_current(store, ctx)?;
    let Some(filter) = doc.block_mut(version).filters.get_mut(&kind) else {
        return Err(Error::not_found("filter", kind.as_str()));
    };
    filter.rules.insert(number.clone(), rule);
    filter.normalize();
    repo::save_current(store, ctx, &mut doc)?;

    info!(filter = %kind, rule = %number, %version, "filter rule added");
    Ok(())
}

/// Delete a rule. An emptied filter is removed, and an emptied IP
/// version block with it.
pub fn delete_filter_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    kind: FilterKind,
    number: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let block = doc.block_mut(version);
    let Some(filter) = block.filters.get_mut(&kind) else {
        return Err(Error::not_found("filter", kind.as_str()));
    };
    if filter.rules.remove(number).is_none() {
        return Err(Error::not_found("rule", number));
    }
    filter.normalize();
    if filter.rules.is_empty() {
        block.filters.remove(&kind);
    }
    doc.drop_block_if_empty(version);
    repo::save_current(store, ctx, &mut doc)?;

    info!(filter = %kind, rule = %number, %version, "filter rule deleted");
    Ok(())
}

/// Move a rule to a new number within its filter, with the same
/// validations as chain reordering.
pub fn reorder_filter_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    kind: FilterKind,
    old_number: &str,
    new_number: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let Some(filter) = doc.block_mut(version).filters.get_mut(&kind) else {
        return Err(Error::not_found("filter", kind.as_str()));
    };

    if old_number == new_number.trim() {
        return Err(ValidationError::SameRuleNumber.into());
    }
    let new_number = validated_rule_number(new_number)?;
    if filter.rules.contains_key(&new_number) {
        return Err(ValidationError::RuleNumberInUse(new_number).into());
    }
    let Some(rule) = filter.rules.remove(old_number) else {
        return Err(Error::not_found("rule", old_number));
    };
    filter.rules.insert(new_number.clone(), rule);
    filter.normalize();
    repo::save_current(store, ctx, &mut doc)?;

    info!(filter = %kind, from = %old_number, to = %new_number, %version, "filter rule moved");
    Ok(())
}

pub fn list_filters<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<(IpVersion, FilterKind)>> {
    let doc = repo::load_current(store, ctx)?;
    let mut out = Vec::new();
    for version in [IpVersion::V4, IpVersion::V6] {
        if let Some(block) = doc.block(version) {
            out.extend(block.filters.keys().map(|kind| (version, *kind)));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{add_filter, add_filter_rule, delete_filter_rule, FilterInput};
    use crate::context::RequestContext;
    use crate::error::{Error, ValidationError};
    use crate::model::{Direction, FilterAction, FilterKind, FilterRule, IpVersion, RuleAction};
    use crate::repo;
    use crate::store::MemoryStore;

    fn ctx() -> RequestContext {
        RequestContext::new("alice", "edge")
    }

    fn seed_filter(store: &mut MemoryStore) {
        add_filter(
            store,
            &ctx(),
            FilterInput {
                ip_version: IpVersion::V4,
                kind: FilterKind::Forward,
                description: "forward filter".to_string(),
                default_action: RuleAction::Drop,
                log: true,
            },
        )
        .expect("add filter");
    }

    fn jump_rule() -> FilterRule {
        FilterRule {
            description: String::new(),
            disabled: false,
            log: false,
            action: FilterAction::Jump,
            interface: Some("eth0".to_string()),
            direction: Some(Direction::Inbound),
            target: Some("INPUT".to_string()),
        }
    }

    #[test]
    fn jump_rule_without_interface_is_rejected() {
        let mut store = MemoryStore::new();
        seed_filter(&mut store);

        let rule = FilterRule {
            interface: None,
            ..jump_rule()
        };
        let err = add_filter_rule(&mut store, &ctx(), IpVersion::V4, FilterKind::Forward, "10", rule)
            .expect_err("rejected");
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingJumpField(_))
        ));
    }

    #[test]
    fn accept_rule_sheds_jump_only_fields() {
        let mut store = MemoryStore::new();
        seed_filter(&mut store);

        let rule = FilterRule {
            action: FilterAction::Accept,
            ..jump_rule()
        };
        add_filter_rule(&mut store, &ctx(), IpVersion::V4, FilterKind::Forward, "10", rule)
            .expect("add");

        let doc = repo::load_current(&mut store, &ctx()).expect("load");
        let stored =
            &doc.ipv4.as_ref().expect("block").filters[&FilterKind::Forward].rules["10"];
        assert!(stored.interface.is_none());
        assert!(stored.target.is_none());
    }

    #[test]
    fn deleting_the_last_rule_removes_the_filter() {
        let mut store = MemoryStore::new();
        seed_filter(&mut store);
        add_filter_rule(
            &mut store,
            &ctx(),
            IpVersion::V4,
            FilterKind::Forward,
            "10",
            jump_rule(),
        )
        .expect("add");

        delete_filter_rule(&mut store, &ctx(), IpVersion::V4, FilterKind::Forward, "10")
            .expect("delete");

        let doc = repo::load_current(&mut store, &ctx()).expect("load");
        assert!(doc.ipv4.is_none());
    }

    #[test]
    fn rule_add_requires_an_existing_filter() {
        let mut store = MemoryStore::new();
        let err = add_filter_rule(
            &mut store,
            &ctx(),
            IpVersion::V4,
            FilterKind::Input,
            "10",
            jump_rule(),
        )
        .expect_err("missing filter");
        assert!(err.to_string().contains("filter 'input' not found"));
    }
}
