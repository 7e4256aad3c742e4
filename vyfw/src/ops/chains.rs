use serde::Serialize;
use tracing::info;

use crate::context::RequestContext;
use crate::error::{Error, Result, ValidationError};
use crate::model::{Chain, ChainPolicy, ChainRule, ConfigDocument, IpVersion, RuleAction};
use crate::ops::validated_rule_number;
use crate::repo;
use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct ChainInput {
    pub ip_version: IpVersion,
    pub name: String,
    pub description: String,
    pub default_action: RuleAction,
    pub default_logging: bool,
}

/// Add a chain, or replace the default policy of an existing one. Rules
/// already attached to the chain are kept.
pub fn add_chain<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    input: ChainInput,
) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::EmptyField("chain name").into());
    }

    let mut doc = repo::load_current(store, ctx)?;
    let chain = doc
        .block_mut(input.ip_version)
        .chains
        .entry(input.name.clone())
        .or_insert_with(Chain::default);
    chain.default = Some(ChainPolicy {
        description: input.description,
        default_action: input.default_action,
        default_logging: input.default_logging,
    });
    repo::save_current(store, ctx, &mut doc)?;

    info!(chain = %input.name, version = %input.ip_version, "chain added");
    Ok(())
}

/// Add a rule to a chain, creating the chain when absent.
pub fn add_chain_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    chain: &str,
    number: &str,
    rule: ChainRule,
) -> Result<()> {
    let number = validated_rule_number(number)?;
    let mut doc = repo::load_current(store, ctx)?;
    validate_group_references(&doc, version, &rule)?;

    let chain_entry = doc
        .block_mut(version)
        .chains
        .entry(chain.to_string())
        .or_insert_with(Chain::default);
    chain_entry.rules.insert(number.clone(), rule);
    chain_entry.normalize();
    repo::save_current(store, ctx, &mut doc)?;

    info!(%chain, rule = %number, %version, "chain rule added");
    Ok(())
}

/// Address and network group references are IP-versioned: the referenced
/// group must live in the same block as the rule's chain.
fn validate_group_references(
    doc: &ConfigDocument,
    version: IpVersion,
    rule: &ChainRule,
) -> Result<()> {
    for (address, kind) in [
        (&rule.dest_address, rule.dest_address_type),
        (&rule.source_address, rule.source_address_type),
    ] {
        if address.is_empty() || !kind.ip_versioned() {
            continue;
        }
        if doc
            .block(version)
            .is_some_and(|block| block.groups.contains_key(address))
        {
            continue;
        }
        let other = match version {
            IpVersion::V4 => IpVersion::V6,
            IpVersion::V6 => IpVersion::V4,
        };
        if doc
            .block(other)
            .is_some_and(|block| block.groups.contains_key(address))
        {
            return Err(ValidationError::IpVersionMismatch.into());
        }
        return Err(Error::not_found("group", address.clone()));
    }
    Ok(())
}

/// Delete a rule. An emptied chain is removed, and an emptied IP version
/// block with it.
pub fn delete_chain_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    chain: &str,
    number: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let block = doc.block_mut(version);
    let Some(chain_entry) = block.chains.get_mut(chain) else {
        return Err(Error::not_found("chain", chain));
    };
    if chain_entry.rules.remove(number).is_none() {
        return Err(Error::not_found("rule", number));
    }
    chain_entry.normalize();
    if chain_entry.rules.is_empty() {
        block.chains.remove(chain);
    }
    doc.drop_block_if_empty(version);
    repo::save_current(store, ctx, &mut doc)?;

    info!(%chain, rule = %number, %version, "chain rule deleted");
    Ok(())
}

/// Move a rule to a new number within its chain. The new number must
/// differ, parse as a non-negative integer, and not collide; any
/// violation aborts before anything is written.
pub fn reorder_chain_rule<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
    version: IpVersion,
    chain: &str,
    old_number: &str,
    new_number: &str,
) -> Result<()> {
    let mut doc = repo::load_current(store, ctx)?;
    let Some(chain_entry) = doc
        .block_mut(version)
        .chains
        .get_mut(chain)
    else {
        return Err(Error::not_found("chain", chain));
    };

    if old_number == new_number.trim() {
        return Err(ValidationError::SameRuleNumber.into());
    }
    let new_number = validated_rule_number(new_number)?;
    if chain_entry.rules.contains_key(&new_number) {
        return Err(ValidationError::RuleNumberInUse(new_number).into());
    }
    let Some(rule) = chain_entry.rules.remove(old_number) else {
        return Err(Error::not_found("rule", old_number));
    };
    chain_entry.rules.insert(new_number.clone(), rule);
    chain_entry.normalize();
    repo::save_current(store, ctx, &mut doc)?;

    info!(%chain, from = %old_number, to = %new_number, %version, "chain rule moved");
    Ok(())
}

pub fn list_chains<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<(IpVersion, String)>> {
    let doc = repo::load_current(store, ctx)?;
    let mut out = Vec::new();
    for version in [IpVersion::V4, IpVersion::V6] {
        if let Some(block) = doc.block(version) {
            out.extend(block.chains.keys().map(|name| (version, name.clone())));
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainRuleSummary {
    pub ip_version: IpVersion,
    pub chain: String,
    pub number: String,
    pub description: String,
}

pub fn list_chain_rules<S: DocumentStore>(
    store: &mut S,
    ctx: &RequestContext,
) -> Result<Vec<ChainRuleSummary>> {
    let doc = repo::load_current(store, ctx)?;
    let mut out = Vec::new();
    for version in [IpVersion::V4, IpVersion::V6] {
        let Some(block) = doc.block(version) else {
            continue;
        };
        for (name, chain) in &block.chains {
            for number in &chain.rule_order {
                let Some(rule) = chain.rules.get(number) else {
                    continue;
                };
                out.push(ChainRuleSummary {
                    ip_version: version,
                    chain: name.clone(),
                    number: number.clone(),
                    description: rule.description.clone(),
                });
            }
        }
    }
    Ok(out)
}
