use std::fs;

use anyhow::{Context, Result};
use vyfw::model::{ChainRule, FilterRule};
use vyfw::ops::{chains, extras, filters, flowtables, groups, interfaces};
use vyfw::store::FsStore;
use vyfw::RequestContext;

use crate::cli::{
    ChainCommand, ExtraCommand, FilterCommand, FlowtableCommand, GroupCommand, InterfaceCommand,
    SystemArgs,
};

pub fn run_group(store: &mut FsStore, ctx: &RequestContext, command: GroupCommand) -> Result<()> {
    match command {
        GroupCommand::Add(args) => {
            groups::add_group(
                store,
                ctx,
                groups::GroupInput {
                    ip_version: args.ip_version.into(),
                    name: args.name,
                    description: args.description,
                    kind: args.kind.into(),
                    values: args.values,
                },
            )?;
            println!("group added");
        }
        GroupCommand::Delete { ip_version, name } => {
            groups::delete_group(store, ctx, ip_version.into(), &name)?;
            println!("group deleted");
        }
    }
    Ok(())
}

pub fn run_chain(store: &mut FsStore, ctx: &RequestContext, command: ChainCommand) -> Result<()> {
    match command {
        ChainCommand::Add(args) => {
            chains::add_chain(
                store,
                ctx,
                chains::ChainInput {
                    ip_version: args.ip_version.into(),
                    name: args.name,
                    description: args.description,
                    default_action: args.default_action.into(),
                    default_logging: args.log,
                },
            )?;
            println!("chain added");
        }
        ChainCommand::RuleAdd(args) => {
            let rule = ChainRule {
                description: args.description,
                disabled: args.disable,
                logging: args.log,
                action: args.action.into(),
                dest_address: args.dest_address.trim().to_string(),
                dest_address_type: args.dest_address_type.into(),
                dest_port: args.dest_port.trim().to_string(),
                dest_port_type: args.dest_port_type.into(),
                source_address: args.source_address.trim().to_string(),
                source_address_type: args.source_address_type.into(),
                source_port: args.source_port.trim().to_string(),
                source_port_type: args.source_port_type.into(),
                protocol: args.protocol,
                state_established: args.state_established,
                state_invalid: args.state_invalid,
                state_new: args.state_new,
                state_related: args.state_related,
            };
            chains::add_chain_rule(
                store,
                ctx,
                args.ip_version.into(),
                &args.chain,
                &args.number,
                rule,
            )?;
            println!("rule added");
        }
        ChainCommand::RuleDelete {
            ip_version,
            chain,
            number,
        } => {
            chains::delete_chain_rule(store, ctx, ip_version.into(), &chain, &number)?;
            println!("rule deleted");
        }
        ChainCommand::RuleMove {
            ip_version,
            chain,
            from,
            to,
        } => {
            chains::reorder_chain_rule(store, ctx, ip_version.into(), &chain, &from, &to)?;
            println!("rule moved");
        }
    }
    Ok(())
}

pub fn run_filter(store: &mut FsStore, ctx: &RequestContext, command: FilterCommand) -> Result<()> {
    match command {
        FilterCommand::Add(args) => {
            filters::add_filter(
                store,
                ctx,
                filters::FilterInput {
                    ip_version: args.ip_version.into(),
                    kind: args.kind.into(),
                    description: args.description,
                    default_action: args.default_action.into(),
                    log: args.log,
                },
            )?;
            println!("filter added");
        }
        FilterCommand::RuleAdd(args) => {
            let rule = FilterRule {
                description: args.description,
                disabled: args.disable,
                log: args.log,
                action: args.action.into(),
                interface: args.interface,
                direction: args.direction.map(Into::into),
                target: args.target,
            };
            filters::add_filter_rule(
                store,
                ctx,
                args.ip_version.into(),
                args.kind.into(),
                &args.number,
                rule,
            )?;
            println!("rule added");
        }
        FilterCommand::RuleDelete {
            ip_version,
            kind,
            number,
        } => {
            filters::delete_filter_rule(store, ctx, ip_version.into(), kind.into(), &number)?;
            println!("rule deleted");
        }
        FilterCommand::RuleMove {
            ip_version,
            kind,
            from,
            to,
        } => {
            filters::reorder_filter_rule(store, ctx, ip_version.into(), kind.into(), &from, &to)?;
            println!("rule moved");
        }
    }
    Ok(())
}

pub fn run_interface(
    store: &mut FsStore,
    ctx: &RequestContext,
    command: InterfaceCommand,
) -> Result<()> {
    match command {
        InterfaceCommand::Add { name, description } => {
            interfaces::add_interface(store, ctx, &name, &description)?;
            println!("interface added");
        }
        InterfaceCommand::Delete { name } => {
            interfaces::delete_interface(store, ctx, &name)?;
            println!("interface deleted");
        }
    }
    Ok(())
}

pub fn run_flowtable(
    store: &mut FsStore,
    ctx: &RequestContext,
    command: FlowtableCommand,
) -> Result<()> {
    match command {
        FlowtableCommand::Add {
            name,
            description,
            interfaces,
        } => {
            flowtables::add_flowtable(store, ctx, &name, &description, interfaces)?;
            println!("flowtable added");
        }
        FlowtableCommand::Delete { name } => {
            flowtables::delete_flowtable(store, ctx, &name)?;
            println!("flowtable deleted");
        }
    }
    Ok(())
}

pub fn run_extra(store: &mut FsStore, ctx: &RequestContext, command: ExtraCommand) -> Result<()> {
    match command {
        ExtraCommand::Set { items, file } => {
            let lines = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?
                    .lines()
                    .map(ToString::to_string)
                    .collect(),
                None => items,
            };
            if extras::set_extra_items(store, ctx, &lines)? {
                println!("extra items stored");
            } else {
                println!("no extra items to store");
            }
        }
        ExtraCommand::Show => {
            for line in extras::extra_items_or_template(store, ctx)? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

pub fn run_system(store: &mut FsStore, ctx: &RequestContext, args: SystemArgs) -> Result<()> {
    extras::set_system(store, ctx, &args.hostname, &args.port)?;
    println!("system settings stored");
    Ok(())
}
