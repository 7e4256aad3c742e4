use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vyfw::compile::compile;
use vyfw::device::render_command_file;
use vyfw::diff::diff_snapshots;
use vyfw::ops::{chains, filters, flowtables, groups, interfaces};
use vyfw::repo;
use vyfw::report::{render_diff, render_summary};
use vyfw::snapshot;
use vyfw::store::{DocumentStore, FsStore};
use vyfw::RequestContext;

mod cli;
mod mutate_cmd;
mod snapshot_cmd;

use cli::{Cli, Command, DiffArgs, ListArgs, ListTarget, OutputFormat, RenderArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = RequestContext::new(cli.owner.clone(), cli.firewall.clone());
    let mut store = FsStore::new(&cli.data_dir);

    match cli.command {
        Command::Show => run_show(&mut store, &ctx),
        Command::Json => run_json(&mut store, &ctx),
        Command::Render(args) => run_render(&mut store, &ctx, args),
        Command::List(args) => run_list(&mut store, &ctx, args),
        Command::Diff(args) => run_diff(&store, &ctx, args),
        Command::Snapshot(command) => snapshot_cmd::run(&mut store, &ctx, command),
        Command::Group(command) => mutate_cmd::run_group(&mut store, &ctx, command),
        Command::Chain(command) => mutate_cmd::run_chain(&mut store, &ctx, command),
        Command::Filter(command) => mutate_cmd::run_filter(&mut store, &ctx, command),
        Command::Interface(command) => mutate_cmd::run_interface(&mut store, &ctx, command),
        Command::Flowtable(command) => mutate_cmd::run_flowtable(&mut store, &ctx, command),
        Command::Extra(command) => mutate_cmd::run_extra(&mut store, &ctx, command),
        Command::System(args) => mutate_cmd::run_system(&mut store, &ctx, args),
    }
}

fn run_show(store: &mut FsStore, ctx: &RequestContext) -> Result<()> {
    let doc = repo::load_current(store, ctx)?;
    for line in compile(&doc) {
        println!("{line}");
    }
    Ok(())
}

fn run_json(store: &mut FsStore, ctx: &RequestContext) -> Result<()> {
    println!("{}", repo::export_json(store, ctx)?);
    Ok(())
}

fn run_render(store: &mut FsStore, ctx: &RequestContext, args: RenderArgs) -> Result<()> {
    let doc = repo::load_current(store, ctx)?;
    let rendered = render_command_file(&compile(&doc), args.delete);

    match args.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("failed to write commands file {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

fn run_diff(store: &FsStore, ctx: &RequestContext, args: DiffArgs) -> Result<()> {
    let comparison = diff_snapshots(store, ctx, &args.label_a, &args.label_b)?;

    if args.summary {
        println!("{}", render_summary(&comparison.rows));
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_diff(&comparison.rows));
            println!();
            println!("{}", render_summary(&comparison.rows));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }
    Ok(())
}

fn run_list(store: &mut FsStore, ctx: &RequestContext, args: ListArgs) -> Result<()> {
    match args.target {
        ListTarget::Firewalls => {
            for name in store.list_firewalls(&ctx.owner)? {
                println!("{name}");
            }
        }
        ListTarget::Chains => {
            for (version, name) in chains::list_chains(store, ctx)? {
                println!("{version} {name}");
            }
        }
        ListTarget::Rules => {
            for rule in chains::list_chain_rules(store, ctx)? {
                println!(
                    "{} {} {} {}",
                    rule.ip_version, rule.chain, rule.number, rule.description
                );
            }
        }
        ListTarget::Groups => {
            for group in groups::list_groups(store, ctx)? {
                println!(
                    "{} {} {} [{}]",
                    group.ip_version,
                    group.kind.token(),
                    group.name,
                    group.values.join(", ")
                );
            }
        }
        ListTarget::Filters => {
            for (version, kind) in filters::list_filters(store, ctx)? {
                println!("{version} {kind}");
            }
        }
        ListTarget::Interfaces => {
            for interface in interfaces::list_interfaces(store, ctx)? {
                println!("{} {}", interface.name, interface.description);
            }
        }
        ListTarget::Flowtables => {
            for flowtable in flowtables::list_flowtables(store, ctx)? {
                println!(
                    "{} {} [{}]",
                    flowtable.name,
                    flowtable.description,
                    flowtable.interfaces.join(", ")
                );
            }
        }
        ListTarget::Snapshots => {
            for info in snapshot::list(store, ctx)? {
                match info.tag {
                    Some(tag) => println!("{}\t{tag}", info.label),
                    None => println!("{}", info.label),
                }
            }
        }
    }
    Ok(())
}
