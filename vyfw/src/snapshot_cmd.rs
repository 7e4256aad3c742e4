use anyhow::Result;
use vyfw::snapshot;
use vyfw::store::FsStore;
use vyfw::RequestContext;

use crate::cli::SnapshotCommand;

pub fn run(store: &mut FsStore, ctx: &RequestContext, command: SnapshotCommand) -> Result<()> {
    match command {
        SnapshotCommand::Create => {
            let label = snapshot::create(store, ctx)?;
            println!("{label}");
        }
        SnapshotCommand::List => {
            for info in snapshot::list(store, ctx)? {
                match info.tag {
                    Some(tag) => println!("{}\t{tag}", info.label),
                    None => println!("{}", info.label),
                }
            }
        }
        SnapshotCommand::Tag { label, text } => {
            snapshot::tag(store, ctx, &label, &text)?;
            println!("snapshot tagged");
        }
        SnapshotCommand::Select { label } => {
            snapshot::select(store, ctx, &label)?;
            println!("snapshot selected");
        }
        SnapshotCommand::Delete { label } => {
            snapshot::delete(store, ctx, &label)?;
            println!("snapshot deleted");
        }
    }
    Ok(())
}
