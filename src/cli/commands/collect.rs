//! collect command - List publish items for the selection

use crate::engine::{Context, Session};
use crate::publish::collect as collect_items;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Print the publish items the selection produces.
pub fn collect(ctx: &Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let session = Session::open(ctx).context("Failed to open session")?;
    let collection = collect_items(&session.scene);

    if ctx.json {
        output::json(&collection)?;
        return Ok(());
    }

    for cycle in &collection.cycles {
        output::warn(cycle, verbosity);
    }
    for skipped in &collection.skipped {
        output::warn(format!("skipped {}", skipped), verbosity);
    }

    if collection.items.is_empty() {
        output::print("Nothing to publish.", verbosity);
        return Ok(());
    }
    for item in &collection.items {
        println!("{}  [{}]", item.name, item.item_type);
    }
    Ok(())
}
