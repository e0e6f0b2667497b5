//! paths and index commands - Edit path queries

use crate::core::edits::EditIndex;
use crate::core::resolve::resolve;
use crate::core::types::NodeId;
use crate::engine::{Context, Session};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};
use serde::Serialize;

#[derive(Serialize)]
struct PathsOutput<'a> {
    sequence: &'a str,
    paths: Vec<Vec<&'a str>>,
    cycles: Vec<String>,
}

/// Print every edit path of a sequence, root first.
pub fn paths(ctx: &Context, sequence: &str, full: bool) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let session = Session::open(ctx).context("Failed to open session")?;
    let node = NodeId::new(sequence).context("Invalid sequence path")?;

    let index = EditIndex::build(&session.scene);
    let resolution = resolve(&index, &node);

    if ctx.json {
        let out = PathsOutput {
            sequence,
            paths: resolution
                .paths
                .iter()
                .map(|p| p.root_to_leaf().map(NodeId::as_str).collect())
                .collect(),
            cycles: resolution.cycles.iter().map(|c| c.to_string()).collect(),
        };
        output::json(&out)?;
        return Ok(());
    }

    for cycle in &resolution.cycles {
        output::warn(cycle, verbosity);
    }
    if resolution.paths.is_empty() {
        output::warn(format!("every edit path of '{}' is cyclic", sequence), verbosity);
        return Ok(());
    }

    for path in &resolution.paths {
        if full {
            let nodes: Vec<&str> = path.root_to_leaf().map(NodeId::as_str).collect();
            println!("{}", nodes.join(" > "));
        } else {
            println!("{}", path);
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    node: &'a str,
    root: bool,
    parents: Vec<&'a str>,
}

/// Print the edit index: each sequence and the sequences that use it.
pub fn index(ctx: &Context) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let session = Session::open(ctx).context("Failed to open session")?;
    let index = EditIndex::build(&session.scene);

    let entries: Vec<IndexEntry<'_>> = index
        .iter()
        .map(|(node, edits)| IndexEntry {
            node: node.as_str(),
            root: edits.is_empty(),
            parents: edits.iter().map(|e| e.parent.as_str()).collect(),
        })
        .collect();

    if ctx.json {
        output::json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        output::print("No sequences in scene.", verbosity);
        return Ok(());
    }
    for entry in &entries {
        if entry.root {
            println!("{} (root)", entry.node);
        } else {
            println!("{}", entry.node);
            println!("{}", output::format_list(&entry.parents, "  <- "));
        }
    }
    Ok(())
}
