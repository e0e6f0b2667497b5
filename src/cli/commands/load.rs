//! load command - Loader actions for a published file

use crate::engine::session::load_config;
use crate::engine::Context;
use crate::loader::{execute_action, generate_actions, PublishRecord, IMPORT_CONTENT};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

/// List loader actions for a publish, or run one.
pub fn load(ctx: &Context, publish_file: &Path, action: Option<&str>) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let contents = fs::read_to_string(publish_file)
        .with_context(|| format!("Failed to read {}", publish_file.display()))?;
    let publish: PublishRecord = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", publish_file.display()))?;

    let Some(action) = action else {
        let actions = generate_actions(&publish, &[IMPORT_CONTENT.to_string()]);
        if ctx.json {
            output::json(&actions)?;
        } else if actions.is_empty() {
            output::print("No actions available.", verbosity);
        } else {
            for a in &actions {
                println!("{}  {}", a.name, a.caption);
            }
        }
        return Ok(());
    };

    let (config, _) = load_config(ctx).context("Failed to load config")?;
    let templates = config.templates().context("Failed to load templates")?;
    let task = execute_action(&templates, action, &publish)
        .with_context(|| format!("Failed to run {}", action))?;

    if ctx.json {
        output::json(&task)?;
    } else {
        let name = task
            .destination_name
            .as_deref()
            .unwrap_or("(file name)");
        println!(
            "Import {} -> {}{}",
            task.filename.display(),
            task.destination_path,
            name
        );
    }
    Ok(())
}
