//! publish and render commands - Validate and publish the selection

use crate::engine::{Context, Session};
use crate::publish::movie::VersionData;
use crate::publish::{
    collect, AssetPlan, AssetPublisher, MoviePlan, MoviePublisher, Platform, PublishItem,
    PublishedFileData, RenderInvocation,
};
use crate::ui::output::{self, Verbosity};
use anyhow::{bail, Context as _, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "plugin", rename_all = "snake_case")]
enum Plan {
    Movie(MoviePlan),
    Asset(AssetPlan),
}

#[derive(Serialize)]
#[serde(tag = "plugin", rename_all = "snake_case")]
enum Published {
    Movie {
        item: String,
        render: RenderInvocation,
        published_file: PublishedFileData,
        version: VersionData,
    },
    Asset {
        item: String,
        published_file: PublishedFileData,
    },
}

fn selected_items(
    ctx: &Context,
    session: &Session,
    only: Option<&str>,
) -> Result<Vec<PublishItem>> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let collection = collect(&session.scene);
    for cycle in &collection.cycles {
        output::warn(cycle, verbosity);
    }
    for skipped in &collection.skipped {
        output::warn(format!("skipped {}", skipped), verbosity);
    }

    let items: Vec<PublishItem> = match only {
        Some(name) => collection
            .items
            .into_iter()
            .filter(|item| item.name == name)
            .collect(),
        None => collection.items,
    };
    if let (Some(name), true) = (only, items.is_empty()) {
        bail!("No publish item named '{}'", name);
    }
    Ok(items)
}

/// Validate every selected item, then publish them.
pub fn publish(
    ctx: &Context,
    only: Option<&str>,
    description: Option<&str>,
    dry_run: bool,
    date: Option<NaiveDate>,
) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let mut session = Session::open(ctx).context("Failed to open session")?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let items = selected_items(ctx, &session, only)?;

    if items.is_empty() {
        output::print("Nothing to publish.", verbosity);
        return Ok(());
    }

    let movies = MoviePublisher::new(
        &session.config,
        &session.templates,
        Platform::current(),
        today,
    );
    let assets = AssetPublisher::new(&session.config, &session.templates, today);

    let mut plans = Vec::new();
    let mut failures = 0;
    for item in &items {
        let plan = if item.is_level_sequence() {
            movies.validate(&session.scene, item).map(Plan::Movie)
        } else {
            assets.validate(&session.scene, item).map(Plan::Asset)
        };
        match plan {
            Ok(plan) => plans.push(plan),
            Err(e) => {
                failures += 1;
                output::error(format!("{}: {}", item.name, e));
            }
        }
    }
    if failures > 0 {
        bail!("{} item(s) failed validation", failures);
    }

    if dry_run {
        if ctx.json {
            output::json(&plans)?;
        } else {
            for plan in &plans {
                match plan {
                    Plan::Movie(p) => println!(
                        "{} -> {} (v{:03}, {})",
                        p.item_name,
                        p.publish_path.display(),
                        p.version_number,
                        p.renderer
                    ),
                    Plan::Asset(p) => println!("{} -> {}", p.item_name, p.publish_path.display()),
                }
            }
        }
        return Ok(());
    }

    let mut published = Vec::new();
    let mut scene_changed = false;
    for plan in &plans {
        match plan {
            Plan::Movie(p) => {
                let result = movies
                    .publish(&mut session.scene, p, description)
                    .with_context(|| format!("Failed to publish {}", p.item_name))?;
                scene_changed = true;
                published.push(Published::Movie {
                    item: p.item_name.clone(),
                    render: result.render,
                    published_file: result.published_file,
                    version: result.version,
                });
            }
            Plan::Asset(p) => {
                let published_file = assets.publish(&session.scene, p, description);
                published.push(Published::Asset {
                    item: p.item_name.clone(),
                    published_file,
                });
            }
        }
    }

    if scene_changed {
        session.save_scene().context("Failed to save scene")?;
    }

    if ctx.json {
        output::json(&published)?;
    } else {
        for entry in &published {
            match entry {
                Published::Movie {
                    item,
                    published_file,
                    ..
                }
                | Published::Asset {
                    item,
                    published_file,
                } => output::print(
                    format!("Published {} -> {}", item, published_file.path.display()),
                    verbosity,
                ),
            }
        }
    }
    Ok(())
}

/// Print the render command for one level sequence item.
pub fn render(ctx: &Context, only: Option<&str>, date: Option<NaiveDate>) -> Result<()> {
    let session = Session::open(ctx).context("Failed to open session")?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let items = selected_items(ctx, &session, only)?;

    let Some(item) = items.iter().find(|i| i.is_level_sequence()) else {
        bail!("No level sequence selected");
    };

    let movies = MoviePublisher::new(
        &session.config,
        &session.templates,
        Platform::current(),
        today,
    );
    let plan = movies
        .validate(&session.scene, item)
        .with_context(|| format!("Failed to validate {}", item.name))?;

    // Render on a copy so the version metadata stays untouched.
    let mut scene = session.scene.clone();
    let result = movies
        .publish(&mut scene, &plan, None)
        .with_context(|| format!("Failed to plan render of {}", item.name))?;

    if ctx.json {
        output::json(&result.render)?;
    } else {
        println!("{}", result.render.command_line());
    }
    Ok(())
}
