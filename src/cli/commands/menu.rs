//! menu command - Show the engine menu or run a menu command

use crate::engine::{Context, Session};
use crate::menu::{CommandAction, MenuEngine, MenuItemKind};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the menu, or resolve and perform `execute`.
pub fn menu(ctx: &Context, execute: Option<&str>, dry_run: bool) -> Result<()> {
    let session = Session::open(ctx).context("Failed to open session")?;
    let mut engine = MenuEngine::new(&session.scene, &session.config);

    let Some(name) = execute else {
        let items = engine.menu_items();
        if ctx.json {
            output::json(&items)?;
            return Ok(());
        }
        for item in &items {
            match item.kind {
                MenuItemKind::ContextBegin => println!("[{}]", item.title),
                MenuItemKind::ContextEnd => {}
                MenuItemKind::Separator => println!("----"),
                MenuItemKind::ContextMenu => println!("  {}", item.name),
                MenuItemKind::Default => println!("{}", item.name),
            }
        }
        return Ok(());
    };

    let action = engine
        .execute_command(name)
        .with_context(|| format!("Failed to run '{}'", name))?;

    if ctx.json {
        output::json(&action)?;
    } else {
        describe(&action);
    }
    if !dry_run {
        action.perform()?;
    }
    Ok(())
}

fn describe(action: &CommandAction) {
    match action {
        CommandAction::OpenUrl { url } => println!("open {}", url),
        CommandAction::OpenPaths { paths } => {
            for path in paths {
                println!("open {}", path.display());
            }
        }
        CommandAction::Navigate {
            app_instance,
            entity_type,
            entity_id,
        } => println!("{}: navigate to {} {}", app_instance, entity_type, entity_id),
        CommandAction::Run { command, .. } => println!("run {}", command),
    }
}
