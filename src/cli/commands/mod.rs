//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a session or loads config as needed
//! 2. Calls into the library
//! 3. Formats and displays output, as JSON with `--json`
//!
//! Only `publish` writes the scene back.

mod collect;
mod completion;
mod config_cmd;
mod load;
mod menu;
mod paths;
mod publish;

pub use collect::collect;
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use load::load;
pub use menu::menu;
pub use paths::{index, paths};
pub use publish::{publish, render};

use super::args::{Command, ConfigAction};
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Paths { sequence, full } => paths(ctx, &sequence, full),
        Command::Index => index(ctx),
        Command::Collect => collect(ctx),
        Command::Publish {
            item,
            description,
            dry_run,
            date,
        } => publish(
            ctx,
            item.as_deref(),
            description.as_deref(),
            dry_run,
            date,
        ),
        Command::Render { item, date } => render(ctx, item.as_deref(), date),
        Command::Load { publish, action } => load(ctx, &publish, action.as_deref()),
        Command::Menu { execute, dry_run } => menu(ctx, execute.as_deref(), dry_run),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_get(ctx, &key),
            ConfigAction::Set { key, value } => config_set(ctx, &key, &value),
            ConfigAction::List => config_list(ctx),
        },
        Command::Completion { shell } => completion(shell),
    }
}
