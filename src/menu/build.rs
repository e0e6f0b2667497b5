//! menu::build
//!
//! Menu layout.
//!
//! The menu is a flat list the host turns into nested sections:
//!
//! ```text
//! context_begin  <context name>
//!   context menu commands (Jump to Shotgun, Jump to File System, ...)
//! context_end
//! favourites
//! separator
//! apps, sorted by name:
//!   context_begin <app> / commands / context_end   (apps with several commands)
//!   command                                        (apps with one command)
//! ```

use serde::Serialize;

use crate::core::config::MenuFavourite;
use crate::host::{CommandRecord, CommandType, PipelineContext};

/// Title of the command opening the context page.
pub const JUMP_TO_SITE: &str = "Jump to Shotgun";

/// Title of the command opening the context folders.
pub const JUMP_TO_FILE_SYSTEM: &str = "Jump to File System";

/// Section title for commands without an app.
pub const OTHER_ITEMS: &str = "Other Items";

/// Kind of a menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItemKind {
    ContextBegin,
    ContextEnd,
    Separator,
    ContextMenu,
    Default,
}

impl From<CommandType> for MenuItemKind {
    fn from(command_type: CommandType) -> Self {
        match command_type {
            CommandType::ContextMenu => MenuItemKind::ContextMenu,
            CommandType::Default => MenuItemKind::Default,
        }
    }
}

/// One entry of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    #[serde(rename = "type")]
    pub kind: MenuItemKind,
    pub name: String,
    pub title: String,
    pub description: String,
}

impl MenuItem {
    fn marker(kind: MenuItemKind, title: &str) -> Self {
        Self {
            kind,
            name: title.to_string(),
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn command(command: &CommandRecord) -> Self {
        Self {
            kind: command.command_type.into(),
            name: command
                .short_name
                .clone()
                .unwrap_or_else(|| command.name.clone()),
            title: command.name.clone(),
            description: command.description.clone().unwrap_or_default(),
        }
    }
}

/// Commands registered in the session, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandRecord>,
}

impl CommandRegistry {
    pub fn new(commands: Vec<CommandRecord>) -> Self {
        Self { commands }
    }

    /// Register a command, replacing one with the same name in place.
    pub fn register(&mut self, command: CommandRecord) {
        match self.commands.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = command,
            None => self.commands.push(command),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandRecord> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandRecord> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Register the context commands the engine itself provides.
pub fn register_context_commands(context: &PipelineContext, registry: &mut CommandRegistry) {
    registry.register(CommandRecord::new(
        JUMP_TO_SITE,
        CommandType::ContextMenu,
        "jump_to_sg",
    ));
    if !context.filesystem_locations.is_empty() {
        registry.register(CommandRecord::new(
            JUMP_TO_FILE_SYSTEM,
            CommandType::ContextMenu,
            "jump_to_fs",
        ));
    }
}

/// Lay out the menu for the current context.
pub fn build_menu(
    context: &PipelineContext,
    registry: &mut CommandRegistry,
    favourites: &[MenuFavourite],
) -> Vec<MenuItem> {
    let mut items = Vec::new();

    let context_name = context.display_name();
    items.push(MenuItem::marker(MenuItemKind::ContextBegin, &context_name));
    register_context_commands(context, registry);

    for command in registry.iter() {
        if command.command_type == CommandType::ContextMenu {
            items.push(MenuItem::command(command));
        }
    }
    items.push(MenuItem {
        kind: MenuItemKind::ContextEnd,
        name: String::new(),
        title: String::new(),
        description: String::new(),
    });

    let mut favourite_names: Vec<&str> = Vec::new();
    for favourite in favourites {
        for command in registry.iter() {
            if command.app_instance.as_deref() == Some(favourite.app_instance.as_str())
                && command.name == favourite.name
            {
                items.push(MenuItem::command(command));
                favourite_names.push(&command.name);
            }
        }
    }

    items.push(MenuItem {
        kind: MenuItemKind::Separator,
        name: String::new(),
        title: String::new(),
        description: String::new(),
    });

    let mut by_app: Vec<(&str, Vec<&CommandRecord>)> = Vec::new();
    for command in registry.iter() {
        if command.command_type == CommandType::ContextMenu {
            continue;
        }
        let app = command.app_name.as_deref().unwrap_or(OTHER_ITEMS);
        match by_app.iter_mut().find(|(name, _)| *name == app) {
            Some((_, commands)) => commands.push(command),
            None => by_app.push((app, vec![command])),
        }
    }
    by_app.sort_by(|a, b| a.0.cmp(b.0));

    for (app, commands) in by_app {
        if commands.len() > 1 {
            items.push(MenuItem::marker(MenuItemKind::ContextBegin, app));
            items.extend(commands.iter().map(|c| MenuItem::command(c)));
            items.push(MenuItem::marker(MenuItemKind::ContextEnd, app));
        } else if let Some(command) = commands.first() {
            if !favourite_names.contains(&command.name.as_str()) {
                items.push(MenuItem::command(command));
            }
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn app_command(name: &str, app_instance: &str, app_name: &str) -> CommandRecord {
        CommandRecord {
            name: name.into(),
            command_type: CommandType::Default,
            short_name: None,
            description: None,
            app_instance: Some(app_instance.into()),
            app_name: Some(app_name.into()),
        }
    }

    fn titles(items: &[MenuItem]) -> Vec<(MenuItemKind, &str)> {
        items.iter().map(|i| (i.kind, i.title.as_str())).collect()
    }

    #[test]
    fn full_layout() {
        let context = PipelineContext {
            name: "Shot SH010".into(),
            filesystem_locations: vec![PathBuf::from("/prod/SH010")],
            ..Default::default()
        };
        let mut registry = CommandRegistry::new(vec![
            app_command("Publish...", "tk-multi-publish2", "Publish"),
            app_command("Load...", "tk-multi-loader2", "Loader"),
            app_command("Shotgun Panel...", "tk-multi-shotgunpanel", "Shotgun Panel"),
            app_command("Work Area Info...", "tk-multi-about", "About"),
            app_command("Reload", "tk-multi-about", "About"),
            CommandRecord::new("Log Console", CommandType::Default, "log"),
        ]);
        let favourites = vec![MenuFavourite {
            app_instance: "tk-multi-publish2".into(),
            name: "Publish...".into(),
        }];

        let items = build_menu(&context, &mut registry, &favourites);
        assert_eq!(
            titles(&items),
            vec![
                (MenuItemKind::ContextBegin, "Shot SH010"),
                (MenuItemKind::ContextMenu, "Jump to Shotgun"),
                (MenuItemKind::ContextMenu, "Jump to File System"),
                (MenuItemKind::ContextEnd, ""),
                (MenuItemKind::Default, "Publish..."),
                (MenuItemKind::Separator, ""),
                (MenuItemKind::ContextBegin, "About"),
                (MenuItemKind::Default, "Work Area Info..."),
                (MenuItemKind::Default, "Reload"),
                (MenuItemKind::ContextEnd, "About"),
                (MenuItemKind::Default, "Load..."),
                (MenuItemKind::Default, "Log Console"),
                (MenuItemKind::Default, "Shotgun Panel..."),
            ]
        );
        assert_eq!(items[1].name, "jump_to_sg");
    }

    #[test]
    fn no_file_system_jump_without_locations() {
        let mut registry = CommandRegistry::default();
        let items = build_menu(&PipelineContext::default(), &mut registry, &[]);
        assert_eq!(
            titles(&items),
            vec![
                (MenuItemKind::ContextBegin, "Empty Context"),
                (MenuItemKind::ContextMenu, "Jump to Shotgun"),
                (MenuItemKind::ContextEnd, ""),
                (MenuItemKind::Separator, ""),
            ]
        );
    }

    #[test]
    fn building_twice_registers_once() {
        let mut registry = CommandRegistry::default();
        build_menu(&PipelineContext::default(), &mut registry, &[]);
        build_menu(&PipelineContext::default(), &mut registry, &[]);
        assert_eq!(registry.len(), 1);
    }
}
