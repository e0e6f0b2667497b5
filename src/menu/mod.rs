//! menu
//!
//! The engine menu shown in the host.
//!
//! # Modules
//!
//! - [`build`] - Menu layout and command registry
//! - [`url`] - Context URLs and entity lookup

pub mod build;
pub mod url;

pub use build::{build_menu, CommandRegistry, MenuItem, MenuItemKind};
pub use url::{context_url, entity_from_url};

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::core::config::Config;
use crate::host::SceneSnapshot;
use build::{JUMP_TO_FILE_SYSTEM, JUMP_TO_SITE};
use url::URL_KEY;

/// Command overridden to open the panel on the context entity.
pub const SHOTGUN_PANEL: &str = "Shotgun Panel...";

/// Errors from menu operations.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("no pipeline URL for the current context")]
    NoContextUrl,

    #[error("failed to open '{target}': {source}")]
    OpenFailed {
        target: String,
        source: std::io::Error,
    },
}

/// What running a command does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CommandAction {
    /// Open a page in the browser
    OpenUrl { url: String },
    /// Open folders in the file browser
    OpenPaths { paths: Vec<PathBuf> },
    /// Show the panel app on an entity
    Navigate {
        app_instance: String,
        entity_type: String,
        entity_id: i64,
    },
    /// Run the app's own callback in the host
    Run {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        app_instance: Option<String>,
    },
}

impl CommandAction {
    /// Carry out actions the engine handles itself.
    ///
    /// `Navigate` and `Run` are dispatched by the host and are only logged.
    pub fn perform(&self) -> Result<(), MenuError> {
        match self {
            CommandAction::OpenUrl { url } => {
                open::that(url).map_err(|source| MenuError::OpenFailed {
                    target: url.clone(),
                    source,
                })
            }
            CommandAction::OpenPaths { paths } => {
                for path in paths {
                    if let Err(source) = open::that(path) {
                        tracing::error!("failed to launch '{}': {}", path.display(), source);
                        return Err(MenuError::OpenFailed {
                            target: path.display().to_string(),
                            source,
                        });
                    }
                }
                Ok(())
            }
            CommandAction::Navigate {
                app_instance,
                entity_type,
                entity_id,
            } => {
                tracing::info!("{} navigates to {} {}", app_instance, entity_type, entity_id);
                Ok(())
            }
            CommandAction::Run { command, .. } => {
                tracing::info!("host runs {}", command);
                Ok(())
            }
        }
    }
}

/// Menu state for one host session.
pub struct MenuEngine<'a> {
    scene: &'a SceneSnapshot,
    config: &'a Config,
    registry: CommandRegistry,
}

impl<'a> MenuEngine<'a> {
    pub fn new(scene: &'a SceneSnapshot, config: &'a Config) -> Self {
        let mut registry = CommandRegistry::new(scene.commands.clone());
        build::register_context_commands(&scene.context, &mut registry);
        Self {
            scene,
            config,
            registry,
        }
    }

    /// Menu entries for the current context.
    pub fn menu_items(&mut self) -> Vec<MenuItem> {
        let items = build_menu(
            &self.scene.context,
            &mut self.registry,
            self.config.menu_favourites(),
        );
        tracing::debug!("menu has {} items", items.len());
        items
    }

    /// URL of the current context or selection.
    pub fn context_url(&self) -> Option<String> {
        context_url(
            self.scene,
            self.config.site_url(),
            &self.config.metadata_tag(URL_KEY),
        )
    }

    /// Entity type and id behind the context URL.
    pub fn context_entity(&self) -> Option<(String, i64)> {
        self.context_url().as_deref().and_then(entity_from_url)
    }

    /// Resolve what running `name` does.
    pub fn execute_command(&self, name: &str) -> Result<CommandAction, MenuError> {
        tracing::info!("execute_command called for {}", name);
        let command = self
            .registry
            .get(name)
            .ok_or_else(|| MenuError::UnknownCommand(name.to_string()))?;

        match name {
            JUMP_TO_SITE => {
                let url = self.context_url().ok_or(MenuError::NoContextUrl)?;
                Ok(CommandAction::OpenUrl { url })
            }
            JUMP_TO_FILE_SYSTEM => Ok(CommandAction::OpenPaths {
                paths: self.scene.context.filesystem_locations.clone(),
            }),
            SHOTGUN_PANEL => match (self.context_entity(), &command.app_instance) {
                (Some((entity_type, entity_id)), Some(app_instance)) => Ok(CommandAction::Navigate {
                    app_instance: app_instance.clone(),
                    entity_type,
                    entity_id,
                }),
                _ => Ok(run(command)),
            },
            _ => Ok(run(command)),
        }
    }
}

fn run(command: &crate::host::CommandRecord) -> CommandAction {
    CommandAction::Run {
        command: command.name.clone(),
        app_instance: command.app_instance.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GlobalConfig;
    use crate::host::{CommandRecord, CommandType, EntityRef, PipelineContext};

    fn scene() -> SceneSnapshot {
        SceneSnapshot {
            context: PipelineContext {
                entity: Some(EntityRef {
                    entity_type: "Shot".into(),
                    id: 42,
                    name: Some("SH010".into()),
                }),
                filesystem_locations: vec![PathBuf::from("/prod/SH010")],
                ..Default::default()
            },
            commands: vec![CommandRecord {
                name: SHOTGUN_PANEL.into(),
                command_type: CommandType::Default,
                short_name: None,
                description: None,
                app_instance: Some("tk-multi-shotgunpanel".into()),
                app_name: Some("Shotgun Panel".into()),
            }],
            ..Default::default()
        }
    }

    fn config(site: Option<&str>) -> Config {
        Config::new(
            GlobalConfig {
                site_url: site.map(str::to_string),
                ..Default::default()
            },
            None,
        )
    }

    #[test]
    fn jump_to_site_opens_context_url() {
        let scene = scene();
        let config = config(Some("https://studio.example.com"));
        let engine = MenuEngine::new(&scene, &config);

        assert_eq!(
            engine.execute_command(JUMP_TO_SITE).unwrap(),
            CommandAction::OpenUrl {
                url: "https://studio.example.com/detail/Shot/42".into()
            }
        );
    }

    #[test]
    fn jump_to_site_without_url_fails() {
        let scene = scene();
        let config = config(None);
        let engine = MenuEngine::new(&scene, &config);
        assert!(matches!(
            engine.execute_command(JUMP_TO_SITE),
            Err(MenuError::NoContextUrl)
        ));
    }

    #[test]
    fn jump_to_file_system() {
        let scene = scene();
        let config = config(None);
        let engine = MenuEngine::new(&scene, &config);
        assert_eq!(
            engine.execute_command(JUMP_TO_FILE_SYSTEM).unwrap(),
            CommandAction::OpenPaths {
                paths: vec![PathBuf::from("/prod/SH010")]
            }
        );
    }

    #[test]
    fn panel_navigates_to_context_entity() {
        let scene = scene();
        let config = config(Some("https://studio.example.com"));
        let engine = MenuEngine::new(&scene, &config);

        assert_eq!(
            engine.execute_command(SHOTGUN_PANEL).unwrap(),
            CommandAction::Navigate {
                app_instance: "tk-multi-shotgunpanel".into(),
                entity_type: "Shot".into(),
                entity_id: 42,
            }
        );
    }

    #[test]
    fn panel_falls_back_without_entity() {
        let scene = scene();
        let config = config(None);
        let engine = MenuEngine::new(&scene, &config);

        assert!(matches!(
            engine.execute_command(SHOTGUN_PANEL).unwrap(),
            CommandAction::Run { .. }
        ));
    }

    #[test]
    fn unknown_command() {
        let scene = scene();
        let config = config(None);
        let engine = MenuEngine::new(&scene, &config);
        assert!(matches!(
            engine.execute_command("Nope"),
            Err(MenuError::UnknownCommand(_))
        ));
    }

    #[test]
    fn menu_items_include_context_section() {
        let scene = scene();
        let config = config(None);
        let mut engine = MenuEngine::new(&scene, &config);
        let items = engine.menu_items();
        assert_eq!(items[0].title, "Shot SH010");
        assert!(items.iter().any(|i| i.title == JUMP_TO_FILE_SYSTEM));
    }
}
