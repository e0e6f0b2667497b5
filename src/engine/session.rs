//! engine::session
//!
//! Loaded configuration and scene for one command.

use std::path::PathBuf;

use super::{Context, EngineError};
use crate::core::config::{Config, ConfigWarning};
use crate::core::template::TemplateSet;
use crate::host::SceneSnapshot;

/// Configuration and host scene for one command.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub templates: TemplateSet,
    pub scene: SceneSnapshot,
    /// Where the scene was loaded from
    pub scene_path: PathBuf,
    /// Non-fatal configuration problems
    pub warnings: Vec<ConfigWarning>,
}

impl Session {
    /// Load config for the working directory and the scene snapshot.
    pub fn open(ctx: &Context) -> Result<Self, EngineError> {
        let (config, warnings) = load_config(ctx)?;
        let templates = config.templates()?;

        let scene_path = ctx.scene_path()?;
        tracing::debug!("loading scene snapshot from {}", scene_path.display());
        let scene = SceneSnapshot::load(&scene_path)?;

        Ok(Self {
            config,
            templates,
            scene,
            scene_path,
            warnings,
        })
    }

    /// Write the scene back to where it was loaded from.
    pub fn save_scene(&self) -> Result<(), EngineError> {
        tracing::debug!("saving scene snapshot to {}", self.scene_path.display());
        self.scene.save(&self.scene_path)?;
        Ok(())
    }
}

/// Load configuration only, for commands that need no scene.
pub fn load_config(ctx: &Context) -> Result<(Config, Vec<ConfigWarning>), EngineError> {
    let cwd = ctx.working_dir()?;
    let loaded = Config::load(Some(&cwd))?;
    for warning in &loaded.warnings {
        tracing::warn!("{}: {}", warning.path.display(), warning.message);
    }
    Ok((loaded.config, loaded.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn open_and_save() {
        let temp = TempDir::new().unwrap();
        let scene_path = temp.path().join("scene.json");
        fs::write(
            &scene_path,
            r#"{ "assets": [ { "path": "/Game/A", "class": "LevelSequence" } ] }"#,
        )
        .unwrap();

        let ctx = Context {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let mut session = Session::open(&ctx).unwrap();
        assert_eq!(session.scene.assets.len(), 1);
        assert!(session.templates.get("unreal_movie_publish").is_some());

        session
            .scene
            .set_metadata_tag("/Game/A", "SG.version_number", "2")
            .unwrap();
        session.save_scene().unwrap();

        let reloaded = SceneSnapshot::load(&scene_path).unwrap();
        assert_eq!(reloaded.metadata_tag("/Game/A", "SG.version_number"), Some("2"));
    }

    #[test]
    fn missing_scene_is_an_error() {
        let temp = TempDir::new().unwrap();
        let ctx = Context {
            cwd: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(Session::open(&ctx), Err(EngineError::Host(_))));
    }
}
