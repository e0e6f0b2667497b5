//! config command - Get, set, or list configuration values

use crate::core::config::{Config, GlobalConfig, ProjectConfig};
use crate::engine::session::load_config;
use crate::engine::Context;
use crate::ui::output::{self, Verbosity};
use anyhow::{bail, Context as _, Result};
use std::collections::BTreeMap;

/// Keys understood by `config get` and `config set`.
const KEYS: &[&str] = &[
    "site_url",
    "metadata_tag_prefix",
    "publish.movie_template",
    "publish.asset_template",
    "publish.render_presets",
    "render.resolution",
    "render.frame_rate",
    "render.quality",
];

fn value_of(config: &Config, key: &str) -> Result<Option<String>> {
    let value = match key {
        "site_url" => config.site_url().map(str::to_string),
        "metadata_tag_prefix" => Some(config.metadata_tag_prefix().to_string()),
        "publish.movie_template" => Some(config.movie_template().to_string()),
        "publish.asset_template" => Some(config.asset_template().to_string()),
        "publish.render_presets" => config.render_presets().map(str::to_string),
        "render.resolution" => {
            let (w, h) = config.render_resolution();
            Some(format!("{}x{}", w, h))
        }
        "render.frame_rate" => Some(config.render_frame_rate().to_string()),
        "render.quality" => Some(config.render_quality().to_string()),
        _ => bail!("Unknown configuration key: {}", key),
    };
    Ok(value)
}

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let (config, _) = load_config(ctx).context("Failed to load config")?;
    if let Some(value) = value_of(&config, key)? {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value.
///
/// `site_url` lives in the global config, everything else in the project
/// config of the working directory.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    let (config, _) = load_config(ctx).context("Failed to load config")?;

    let written = if key == "site_url" {
        let mut global: GlobalConfig = config.global.clone();
        global.site_url = Some(value.to_string());
        global.validate().context("Invalid value")?;
        Config::write_global(&global).context("Failed to write config")?
    } else {
        let mut project: ProjectConfig = config.project.clone().unwrap_or_default();
        set_project_value(&mut project, key, value)?;
        project.validate().context("Invalid value")?;
        let cwd = ctx.working_dir()?;
        Config::write_project(&cwd, &project).context("Failed to write config")?
    };

    output::print(
        format!("Set {} = {} in {}", key, value, written.display()),
        verbosity,
    );
    Ok(())
}

fn set_project_value(project: &mut ProjectConfig, key: &str, value: &str) -> Result<()> {
    let parse_u32 = |v: &str| -> Result<u32> {
        v.parse()
            .with_context(|| format!("'{}' is not a positive number", v))
    };

    match key {
        "metadata_tag_prefix" => project.metadata_tag_prefix = Some(value.to_string()),
        "publish.movie_template" => {
            project.publish.get_or_insert_with(Default::default).movie_template =
                Some(value.to_string())
        }
        "publish.asset_template" => {
            project.publish.get_or_insert_with(Default::default).asset_template =
                Some(value.to_string())
        }
        "publish.render_presets" => {
            project.publish.get_or_insert_with(Default::default).render_presets =
                Some(value.to_string())
        }
        "render.resolution" => {
            let Some((w, h)) = value.split_once('x') else {
                bail!("Resolution must look like 1920x1080");
            };
            project.render.get_or_insert_with(Default::default).resolution =
                Some([parse_u32(w)?, parse_u32(h)?]);
        }
        "render.frame_rate" => {
            project.render.get_or_insert_with(Default::default).frame_rate =
                Some(parse_u32(value)?)
        }
        "render.quality" => {
            project.render.get_or_insert_with(Default::default).quality = Some(parse_u32(value)?)
        }
        _ => bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let (config, warnings) = load_config(ctx).context("Failed to load config")?;

    let mut values = BTreeMap::new();
    for key in KEYS {
        values.insert(*key, value_of(&config, key)?);
    }

    if ctx.json {
        output::json(&values)?;
        return Ok(());
    }

    match config.global_config_loaded_from() {
        Some(path) => println!("# Global config: {}", path.display()),
        None => println!("# Global config: (none)"),
    }
    match config.project_config_loaded_from() {
        Some(path) => println!("# Project config: {}", path.display()),
        None => println!("# Project config: (none)"),
    }
    for warning in &warnings {
        println!("# warning: {}", warning.message);
    }

    for (key, value) in &values {
        match value {
            Some(v) => println!("{} = {}", key, v),
            None => println!("{} = (not set)", key),
        }
    }
    Ok(())
}
