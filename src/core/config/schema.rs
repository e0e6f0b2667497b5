//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$SHOTPATH_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/shotpath/config.toml`
//! 3. `~/.shotpath/config.toml` (canonical write location)
//!
//! # Project Config
//!
//! Located at `<project>/.shotpath/config.toml` (canonical).
//!
//! # Validation
//!
//! Config values are validated after parsing: templates must parse,
//! referenced template names must exist, render settings must be sane.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::template::{KeyKind, Template, TemplateKey};

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// site_url = "https://studio.example.com"
/// metadata_tag_prefix = "SG."
///
/// [[menu_favourites]]
/// app_instance = "tk-multi-publish2"
/// name = "Publish..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Pipeline site URL, used when the scene context has none
    pub site_url: Option<String>,

    /// Prefix for asset metadata tags
    pub metadata_tag_prefix: Option<String>,

    /// Commands pinned to the top of the menu
    pub menu_favourites: Option<Vec<MenuFavourite>>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.site_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "site_url '{}' must start with http:// or https://",
                    url
                )));
            }
        }

        validate_prefix(self.metadata_tag_prefix.as_deref())?;

        for favourite in self.menu_favourites.iter().flatten() {
            if favourite.app_instance.is_empty() || favourite.name.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "menu favourites need both app_instance and name".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// A menu favourite entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MenuFavourite {
    pub app_instance: String,
    pub name: String,
}

/// Project configuration.
///
/// # Example
///
/// ```toml
/// metadata_tag_prefix = "SG."
///
/// [templates.keys.version]
/// type = "int"
/// format_spec = "03"
///
/// [templates.paths]
/// unreal_movie_publish = "editorial/{level_sequence}_v{version}.{ue_mov_ext}"
///
/// [publish]
/// movie_template = "unreal_movie_publish"
///
/// [render]
/// resolution = [1920, 1080]
/// frame_rate = 25
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Prefix for asset metadata tags, overrides the global value
    pub metadata_tag_prefix: Option<String>,

    /// Template keys and path definitions, merged over the built-in ones
    pub templates: Option<TemplatesConfig>,

    /// Publish settings
    pub publish: Option<PublishConfig>,

    /// Movie render settings
    pub render: Option<RenderConfig>,
}

impl ProjectConfig {
    /// Validate the configuration values.
    ///
    /// Template names referenced from `[publish]` are checked against the
    /// merged template set by [`super::Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_prefix(self.metadata_tag_prefix.as_deref())?;

        if let Some(templates) = &self.templates {
            for (name, key) in &templates.keys {
                key.validate(name).map_err(ConfigError::InvalidValue)?;
            }
            for (name, definition) in &templates.paths {
                Template::parse(name, definition)
                    .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
            }
        }

        if let Some(render) = &self.render {
            render.validate()?;
        }

        Ok(())
    }
}

/// Template section of the project config.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    pub keys: BTreeMap<String, TemplateKey>,
    pub paths: BTreeMap<String, String>,
}

/// Publish settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Template used for rendered movies
    pub movie_template: Option<String>,

    /// Template used for exported FBX files
    pub asset_template: Option<String>,

    /// Movie Render Queue presets asset, if any
    pub render_presets: Option<String>,
}

/// Movie render settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Output resolution as `[width, height]`
    pub resolution: Option<[u32; 2]>,

    /// Frames per second for the Level Sequencer capture
    pub frame_rate: Option<u32>,

    /// Movie quality, 1-100
    pub quality: Option<u32>,
}

impl RenderConfig {
    /// Validate render values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some([w, h]) = self.resolution {
            if w == 0 || h == 0 {
                return Err(ConfigError::InvalidValue(
                    "render resolution cannot be zero".to_string(),
                ));
            }
        }
        if self.frame_rate == Some(0) {
            return Err(ConfigError::InvalidValue(
                "render frame_rate cannot be zero".to_string(),
            ));
        }
        if let Some(quality) = self.quality {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::InvalidValue(format!(
                    "render quality {} must be between 1 and 100",
                    quality
                )));
            }
        }
        Ok(())
    }
}

fn validate_prefix(prefix: Option<&str>) -> Result<(), ConfigError> {
    if let Some(prefix) = prefix {
        if prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue(format!(
                "metadata_tag_prefix '{}' cannot contain whitespace",
                prefix
            )));
        }
    }
    Ok(())
}

/// Built-in template keys.
pub fn default_template_keys() -> BTreeMap<String, TemplateKey> {
    let int = |width: &str| TemplateKey {
        kind: KeyKind::Int,
        format_spec: Some(width.to_string()),
        default: None,
    };

    let mut keys = BTreeMap::new();
    keys.insert("version".to_string(), int("03"));
    keys.insert("YYYY".to_string(), int("04"));
    keys.insert("MM".to_string(), int("02"));
    keys.insert("DD".to_string(), int("02"));
    keys
}

/// Built-in template paths.
///
/// Publish templates are file system paths relative to the project root;
/// loader templates are Content Browser paths.
pub fn default_template_paths() -> BTreeMap<String, String> {
    [
        (
            "unreal_movie_publish",
            "sequences[/{Sequence}][/{Shot}]/editorial/{YYYY}_{MM}_{DD}/{level_sequence}_v{version}.{ue_mov_ext}",
        ),
        ("unreal_asset_publish", "assets/fbx/{YYYY}_{MM}_{DD}/{name}.fbx"),
        ("unreal_asset_template", "/Game/Assets/{sg_asset_type}/"),
        ("unreal_asset_notype", "/Game/Assets/"),
        (
            "unreal_asset_1_category",
            "/Game/Assets/{sg_asset_type}/{sg_category_1}/",
        ),
        (
            "unreal_asset_2_categories",
            "/Game/Assets/{sg_asset_type}/{sg_category_1}/{sg_category_2}/",
        ),
        (
            "unreal_asset_3_categories",
            "/Game/Assets/{sg_asset_type}/{sg_category_1}/{sg_category_2}/{sg_category_3}/",
        ),
        ("unreal_published_file", "/Game/Published/"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        for (name, definition) in default_template_paths() {
            assert!(Template::parse(&name, &definition).is_ok(), "{name}");
        }
        for (name, key) in default_template_keys() {
            assert!(key.validate(&name).is_ok(), "{name}");
        }
    }

    #[test]
    fn global_rejects_bad_url() {
        let config = GlobalConfig {
            site_url: Some("studio.example.com".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn global_rejects_incomplete_favourite() {
        let config = GlobalConfig {
            menu_favourites: Some(vec![MenuFavourite {
                app_instance: "tk-multi-publish2".into(),
                name: String::new(),
            }]),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn render_bounds() {
        let ok = RenderConfig {
            resolution: Some([1920, 1080]),
            frame_rate: Some(30),
            quality: Some(100),
        };
        assert!(ok.validate().is_ok());

        let zero = RenderConfig {
            resolution: Some([0, 1080]),
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let quality = RenderConfig {
            quality: Some(101),
            ..Default::default()
        };
        assert!(quality.validate().is_err());
    }

    #[test]
    fn project_rejects_bad_template() {
        let mut paths = BTreeMap::new();
        paths.insert("broken".to_string(), "{name".to_string());
        let config = ProjectConfig {
            templates: Some(TemplatesConfig {
                keys: BTreeMap::new(),
                paths,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn project_parses_from_toml() {
        let config: ProjectConfig = toml::from_str(
            r#"
            [templates.keys.version]
            type = "int"
            format_spec = "04"

            [templates.paths]
            movie = "{name}_v{version}.mov"

            [publish]
            movie_template = "movie"

            [render]
            resolution = [1920, 1080]
            "#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.render.unwrap().resolution, Some([1920, 1080]));
    }
}
