//! publish::movie
//!
//! Publishes level sequences as movies.
//!
//! Validation resolves the template fields and the publish path without
//! touching the scene. Publishing computes the render, records the new
//! version on the asset and builds the review version record.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::item::PublishItem;
use super::render::{
    manifest_path, movie_queue_invocation, sequencer_invocation, MovieQueueJob, Platform,
    RenderInvocation, RenderRequest, RenderSettings, Renderer,
};
use super::version::{next_version, record_version, VERSION_NUMBER_KEY};
use super::{PublishError, PublishedFileData};
use crate::core::config::Config;
use crate::core::template::{FieldValue, Fields, Template, TemplateError, TemplateSet};
use crate::host::{EntityRef, SceneSnapshot};

/// Published file type of rendered movies.
pub const MOVIE_PUBLISH_TYPE: &str = "Unreal Render";

/// Everything needed to publish one movie.
#[derive(Debug, Clone, Serialize)]
pub struct MoviePlan {
    pub item_name: String,
    pub asset_path: String,
    pub map_path: String,
    pub publish_path: PathBuf,
    pub publish_type: String,
    pub version_number: u32,
    pub renderer: Renderer,
    /// Render preset asset path, Movie Render Queue only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presets: Option<String>,
    /// Problems found in the presets
    pub preset_warnings: Vec<String>,
    pub fields: Fields,
}

impl MoviePlan {
    /// Movie file name without extension.
    pub fn movie_name(&self) -> String {
        self.publish_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Review version record created alongside the publish.
#[derive(Debug, Clone, Serialize)]
pub struct VersionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<EntityRef>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
    pub sg_path_to_movie: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sg_task: Option<EntityRef>,
    pub published_files: Vec<PublishedFileData>,
}

/// Result of a movie publish.
#[derive(Debug, Clone, Serialize)]
pub struct MoviePublishResult {
    pub render: RenderInvocation,
    /// Queue job written to the manifest, Movie Render Queue only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<MovieQueueJob>,
    pub published_file: PublishedFileData,
    pub version: VersionData,
}

/// The movie publish plugin.
pub struct MoviePublisher<'a> {
    config: &'a Config,
    templates: &'a TemplateSet,
    platform: Platform,
    today: NaiveDate,
}

impl<'a> MoviePublisher<'a> {
    pub fn new(config: &'a Config, templates: &'a TemplateSet, platform: Platform, today: NaiveDate) -> Self {
        Self {
            config,
            templates,
            platform,
            today,
        }
    }

    /// The publish template, if this plugin can run at all.
    pub fn accept(&self) -> Result<&'a Template, PublishError> {
        let name = self.config.movie_template();
        self.templates
            .get(name)
            .ok_or_else(|| PublishError::NotAccepted(name.to_string()))
    }

    /// Check an item can be published and plan the publish.
    pub fn validate(&self, scene: &SceneSnapshot, item: &PublishItem) -> Result<MoviePlan, PublishError> {
        let template = self.accept()?;

        if item.asset_path.is_empty() || item.asset_name.is_empty() {
            tracing::debug!("sequence path or name not configured");
            return Err(PublishError::UnknownAsset(item.name.clone()));
        }
        if !item.is_level_sequence() {
            return Err(PublishError::NotALevelSequence(item.name.clone()));
        }
        if scene.asset(&item.asset_path).is_none() {
            return Err(PublishError::UnknownAsset(item.asset_path.clone()));
        }

        let world = scene.world.as_ref().ok_or(PublishError::NoWorld)?;
        if world.is_transient() {
            tracing::debug!("current map must be saved first");
            return Err(PublishError::TransientWorld(world.path.clone()));
        }

        let mut fields = scene.context.fields.clone();
        fields.insert("world".into(), world.name.as_str().into());
        fields.insert("level_sequence".into(), item.asset_name.as_str().into());

        if let Some(path) = item.edits_path() {
            fields
                .entry("Sequence".into())
                .or_insert_with(|| path.root().name().into());
            if path.len() > 1 {
                fields
                    .entry("Shot".into())
                    .or_insert_with(|| path.leaf().name().into());
            }
        }

        let tag = self.config.metadata_tag(VERSION_NUMBER_KEY);
        let version_number = next_version(scene, &item.asset_path, &tag);
        fields.insert("version".into(), version_number.into());

        fields.insert("YYYY".into(), FieldValue::Int(i64::from(self.today.year())));
        fields.insert("MM".into(), FieldValue::Int(i64::from(self.today.month())));
        fields.insert("DD".into(), FieldValue::Int(i64::from(self.today.day())));

        let renderer = Renderer::choose(&scene.capabilities);
        let mut presets = None;
        let mut preset_warnings = Vec::new();
        if renderer == Renderer::MovieRenderQueue {
            if let Some(preset_path) = self.config.render_presets() {
                tracing::info!("validating render presets path {}", preset_path);
                let preset = scene
                    .render_preset(preset_path)
                    .ok_or_else(|| PublishError::UnknownRenderPreset(preset_path.to_string()))?;
                for (_, reason) in super::render::check_render_settings(&preset.settings) {
                    tracing::warn!("{}", reason);
                    preset_warnings.push(reason);
                }
                presets = Some(preset.path.clone());
            }
        }
        fields.insert(
            "ue_mov_ext".into(),
            renderer.movie_extension(self.platform).into(),
        );

        let missing = template.missing_keys(&fields, self.templates.keys());
        if !missing.is_empty() {
            let err = TemplateError::MissingKeys {
                template: template.name().to_string(),
                keys: missing,
            };
            tracing::error!("{}", err);
            return Err(err.into());
        }

        let rendered = template.apply_fields(&fields, self.templates.keys())?;
        let publish_path = scene.context.resolve_path(&rendered, &scene.project.directory);

        Ok(MoviePlan {
            item_name: item.name.clone(),
            asset_path: item.asset_path.clone(),
            map_path: world.path.clone(),
            publish_path,
            publish_type: MOVIE_PUBLISH_TYPE.to_string(),
            version_number,
            renderer,
            presets,
            preset_warnings,
            fields,
        })
    }

    /// Publish a validated plan.
    ///
    /// Records the new version on the asset in `scene`.
    pub fn publish(
        &self,
        scene: &mut SceneSnapshot,
        plan: &MoviePlan,
        description: Option<&str>,
    ) -> Result<MoviePublishResult, PublishError> {
        let movie_name = plan.movie_name();
        if movie_name.is_empty() {
            return Err(PublishError::InvalidPublishPath(plan.publish_path.clone()));
        }

        let request = RenderRequest {
            project: &scene.project,
            map_path: &plan.map_path,
            sequence_path: &plan.asset_path,
            output_path: &plan.publish_path,
            settings: RenderSettings {
                resolution: self.config.render_resolution(),
                frame_rate: self.config.render_frame_rate(),
                quality: self.config.render_quality(),
            },
        };

        let (render, job) = match plan.renderer {
            Renderer::MovieRenderQueue => {
                let preset = plan
                    .presets
                    .as_deref()
                    .and_then(|path| scene.render_preset(path))
                    .map(|p| (p.path.as_str(), p.settings.as_slice()));
                match preset {
                    Some((name, _)) => tracing::info!(
                        "rendering {} with the Movie Render Queue with {} presets",
                        plan.publish_path.display(),
                        name
                    ),
                    None => tracing::info!(
                        "rendering {} with the Movie Render Queue",
                        plan.publish_path.display()
                    ),
                }
                let job = MovieQueueJob::new(&request, preset);
                let manifest = manifest_path(&scene.project, &movie_name);
                (movie_queue_invocation(&request, &manifest), Some(job))
            }
            Renderer::LevelSequencer => {
                tracing::info!(
                    "rendering {} with the Level Sequencer",
                    plan.publish_path.display()
                );
                (sequencer_invocation(&request), None)
            }
        };

        let tag = self.config.metadata_tag(VERSION_NUMBER_KEY);
        record_version(scene, &plan.asset_path, &tag, plan.version_number)?;

        let context = &scene.context;
        let published_file = PublishedFileData {
            code: plan
                .publish_path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: plan.publish_path.clone(),
            published_file_type: plan.publish_type.clone(),
            version_number: Some(plan.version_number),
            project: context.project.clone(),
            entity: context.entity.clone(),
            task: context.task.clone(),
            description: description.map(str::to_string),
        };

        let version = VersionData {
            project: context.project.clone(),
            code: movie_name,
            description: description.map(str::to_string),
            entity: context.entity.clone().or_else(|| context.project.clone()),
            sg_path_to_movie: plan.publish_path.clone(),
            sg_task: context.task.clone(),
            published_files: vec![published_file.clone()],
        };
        tracing::debug!("populated version data for {}", version.code);

        Ok(MoviePublishResult {
            render,
            job,
            published_file,
            version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::schema::PublishConfig;
    use crate::core::config::{GlobalConfig, ProjectConfig};
    use crate::core::edits::{SectionRecord, SequenceRecord, TrackKind, TrackRecord};
    use crate::host::{
        AssetRecord, HostCapabilities, HostProject, PipelineContext, RenderPreset, RenderSetting,
        RenderSettingKind, World,
    };
    use crate::publish::collector::collect;
    use std::collections::BTreeMap;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn scene() -> SceneSnapshot {
        let mut metadata = BTreeMap::new();
        metadata.insert("SG.version_number".to_string(), "3".to_string());
        SceneSnapshot {
            project: HostProject {
                name: "Demo".into(),
                directory: PathBuf::from("/projects/Demo"),
                executable: PathBuf::from("/ue/UnrealEditor"),
            },
            world: Some(World {
                name: "Main".into(),
                path: "/Game/Maps/Main".into(),
            }),
            context: PipelineContext {
                storage_root: Some(PathBuf::from("/prod")),
                project: Some(EntityRef {
                    entity_type: "Project".into(),
                    id: 1,
                    name: Some("Demo".into()),
                }),
                ..Default::default()
            },
            sequences: vec![SequenceRecord {
                path: "/Game/SEQ.SEQ".into(),
                tracks: vec![TrackRecord {
                    name: "Shots".into(),
                    kind: TrackKind::CinematicShot,
                    sections: vec![SectionRecord {
                        name: Some("sh010".into()),
                        sequence: Some("/Game/SH010.SH010".into()),
                    }],
                }],
            }],
            assets: vec![AssetRecord {
                path: "/Game/SH010.SH010".into(),
                class: "LevelSequence".into(),
                metadata,
            }],
            selected_assets: vec!["/Game/SH010.SH010".into()],
            ..Default::default()
        }
    }

    fn first_item(scene: &SceneSnapshot) -> PublishItem {
        collect(scene).items.remove(0)
    }

    #[test]
    fn plan_uses_edit_path_fields() {
        let config = Config::default();
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let scene = scene();

        let plan = publisher.validate(&scene, &first_item(&scene)).unwrap();
        assert_eq!(plan.version_number, 4);
        assert_eq!(plan.renderer, Renderer::LevelSequencer);
        assert_eq!(
            plan.publish_path,
            PathBuf::from("/prod/sequences/SEQ/SH010/editorial/2024_03_09/SH010_v004.mov")
        );
        assert_eq!(plan.publish_type, "Unreal Render");
    }

    #[test]
    fn context_fields_win_over_edit_path() {
        let config = Config::default();
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Windows, date());
        let mut scene = scene();
        scene.context.fields.insert("Shot".into(), "sh010_ctx".into());

        let plan = publisher.validate(&scene, &first_item(&scene)).unwrap();
        assert_eq!(
            plan.publish_path,
            PathBuf::from("/prod/sequences/SEQ/sh010_ctx/editorial/2024_03_09/SH010_v004.avi")
        );
    }

    #[test]
    fn transient_world_rejected() {
        let config = Config::default();
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let mut scene = scene();
        scene.world = Some(World {
            name: "Untitled".into(),
            path: "/Temp/Untitled_1".into(),
        });

        let result = publisher.validate(&scene, &first_item(&scene));
        assert!(matches!(result, Err(PublishError::TransientWorld(_))));
    }

    #[test]
    fn asset_item_rejected() {
        let config = Config::default();
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let scene = scene();
        let item = PublishItem::asset(&scene.assets[0].clone());

        let result = publisher.validate(&scene, &item);
        assert!(matches!(result, Err(PublishError::NotALevelSequence(_))));
    }

    #[test]
    fn missing_template_not_accepted() {
        let config = Config::new(
            GlobalConfig::default(),
            Some(ProjectConfig {
                publish: Some(PublishConfig {
                    movie_template: Some("nope".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        );
        let templates = Config::default().templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        assert!(matches!(publisher.accept(), Err(PublishError::NotAccepted(_))));
    }

    #[test]
    fn missing_keys_reported() {
        let config = Config::default();
        let mut paths = BTreeMap::new();
        paths.insert(
            "unreal_movie_publish".to_string(),
            "{Step}/{level_sequence}.{ue_mov_ext}".to_string(),
        );
        let templates = TemplateSet::new(config.templates().unwrap().keys().clone(), &paths).unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let scene = scene();

        let err = publisher.validate(&scene, &first_item(&scene)).unwrap_err();
        match err {
            PublishError::Template(TemplateError::MissingKeys { keys, .. }) => {
                assert_eq!(keys, vec!["Step".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn publish_with_sequencer_bumps_version() {
        let config = Config::default();
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let mut scene = scene();
        let plan = publisher.validate(&scene, &first_item(&scene)).unwrap();

        let result = publisher.publish(&mut scene, &plan, Some("first pass")).unwrap();
        assert!(result.job.is_none());
        assert!(result.render.args.contains(&"-MovieName=SH010_v004".to_string()));
        assert_eq!(scene.metadata_tag("/Game/SH010.SH010", "SG.version_number"), Some("4"));

        assert_eq!(result.version.code, "SH010_v004");
        assert_eq!(result.version.entity.as_ref().unwrap().entity_type, "Project");
        assert_eq!(result.version.published_files.len(), 1);
        assert_eq!(result.published_file.version_number, Some(4));
        assert_eq!(result.version.description.as_deref(), Some("first pass"));
    }

    #[test]
    fn publish_with_movie_queue_and_presets() {
        let config = Config::new(
            GlobalConfig::default(),
            Some(ProjectConfig {
                publish: Some(PublishConfig {
                    render_presets: Some("/Game/Presets/Review".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        );
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Windows, date());
        let mut scene = scene();
        scene.capabilities = HostCapabilities {
            movie_render_queue: true,
            prores_output: true,
        };
        scene.render_presets = vec![RenderPreset {
            path: "/Game/Presets/Review".into(),
            settings: vec![RenderSetting {
                name: "ImageSequenceOutput_PNG".into(),
                kind: RenderSettingKind::Output,
            }],
        }];

        let plan = publisher.validate(&scene, &first_item(&scene)).unwrap();
        assert_eq!(plan.renderer, Renderer::MovieRenderQueue);
        assert_eq!(plan.publish_path.extension().unwrap(), "mov");
        assert_eq!(plan.preset_warnings.len(), 1);

        let result = publisher.publish(&mut scene, &plan, None).unwrap();
        let job = result.job.unwrap();
        assert_eq!(job.removed_settings.len(), 1);
        assert!(result
            .render
            .args
            .iter()
            .any(|a| a.starts_with("-MoviePipelineConfig=\"MovieRenderPipeline")));
    }

    #[test]
    fn unknown_presets_rejected() {
        let config = Config::new(
            GlobalConfig::default(),
            Some(ProjectConfig {
                publish: Some(PublishConfig {
                    render_presets: Some("/Game/Presets/Missing".into()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        );
        let templates = config.templates().unwrap();
        let publisher = MoviePublisher::new(&config, &templates, Platform::Linux, date());
        let mut scene = scene();
        scene.capabilities = HostCapabilities {
            movie_render_queue: true,
            prores_output: true,
        };

        let result = publisher.validate(&scene, &first_item(&scene));
        assert!(matches!(result, Err(PublishError::UnknownRenderPreset(_))));
    }
}
