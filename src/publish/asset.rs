//! publish::asset
//!
//! Publishes assets as FBX exports.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::item::PublishItem;
use super::{PublishError, PublishedFileData};
use crate::core::config::Config;
use crate::core::template::{FieldValue, Fields, Template, TemplateSet};
use crate::host::SceneSnapshot;

/// Published file type of exported assets.
pub const FBX_PUBLISH_TYPE: &str = "Unreal FBX";

/// Export task handed to the host's FBX exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FbxExportTask {
    /// Asset to export
    pub object: String,
    /// File to write
    pub filename: PathBuf,
    /// Skip the export options dialog
    pub automated: bool,
    /// Overwrite the output
    pub replace_identical: bool,
}

/// Everything needed to publish one asset.
#[derive(Debug, Clone, Serialize)]
pub struct AssetPlan {
    pub item_name: String,
    pub asset_path: String,
    pub asset_name: String,
    pub publish_path: PathBuf,
    /// Folder the export is written to
    pub destination_path: PathBuf,
    pub publish_type: String,
    pub export: FbxExportTask,
}

/// The FBX asset publish plugin.
pub struct AssetPublisher<'a> {
    config: &'a Config,
    templates: &'a TemplateSet,
    today: NaiveDate,
}

impl<'a> AssetPublisher<'a> {
    pub fn new(config: &'a Config, templates: &'a TemplateSet, today: NaiveDate) -> Self {
        Self {
            config,
            templates,
            today,
        }
    }

    /// The publish template, if this plugin can run at all.
    pub fn accept(&self) -> Result<&'a Template, PublishError> {
        let name = self.config.asset_template();
        self.templates
            .get(name)
            .ok_or_else(|| PublishError::NotAccepted(name.to_string()))
    }

    /// Check an item can be exported and plan the export.
    pub fn validate(&self, scene: &SceneSnapshot, item: &PublishItem) -> Result<AssetPlan, PublishError> {
        let template = self.accept()?;

        if item.asset_path.is_empty() || item.asset_name.is_empty() {
            tracing::debug!("asset path or name not configured");
            return Err(PublishError::UnknownAsset(item.name.clone()));
        }
        if scene.asset(&item.asset_path).is_none() {
            return Err(PublishError::UnknownAsset(item.asset_path.clone()));
        }

        let mut fields = Fields::new();
        fields.insert("name".into(), item.asset_name.as_str().into());
        fields.insert("YYYY".into(), FieldValue::Int(i64::from(self.today.year())));
        fields.insert("MM".into(), FieldValue::Int(i64::from(self.today.month())));
        fields.insert("DD".into(), FieldValue::Int(i64::from(self.today.day())));

        let rendered = template.apply_fields(&fields, self.templates.keys())?;
        let publish_path = scene.context.resolve_path(&rendered, &scene.project.directory);
        let destination_path = publish_path
            .parent()
            .map(PathBuf::from)
            .ok_or_else(|| PublishError::InvalidPublishPath(publish_path.clone()))?;

        let export = FbxExportTask {
            object: item.asset_path.clone(),
            filename: destination_path.join(format!("{}.fbx", item.asset_name)),
            automated: true,
            replace_identical: true,
        };

        Ok(AssetPlan {
            item_name: item.name.clone(),
            asset_path: item.asset_path.clone(),
            asset_name: item.asset_name.clone(),
            publish_path,
            destination_path,
            publish_type: FBX_PUBLISH_TYPE.to_string(),
            export,
        })
    }

    /// Published file record for a validated plan.
    pub fn publish(&self, scene: &SceneSnapshot, plan: &AssetPlan, description: Option<&str>) -> PublishedFileData {
        tracing::info!(
            "exporting {} to {}",
            plan.asset_path,
            plan.export.filename.display()
        );
        let context = &scene.context;
        PublishedFileData {
            code: plan
                .publish_path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: plan.publish_path.clone(),
            published_file_type: plan.publish_type.clone(),
            version_number: None,
            project: context.project.clone(),
            entity: context.entity.clone(),
            task: context.task.clone(),
            description: description.map(str::to_string),
        }
    }
}
