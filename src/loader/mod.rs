//! loader
//!
//! Actions offered for published files in the loader, and the import they
//! perform.
//!
//! The only action is `import_content`, which brings an FBX publish into the
//! Content Browser. The destination folder comes from a template chosen by
//! the template fields of the publish's context:
//!
//! | Fields                     | Template                      |
//! |----------------------------|-------------------------------|
//! | `sg_category_3` present    | `unreal_asset_3_categories`   |
//! | `sg_category_2` present    | `unreal_asset_2_categories`   |
//! | `sg_category_1` present    | `unreal_asset_1_category`     |
//! | no `sg_asset_type`         | `unreal_asset_notype`         |
//! | otherwise                  | `unreal_asset_template`       |
//! | no fields at all           | `unreal_published_file`       |

pub mod import;

pub use import::{FbxImportTask, MeshType};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::template::{Fields, TemplateError, TemplateSet};

/// Action importing a publish into the Content Browser.
pub const IMPORT_CONTENT: &str = "import_content";

/// Errors from loader operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("file not found on disk - '{0}'")]
    FileNotFound(PathBuf),

    #[error("unknown loader action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// A published file as the loader sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishRecord {
    /// Publish name, usually the file name
    pub code: String,
    /// File on disk
    pub path: PathBuf,
    pub published_file_type: Option<String>,
    /// Template fields of the publish's context
    pub fields: Fields,
    /// Import as a skeletal mesh
    pub skeletal: bool,
}

/// An action the loader can show for a publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInstance {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    pub caption: String,
    pub description: String,
}

/// Actions available for a publish, limited to the `requested` ones.
pub fn generate_actions(publish: &PublishRecord, requested: &[String]) -> Vec<ActionInstance> {
    tracing::debug!(
        "generate actions called for {}, actions: {:?}",
        publish.code,
        requested
    );

    let mut actions = Vec::new();
    if requested.iter().any(|a| a == IMPORT_CONTENT) {
        actions.push(ActionInstance {
            name: IMPORT_CONTENT.to_string(),
            params: None,
            caption: "Import into Content Browser".to_string(),
            description: "This will import the asset into the Unreal Editor Content Browser."
                .to_string(),
        });
    }
    actions
}

/// Name of the template giving the destination folder for `fields`.
pub fn destination_template(fields: &Fields) -> &'static str {
    if fields.is_empty() {
        "unreal_published_file"
    } else if fields.contains_key("sg_category_3") {
        "unreal_asset_3_categories"
    } else if fields.contains_key("sg_category_2") {
        "unreal_asset_2_categories"
    } else if fields.contains_key("sg_category_1") {
        "unreal_asset_1_category"
    } else if !fields.contains_key("sg_asset_type") {
        "unreal_asset_notype"
    } else {
        "unreal_asset_template"
    }
}

/// Content Browser folder and asset name for an import.
///
/// The name is only set when the fields carry `sg_asset_name`, or for
/// publishes without context fields, where it is the publish code minus its
/// extension.
pub fn destination(
    templates: &TemplateSet,
    publish: &PublishRecord,
) -> Result<(String, Option<String>), LoaderError> {
    let mut fields = publish.fields.clone();
    let template = destination_template(&fields);

    if fields.is_empty() {
        let name = Path::new(&publish.code)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| publish.code.clone());
        tracing::info!("published file name: {}", name);
        fields.insert("sg_asset_name".into(), name.into());
    }

    tracing::info!("selected destination template: {}", template);
    let path = templates.apply(template, &fields)?;
    tracing::debug!("destination path after applying fields: {}", path);

    let name = fields.get("sg_asset_name").map(|v| v.to_string());
    Ok((path, name))
}

/// Run a loader action on a publish.
///
/// Returns the import task the host should execute.
pub fn execute_action(
    templates: &TemplateSet,
    name: &str,
    publish: &PublishRecord,
) -> Result<FbxImportTask, LoaderError> {
    if name != IMPORT_CONTENT {
        return Err(LoaderError::UnknownAction(name.to_string()));
    }

    tracing::info!("file to import: {}", publish.path.display());
    if !publish.path.exists() {
        return Err(LoaderError::FileNotFound(publish.path.clone()));
    }

    let (destination_path, destination_name) = destination(templates, publish)?;
    Ok(FbxImportTask::new(
        publish.path.clone(),
        destination_path,
        destination_name,
        publish.skeletal,
    ))
}
