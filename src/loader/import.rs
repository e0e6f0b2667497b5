//! loader::import
//!
//! FBX import tasks.

use std::path::PathBuf;

use serde::Serialize;

/// Mesh type the importer creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshType {
    StaticMesh,
    SkeletalMesh,
}

/// Import task handed to the host's asset tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FbxImportTask {
    pub filename: PathBuf,
    /// Content Browser folder
    pub destination_path: String,
    /// Asset name; the file stem when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_name: Option<String>,
    pub replace_existing: bool,
    pub automated: bool,
    pub save: bool,
    pub import_materials: bool,
    pub import_textures: bool,
    pub import_as_skeletal: bool,
    pub mesh_type: MeshType,
}

impl FbxImportTask {
    /// Non-interactive import replacing existing assets, with materials and
    /// textures.
    pub fn new(
        filename: PathBuf,
        destination_path: String,
        destination_name: Option<String>,
        as_skeletal: bool,
    ) -> Self {
        Self {
            filename,
            destination_path,
            destination_name,
            replace_existing: true,
            automated: true,
            save: true,
            import_materials: true,
            import_textures: true,
            import_as_skeletal: as_skeletal,
            mesh_type: if as_skeletal {
                MeshType::SkeletalMesh
            } else {
                MeshType::StaticMesh
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_by_default() {
        let task = FbxImportTask::new(PathBuf::from("/a/Chair.fbx"), "/Game/Published/".into(), None, false);
        assert_eq!(task.mesh_type, MeshType::StaticMesh);
        assert!(task.replace_existing && task.automated && task.save);
        assert!(task.import_materials && task.import_textures);
    }
}
