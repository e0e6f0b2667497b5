//! publish::render
//!
//! Movie render invocations.
//!
//! Renders run in a separate host process. This module computes the
//! program, arguments and environment for that process; it never spawns it.
//!
//! Two renderers exist:
//!
//! - **Movie Render Queue**: needs the queue subsystem and the ProRes output
//!   plugin. Renders `mov` on every platform from a queue manifest saved
//!   under the project's `Saved` folder.
//! - **Level Sequencer**: the fallback. Renders `avi` on Windows and `mov`
//!   elsewhere.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::host::{HostCapabilities, HostProject, RenderSetting, RenderSettingKind};

/// Environment variable that makes the host bootstrap the engine.
///
/// Removed from render processes so they start bare.
pub const BOOTSTRAP_ENV: &str = "UE_SHOTGUN_BOOTSTRAP";

const CAPTURE_TYPE: &str = "/Script/MovieSceneCapture.AutomatedLevelSequenceCapture";
const QUEUE_ENTRY_MAP: &str =
    "MoviePipelineEntryMap?game=/Script/MovieRenderPipelineCore.MoviePipelineGameMode";
const QUEUE_SESSION_NAME: &str = "Publish2 Movie Render";

const QUEUE_CVARS: &[&str] = &[
    "sg.ViewDistanceQuality=4",
    "sg.AntiAliasingQuality=4",
    "sg.ShadowQuality=4",
    "sg.PostProcessQuality=4",
    "sg.TextureQuality=4",
    "sg.EffectsQuality=4",
    "sg.FoliageQuality=4",
    "sg.ShadingQuality=4",
    "r.TextureStreaming=0",
    "r.ForceLOD=0",
    "r.SkeletalMeshLODBias=-10",
    "r.ParticleLODBias=-10",
    "foliage.DitheredLOD=0",
    "foliage.ForceLOD=0",
    "r.Shadow.DistanceScale=10",
    "r.ShadowQuality=5",
    "r.Shadow.RadiusThreshold=0.001000",
    "r.ViewDistanceScale=50",
    "r.D3D12.GPUTimeout=0",
    "a.URO.Enable=0",
];

/// Operating system the render runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Which renderer produces the movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Renderer {
    MovieRenderQueue,
    LevelSequencer,
}

impl Renderer {
    /// Pick the renderer the host supports.
    pub fn choose(capabilities: &HostCapabilities) -> Self {
        if !capabilities.movie_render_queue {
            tracing::info!("Movie Render Queue not available, Level Sequencer will be used for rendering");
            return Renderer::LevelSequencer;
        }
        if !capabilities.prores_output {
            tracing::info!(
                "Apple ProRes Media plugin must be loaded to render with the Movie Render Queue, \
                 Level Sequencer will be used for rendering"
            );
            return Renderer::LevelSequencer;
        }
        tracing::info!("Movie Render Queue will be used for rendering");
        Renderer::MovieRenderQueue
    }

    /// Movie file extension this renderer writes on `platform`.
    pub fn movie_extension(self, platform: Platform) -> &'static str {
        match (self, platform) {
            (Renderer::LevelSequencer, Platform::Windows) => "avi",
            _ => "mov",
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderer::MovieRenderQueue => write!(f, "Movie Render Queue"),
            Renderer::LevelSequencer => write!(f, "Level Sequencer"),
        }
    }
}

/// Output settings shared by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub resolution: (u32, u32),
    pub frame_rate: u32,
    pub quality: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: (1280, 720),
            frame_rate: 24,
            quality: 75,
        }
    }
}

/// What to render and where.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub project: &'a HostProject,
    /// Map the sequence plays in
    pub map_path: &'a str,
    /// Level sequence asset path
    pub sequence_path: &'a str,
    /// Full path of the movie file
    pub output_path: &'a Path,
    pub settings: RenderSettings,
}

impl RenderRequest<'_> {
    fn output_parts(&self) -> (PathBuf, String) {
        let folder = self
            .output_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let movie_name = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (folder, movie_name)
    }
}

/// A process to run for a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Variables removed from the inherited environment
    pub env_remove: Vec<String>,
}

impl RenderInvocation {
    /// The invocation as a single shell line, quoting arguments with spaces.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .map(|arg| {
                if arg.contains(' ') && !arg.contains('"') {
                    format!("\"{}\"", arg)
                } else {
                    arg
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render with the Level Sequencer.
pub fn sequencer_invocation(request: &RenderRequest<'_>) -> RenderInvocation {
    let (folder, movie_name) = request.output_parts();
    let (res_x, res_y) = request.settings.resolution;

    let args = vec![
        request.project.project_file().to_string_lossy().into_owned(),
        request.map_path.to_string(),
        format!("-LevelSequence={}", request.sequence_path),
        format!("-MovieFolder=\"{}\"", folder.display()),
        format!("-MovieName={}", movie_name),
        "-game".to_string(),
        format!("-MovieSceneCaptureType={}", CAPTURE_TYPE),
        format!("-ResX={}", res_x),
        format!("-ResY={}", res_y),
        "-ForceRes".to_string(),
        "-Windowed".to_string(),
        "-MovieCinematicMode=yes".to_string(),
        "-MovieFormat=Video".to_string(),
        format!("-MovieFrameRate={}", request.settings.frame_rate),
        format!("-MovieQuality={}", request.settings.quality),
        "-NoTextureStreaming".to_string(),
        "-NoLoadingScreen".to_string(),
        "-NoScreenMessages".to_string(),
    ];

    RenderInvocation {
        program: request.project.executable.clone(),
        args,
        env_remove: vec![BOOTSTRAP_ENV.to_string()],
    }
}

/// Render with the Movie Render Queue from a saved queue manifest.
pub fn movie_queue_invocation(request: &RenderRequest<'_>, manifest: &Path) -> RenderInvocation {
    let (res_x, res_y) = request.settings.resolution;
    let manifest = manifest_relative_path(&request.project.saved_dir(), manifest);

    let args = vec![
        request.project.project_file().to_string_lossy().into_owned(),
        QUEUE_ENTRY_MAP.to_string(),
        "-game".to_string(),
        "-Multiprocess".to_string(),
        "-NoLoadingScreen".to_string(),
        "-FixedSeed".to_string(),
        "-log".to_string(),
        "-Unattended".to_string(),
        "-messaging".to_string(),
        format!("-SessionName=\"{}\"", QUEUE_SESSION_NAME),
        "-nohmd".to_string(),
        "-windowed".to_string(),
        format!("-ResX={}", res_x),
        format!("-ResY={}", res_y),
        format!("-dpcvars={}", QUEUE_CVARS.join(",")),
        "-execcmds=r.HLOD 0".to_string(),
        format!("-MoviePipelineConfig=\"{}\"", manifest),
    ];

    RenderInvocation {
        program: request.project.executable.clone(),
        args,
        env_remove: vec![BOOTSTRAP_ENV.to_string()],
    }
}

/// Manifest path as the render process expects it: relative to `Saved`.
///
/// Paths outside `saved_dir` are kept as they are.
pub fn manifest_relative_path(saved_dir: &Path, manifest: &Path) -> String {
    manifest
        .strip_prefix(saved_dir)
        .unwrap_or(manifest)
        .to_string_lossy()
        .into_owned()
}

/// Where the queue manifest for a movie is saved.
pub fn manifest_path(project: &HostProject, movie_name: &str) -> PathBuf {
    project
        .saved_dir()
        .join("MovieRenderPipeline")
        .join(format!("QueueManifest_{}.utxt", movie_name))
}

/// Job submitted to the Movie Render Queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieQueueJob {
    pub sequence: String,
    pub map: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_origin: Option<String>,
    pub output_directory: PathBuf,
    pub output_resolution: (u32, u32),
    pub file_name_format: String,
    pub override_existing_output: bool,
    /// Preset settings dropped from the job, with the reason
    pub removed_settings: Vec<(String, String)>,
    /// Settings ensured on the job
    pub required_settings: Vec<RenderSettingKind>,
}

impl MovieQueueJob {
    /// Configure a queue job, dropping preset settings that would add outputs.
    pub fn new(request: &RenderRequest<'_>, preset: Option<(&str, &[RenderSetting])>) -> Self {
        let (folder, movie_name) = request.output_parts();

        let removed_settings = preset
            .map(|(_, settings)| check_render_settings(settings))
            .unwrap_or_default()
            .into_iter()
            .map(|(setting, reason)| {
                tracing::warn!("Disabling {}: {}", setting.name, reason);
                (setting.name.clone(), reason)
            })
            .collect();

        Self {
            sequence: request.sequence_path.to_string(),
            map: request.map_path.to_string(),
            preset_origin: preset.map(|(path, _)| path.to_string()),
            output_directory: folder,
            output_resolution: request.settings.resolution,
            file_name_format: movie_name,
            override_existing_output: true,
            removed_settings,
            required_settings: vec![RenderSettingKind::DeferredPass, RenderSettingKind::ProresOutput],
        }
    }
}

/// Preset settings that would make the render produce more than one output.
///
/// Only the deferred base pass and the ProRes output are kept.
pub fn check_render_settings(settings: &[RenderSetting]) -> Vec<(&RenderSetting, String)> {
    settings
        .iter()
        .filter_map(|setting| match setting.kind {
            RenderSettingKind::ImagePass => Some((
                setting,
                format!("Render pass {} would cause multiple outputs", setting.name),
            )),
            RenderSettingKind::Output => Some((
                setting,
                format!("Render output {} would cause multiple outputs", setting.name),
            )),
            _ => None,
        })
        .collect()
}
