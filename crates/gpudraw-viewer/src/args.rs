//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use gpudraw_engine::assets::AssetPaths;
use gpudraw_engine::device::GpuInit;
use gpudraw_engine::render::RenderSettings;
use gpudraw_engine::scene::CameraConfig;
use gpudraw_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Present mode choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PresentModeArg {
    /// Vsync; one frame per display refresh.
    #[default]
    Fifo,
    /// Vsync without blocking when frames are ready early.
    Mailbox,
    /// No vsync.
    Immediate,
}

impl From<PresentModeArg> for wgpu::PresentMode {
    fn from(mode: PresentModeArg) -> Self {
        match mode {
            PresentModeArg::Fifo => Self::Fifo,
            PresentModeArg::Mailbox => Self::Mailbox,
            PresentModeArg::Immediate => Self::Immediate,
        }
    }
}

/// Spin a mesh with a single draw call per frame.
#[derive(Parser, Debug, Clone)]
#[command(name = "gpudraw", version)]
pub struct Args {
    /// Mesh to load, resolved as `<ASSETS>/meshes/<MESH>.obj`.
    #[arg(short, long, default_value = "torus")]
    pub mesh: String,

    /// Asset root directory.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Vertex shader, relative to the asset root (SPIR-V or WGSL).
    #[arg(long, default_value = "shaders/basic/basic.vert.wgsl")]
    pub vertex_shader: PathBuf,

    /// Fragment shader, relative to the asset root (SPIR-V or WGSL).
    #[arg(long, default_value = "shaders/basic/basic.frag.wgsl")]
    pub fragment_shader: PathBuf,

    /// Rotation per frame about each axis, in radians.
    #[arg(long, default_value_t = 0.01)]
    pub step: f32,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = 40.0)]
    pub fov: f32,

    #[arg(long, value_enum, default_value_t = PresentModeArg::Fifo)]
    pub present_mode: PresentModeArg,

    /// Initial window width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    pub width: f64,

    /// Initial window height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    pub height: f64,

    /// Log filter in `env_logger` syntax; overrides RUST_LOG.
    #[arg(long)]
    pub log: Option<String>,
}

impl Args {
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            mesh: PathBuf::new(),
            vertex_shader: self.vertex_shader.clone(),
            fragment_shader: self.fragment_shader.clone(),
        }
        .with_mesh_name(&self.mesh)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            camera: CameraConfig {
                fov_y_degrees: self.fov,
                ..CameraConfig::default()
            },
            rotation_step: self.step,
            ..RenderSettings::default()
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            present_mode: self.present_mode.into(),
            ..GpuInit::default()
        }
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: format!("gpudraw - {}", self.mesh),
            initial_size: LogicalSize::new(self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_setup() {
        let args = Args::parse_from(["gpudraw"]);
        assert_eq!(args.mesh, "torus");
        assert_eq!(args.step, 0.01);

        let paths = args.asset_paths();
        assert_eq!(paths, AssetPaths::default());

        let settings = args.render_settings();
        assert_eq!(settings.camera, CameraConfig::default());
        assert_eq!(args.gpu_init().present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn mesh_flag_selects_obj() {
        let args = Args::parse_from(["gpudraw", "--mesh", "cube", "--step", "0.05"]);
        assert_eq!(
            args.asset_paths().mesh,
            std::path::Path::new("meshes").join("cube.obj")
        );
        assert_eq!(args.render_settings().rotation_step, 0.05);
        assert_eq!(args.runtime_config().title, "gpudraw - cube");
    }

    #[test]
    fn present_mode_is_parsed() {
        let args = Args::parse_from(["gpudraw", "--present-mode", "immediate"]);
        assert_eq!(
            wgpu::PresentMode::from(args.present_mode),
            wgpu::PresentMode::Immediate
        );
    }
}
