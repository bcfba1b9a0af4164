use anyhow::{Context, Result};
use glam::Vec3;
use winit::dpi::PhysicalSize;

use crate::assets::{AssetPaths, AssetSource, LoadedAssets, ShaderBinary, ShaderStage, load_assets};
use crate::device::{Gpu, GpuFrame};
use crate::scene::{CameraConfig, TransformSet};

use super::{DepthTarget, GpuMesh, MeshPipeline, PipelineShaders, UniformPair};

/// Per-session render configuration.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub camera: CameraConfig,
    /// Radians added about each of X, Y and Z every frame. Not scaled by frame
    /// time, so rotation speed follows the display refresh rate.
    pub rotation_step: f32,
    pub clear_color: wgpu::Color,
    pub vertex_entry: String,
    pub fragment_entry: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            rotation_step: 0.01,
            clear_color: wgpu::Color::BLACK,
            vertex_entry: "main".to_string(),
            fragment_entry: "main".to_string(),
        }
    }
}

/// Everything needed to draw the mesh: built once, then driven per frame.
pub struct Renderer {
    pipeline: MeshPipeline,
    bind_group: wgpu::BindGroup,
    mesh: GpuMesh,
    uniforms: UniformPair,
    depth: DepthTarget,
    transforms: TransformSet,
    rotation_step: Vec3,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Loads assets from `source` and builds the renderer for `gpu`.
    ///
    /// Nothing GPU-side is created unless every asset loaded.
    pub fn initialize<S>(
        gpu: &Gpu<'_>,
        source: &S,
        paths: &AssetPaths,
        settings: &RenderSettings,
    ) -> Result<Self>
    where
        S: AssetSource + ?Sized,
    {
        let assets = load_assets(source, paths).context("failed to load assets")?;
        Self::new(gpu.device(), gpu.surface_format(), gpu.size(), assets, settings)
    }

    /// Builds all GPU resources from decoded assets.
    ///
    /// The projection's aspect ratio is taken from `size` here and stays fixed
    /// for the lifetime of the renderer.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        assets: LoadedAssets,
        settings: &RenderSettings,
    ) -> Result<Self> {
        let vertex = create_shader_module(
            device,
            &assets.vertex_shader,
            ShaderStage::Vertex,
            &settings.vertex_entry,
        )?;
        let fragment = create_shader_module(
            device,
            &assets.fragment_shader,
            ShaderStage::Fragment,
            &settings.fragment_entry,
        )?;

        let transforms = TransformSet::new(
            settings.camera.view(),
            settings.camera.projection(size.width, size.height),
        );

        let pipeline = MeshPipeline::new(
            device,
            surface_format,
            PipelineShaders {
                vertex: &vertex,
                vertex_entry: &settings.vertex_entry,
                fragment: &fragment,
                fragment_entry: &settings.fragment_entry,
            },
        );
        let uniforms = UniformPair::new(device, &transforms.uniform());
        let bind_group = pipeline.bind_transforms(device, uniforms.uniform_buffer());
        let mesh = GpuMesh::upload(device, &assets.mesh);
        let depth = DepthTarget::new(device, size);

        log::info!(
            "renderer ready: {} vertices, aspect {:.3}",
            mesh.vertex_count(),
            CameraConfig::aspect(size.width, size.height)
        );

        Ok(Self {
            pipeline,
            bind_group,
            mesh,
            uniforms,
            depth,
            transforms,
            rotation_step: Vec3::splat(settings.rotation_step),
            clear_color: settings.clear_color,
        })
    }

    pub fn transforms(&self) -> &TransformSet {
        &self.transforms
    }

    pub fn uniforms(&self) -> &UniformPair {
        &self.uniforms
    }

    /// Follows a surface resize. Only the depth target changes; the projection
    /// keeps the aspect ratio it was created with.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.depth.resize(device, size);
    }

    /// Advances the rotation and records this frame's upload and draw.
    pub fn encode(&mut self, frame: &mut GpuFrame) {
        self.transforms.rotate(self.rotation_step);
        self.uniforms
            .stage(&self.transforms.uniform(), &mut frame.encoder);

        let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gpudraw mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(self.pipeline.pipeline());
        rpass.set_vertex_buffer(0, self.mesh.buffer().slice(..));
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.draw(0..self.mesh.vertex_count(), 0..1);
    }

    /// Must run after the frame's commands were submitted.
    pub fn after_submit(&self) {
        self.uniforms.request_remap();
    }
}

fn create_shader_module(
    device: &wgpu::Device,
    binary: &ShaderBinary,
    stage: ShaderStage,
    entry_point: &str,
) -> Result<wgpu::ShaderModule> {
    binary
        .validate(stage, entry_point)
        .with_context(|| format!("{} shader failed to compile", stage.name()))?;

    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.name()),
        source: binary.source(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::DirSource;

    /// A device on the software fallback adapter, if this machine has one.
    fn fallback_device() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::None,
            compatible_surface: None,
            force_fallback_adapter: true,
        }))
        .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("gpudraw test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .ok()
    }

    fn shipped_assets() -> LoadedAssets {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        load_assets(&DirSource::new(root), &AssetPaths::default()).unwrap()
    }

    #[test]
    fn resize_keeps_projection_from_initial_size() {
        let Some((device, _queue)) = fallback_device() else {
            eprintln!("no fallback adapter available; skipping");
            return;
        };

        let settings = RenderSettings::default();
        let mut renderer = Renderer::new(
            &device,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            PhysicalSize::new(640, 480),
            shipped_assets(),
            &settings,
        )
        .unwrap();

        let expected = CameraConfig::default().projection(640, 480);
        assert_eq!(renderer.transforms().projection, expected);
        assert_eq!(renderer.transforms().view, CameraConfig::default().view());

        renderer.resize(&device, PhysicalSize::new(1920, 480));
        assert_eq!(renderer.transforms().projection, expected);
    }
}
