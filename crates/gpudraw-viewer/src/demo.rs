use anyhow::{Context, Result};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use gpudraw_engine::assets::{AssetPaths, DirSource};
use gpudraw_engine::core::{App, AppControl, FrameCtx};
use gpudraw_engine::device::Gpu;
use gpudraw_engine::render::{RenderSettings, Renderer};
use gpudraw_engine::window::RuntimeCtx;

/// How often the frame loop reports skipped uniform writes.
const REPORT_EVERY_FRAMES: u64 = 600;

/// Cycles through the meshes available to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSelector {
    names: Vec<String>,
    current: usize,
}

impl MeshSelector {
    /// `initial` is always selectable, even if it was not found on disk; the
    /// load will report the missing file.
    pub fn new(mut available: Vec<String>, initial: &str) -> Self {
        if !available.iter().any(|n| n == initial) {
            available.push(initial.to_string());
            available.sort();
        }
        let current = available.iter().position(|n| n == initial).unwrap_or(0);
        Self {
            names: available,
            current,
        }
    }

    pub fn current(&self) -> &str {
        &self.names[self.current]
    }

    pub fn advance(&mut self) -> &str {
        self.current = (self.current + 1) % self.names.len();
        self.current()
    }
}

/// The viewer session: one renderer, rebuilt from scratch on every reload.
pub struct Demo {
    source: DirSource,
    paths: AssetPaths,
    settings: RenderSettings,
    meshes: MeshSelector,
    renderer: Option<Renderer>,
}

impl Demo {
    pub fn new(
        source: DirSource,
        paths: AssetPaths,
        settings: RenderSettings,
        meshes: MeshSelector,
    ) -> Self {
        Self {
            source,
            paths,
            settings,
            meshes,
            renderer: None,
        }
    }
}

impl App for Demo {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        // No in-place swap: the old session is gone before the new one loads.
        self.renderer = None;

        let mesh = self.meshes.current();
        let paths = self.paths.clone().with_mesh_name(mesh);
        let renderer = Renderer::initialize(gpu, &self.source, &paths, &self.settings)
            .with_context(|| format!("can't start session for mesh `{mesh}`"))?;

        self.renderer = Some(renderer);
        Ok(())
    }

    fn on_resize(&mut self, gpu: &Gpu<'_>) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(gpu.device(), gpu.size());
        }
    }

    fn on_window_event(&mut self, event: &WindowEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        else {
            return AppControl::Continue;
        };

        match code {
            KeyCode::Escape => AppControl::Exit,
            KeyCode::Tab => {
                let next = self.meshes.advance();
                log::info!("switching to mesh `{next}`");
                runtime.reload();
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        // Resolve last frame's staging remap, if it has completed.
        ctx.gpu.poll();

        let control = ctx.render(|frame| renderer.encode(frame));
        renderer.after_submit();

        let frame_index = ctx.time.frame_index;
        if frame_index > 0 && frame_index % REPORT_EVERY_FRAMES == 0 {
            log::debug!(
                "frame {frame_index}: {} uniform writes skipped so far",
                renderer.uniforms().skipped_writes()
            );
        }

        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starts_on_initial_mesh() {
        let sel = MeshSelector::new(names(&["cube", "icosphere", "torus"]), "torus");
        assert_eq!(sel.current(), "torus");
    }

    #[test]
    fn advance_wraps_around() {
        let mut sel = MeshSelector::new(names(&["cube", "icosphere", "torus"]), "icosphere");
        assert_eq!(sel.advance(), "torus");
        assert_eq!(sel.advance(), "cube");
        assert_eq!(sel.advance(), "icosphere");
    }

    #[test]
    fn unknown_initial_is_kept() {
        let mut sel = MeshSelector::new(names(&["cube"]), "monkey");
        assert_eq!(sel.current(), "monkey");
        assert_eq!(sel.advance(), "cube");
    }

    #[test]
    fn empty_listing_still_has_initial() {
        let mut sel = MeshSelector::new(Vec::new(), "torus");
        assert_eq!(sel.advance(), "torus");
    }
}
