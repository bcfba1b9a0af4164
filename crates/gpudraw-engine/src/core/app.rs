use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Builds the session once the GPU exists, and rebuilds it from scratch
    /// after every [`RuntimeCtx::reload`]. An error ends the run.
    fn on_start(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called after the surface was reconfigured for a new size.
    fn on_resize(&mut self, gpu: &Gpu<'_>) {
        let _ = gpu;
    }

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, event: &WindowEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Called once per display refresh.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
