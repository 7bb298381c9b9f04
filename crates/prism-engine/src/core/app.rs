use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::device::Gpu;

use super::ctx::{FrameCtx, SetupCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Lifecycle implemented by every step program.
///
/// The runtime calls `on_init` once the window and GPU exist, then
/// `on_frame` per redraw, `on_resize` after the surface is reconfigured, and
/// `on_exit` once before GPU objects are released.
pub trait App {
    /// Creates pipelines and uploads static data. An error aborts the run.
    fn on_init(&mut self, ctx: &mut SetupCtx<'_, '_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called after the surface was reconfigured to `size` (never zero).
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>) {
        let _ = (gpu, size);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before teardown.
    fn on_exit(&mut self) {}
}
