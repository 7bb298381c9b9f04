//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (windowed or headless)
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - the small set of buffer/texture helpers every step needs

mod depth;
mod error;
mod frame;
mod gpu;
mod headless;
mod init;
mod inspect;
mod readback;
mod scope;
mod surface;

pub use depth::DepthBuffer;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use headless::HeadlessGpu;
pub use init::GpuInit;
pub use inspect::AdapterReport;
pub use readback::{copy_roundtrip, read_buffer_blocking};
pub use scope::validated;
