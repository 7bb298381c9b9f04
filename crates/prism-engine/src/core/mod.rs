//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the step programs: the app lifecycle and the per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
