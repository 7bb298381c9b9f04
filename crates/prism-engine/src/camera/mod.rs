//! Mouse-driven orbit camera around the origin.

mod orbit;

pub use orbit::{CameraState, OrbitCamera, OrbitSettings};
