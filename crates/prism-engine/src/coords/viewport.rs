/// Size of the drawable in logical pixels; the basis overlay shaders use to
/// convert positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `[width, height]` clamped to at least one pixel, as uploaded to shaders.
    #[inline]
    pub fn as_uniform(self) -> [f32; 2] {
        [self.width.max(1.0), self.height.max(1.0)]
    }
}
