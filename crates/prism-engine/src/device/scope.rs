use anyhow::{anyhow, Result};

/// Runs `create` inside a validation error scope.
///
/// A validation error raised by the device while `create` runs comes back as
/// an error with `what` as its outermost context, instead of reaching the
/// uncaptured-error log callback.
pub fn validated<T>(device: &wgpu::Device, what: &str, create: impl FnOnce() -> T) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(err) => Err(anyhow!("{err}").context(format!("invalid {what}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;

    // Needs an adapter; returns early on machines without one.
    #[test]
    fn validation_error_becomes_err() {
        let Ok(gpu) = HeadlessGpu::new_blocking("scope test") else {
            return;
        };

        let result = validated(&gpu.device, "test buffer", || {
            gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: 16,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::MAP_WRITE,
                mapped_at_creation: false,
            })
        });
        let err = result.err().map(|e| format!("{e:#}")).unwrap_or_default();
        assert!(err.starts_with("invalid test buffer"), "{err}");
    }

    #[test]
    fn valid_creation_passes_through() {
        let Ok(gpu) = HeadlessGpu::new_blocking("scope test") else {
            return;
        };

        let value = validated(&gpu.device, "nothing", || 7).unwrap();
        assert_eq!(value, 7);
    }
}
