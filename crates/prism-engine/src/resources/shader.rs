use std::path::Path;

use anyhow::{Context, Result};

use crate::device::validated;

/// Reads a WGSL file and compiles it into a shader module labelled with the
/// file name.
///
/// Fails if the file cannot be read or the device rejects the source.
pub fn load_shader_module(path: &Path, device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "shader".to_string());
    log::debug!("compiling shader {}", path.display());

    shader_module_from_source(device, &label, &source)
        .with_context(|| format!("failed to compile shader {}", path.display()))
}

pub fn shader_module_from_source(device: &wgpu::Device, label: &str, source: &str) -> Result<wgpu::ShaderModule> {
    validated(device, &format!("shader module {label}"), || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::HeadlessGpu;

    #[test]
    fn missing_file_error_names_the_path() {
        let Ok(gpu) = HeadlessGpu::new_blocking("shader test") else {
            return;
        };

        let path = Path::new("/nonexistent/prism/missing.wgsl");
        let err = load_shader_module(path, &gpu.device).err().map(|e| format!("{e:#}"));
        let err = err.unwrap_or_default();
        assert!(err.contains("failed to read shader"), "{err}");
        assert!(err.contains("/nonexistent/prism/missing.wgsl"), "{err}");
    }

    #[test]
    fn invalid_wgsl_is_an_error() {
        let Ok(gpu) = HeadlessGpu::new_blocking("shader test") else {
            return;
        };

        let path = std::env::temp_dir().join(format!("prism-broken-{}.wgsl", std::process::id()));
        std::fs::write(&path, "@vertex fn vs_main( -> nonsense {").unwrap();
        let result = load_shader_module(&path, &gpu.device);
        let _ = std::fs::remove_file(&path);

        let err = result.err().map(|e| format!("{e:#}")).unwrap_or_default();
        assert!(err.contains("failed to compile shader"), "{err}");
        assert!(err.contains("prism-broken-"), "{err}");
    }

    #[test]
    fn valid_source_compiles() {
        let Ok(gpu) = HeadlessGpu::new_blocking("shader test") else {
            return;
        };

        let src = "@fragment fn fs_main() -> @location(0) vec4f { return vec4f(1.0); }";
        assert!(shader_module_from_source(&gpu.device, "ok", src).is_ok());
    }
}
