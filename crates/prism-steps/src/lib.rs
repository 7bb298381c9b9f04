//! Shared scaffolding for the step binaries.

use std::path::{Path, PathBuf};

use anyhow::Result;
use winit::dpi::LogicalSize;

use prism_engine::core::App;
use prism_engine::device::GpuInit;
use prism_engine::layout::align_to;
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::window::{Runtime, RuntimeConfig};

/// Directory holding shaders, geometry and models shipped with the steps.
pub fn resource_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources"))
}

/// `relative` resolved against [`resource_dir`].
pub fn resource(relative: impl AsRef<Path>) -> PathBuf {
    resource_dir().join(relative)
}

/// `u16` indices as bytes, zero-padded to the 4-byte copy alignment.
pub fn padded_index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice::<u16, u8>(indices).to_vec();
    bytes.resize(align_to(bytes.len() as u64, 4) as usize, 0);
    bytes
}

/// Initializes logging and runs `app` in a 640x480 window.
pub fn run_step<A: App + 'static>(title: &str, resizable: bool, app: A) -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: title.to_string(),
        initial_size: LogicalSize::new(640.0, 480.0),
        resizable,
    };
    Runtime::run(config, GpuInit::default(), app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_index_count_is_padded() {
        assert_eq!(padded_index_bytes(&[0, 1, 2]).len(), 8);
        assert_eq!(padded_index_bytes(&[0, 1, 2, 0, 2, 3]).len(), 12);
        assert_eq!(&padded_index_bytes(&[7, 1, 2])[6..], &[0, 0]);
    }

    #[test]
    fn bundled_resources_exist() {
        for rel in [
            "shaders/hello_triangle.wgsl",
            "shaders/colored_quad.wgsl",
            "shaders/pyramid.wgsl",
            "shaders/lit_model.wgsl",
            "geometry/quad.txt",
            "geometry/pyramid.txt",
            "models/cube.obj",
        ] {
            assert!(resource(rel).is_file(), "missing {rel}");
        }
    }

    #[test]
    fn bundled_shaders_validate() {
        let dir = resource("shaders");
        let mut checked = 0;
        for entry in std::fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().is_none_or(|e| e != "wgsl") {
                continue;
            }
            let source = std::fs::read_to_string(&path).unwrap();
            let module = naga::front::wgsl::parse_str(&source)
                .unwrap_or_else(|e| panic!("{}", e.emit_to_string_with_path(&source, &path)));
            naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
                .validate(&module)
                .unwrap_or_else(|e| panic!("{}: {e:?}", path.display()));
            checked += 1;
        }
        assert_eq!(checked, 4);
    }

    #[test]
    fn bundled_geometry_parses() {
        let quad = prism_engine::resources::load_geometry(&resource("geometry/quad.txt"), 2).unwrap();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.indices.len(), 6);

        let pyramid = prism_engine::resources::load_geometry(&resource("geometry/pyramid.txt"), 3).unwrap();
        assert_eq!(pyramid.indices.len() % 3, 0);
    }

    #[test]
    fn bundled_model_loads() {
        let verts = prism_engine::resources::load_geometry_from_obj(&resource("models/cube.obj")).unwrap();
        assert_eq!(verts.len(), 36);
    }
}
