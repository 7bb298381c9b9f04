use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use super::{populate_texture_frame_attributes, VertexAttributes};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Loads every shape of an OBJ file into one flat triangle list with
/// tangent frames filled in.
pub fn load_geometry_from_obj(path: &Path) -> Result<Vec<VertexAttributes>> {
    let (models, materials) = tobj::load_obj(path, &load_options())
        .with_context(|| format!("failed to load OBJ {}", path.display()))?;

    if let Err(e) = materials {
        log::debug!("{}: materials not loaded ({e})", path.display());
    }

    let vertices = flatten_models(&models);
    log::info!("loaded {}: {} shapes, {} vertices", path.display(), models.len(), vertices.len());
    Ok(vertices)
}

/// Same as [`load_geometry_from_obj`] for OBJ text already in memory.
/// `mtllib` references are ignored.
pub fn parse_obj(reader: &mut impl BufRead) -> Result<Vec<VertexAttributes>> {
    let (models, _) = tobj::load_obj_buf(reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .context("failed to parse OBJ")?;
    Ok(flatten_models(&models))
}

fn flatten_models(models: &[tobj::Model]) -> Vec<VertexAttributes> {
    let total: usize = models.iter().map(|m| m.mesh.indices.len()).sum();
    let mut out = Vec::with_capacity(total);

    for model in models {
        let mesh = &model.mesh;
        for &idx in &mesh.indices {
            out.push(mesh_vertex(mesh, idx as usize));
        }
    }

    populate_texture_frame_attributes(&mut out);
    out
}

/// OBJ is Y-up; the scene is Z-up, so `(x, y, z)` becomes `(x, -z, y)`.
fn y_up_to_z_up(v: [f32; 3]) -> [f32; 3] {
    [v[0], -v[2], v[1]]
}

fn triple(data: &[f32], i: usize) -> Option<[f32; 3]> {
    data.get(3 * i..3 * i + 3).map(|s| [s[0], s[1], s[2]])
}

fn mesh_vertex(mesh: &tobj::Mesh, i: usize) -> VertexAttributes {
    let position = triple(&mesh.positions, i).map(y_up_to_z_up).unwrap_or_default();
    let normal = triple(&mesh.normals, i).map(y_up_to_z_up).unwrap_or_default();
    let color = triple(&mesh.vertex_color, i).unwrap_or([1.0, 1.0, 1.0]);
    // OBJ puts v=0 at the bottom of the image; textures start at the top.
    let uv = mesh
        .texcoords
        .get(2 * i..2 * i + 2)
        .map(|s| [s[0], 1.0 - s[1]])
        .unwrap_or_default();

    VertexAttributes {
        position,
        normal,
        color,
        uv,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 0 -1
v 0 0 -1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    fn load(src: &str) -> Vec<VertexAttributes> {
        parse_obj(&mut std::io::Cursor::new(src.as_bytes())).unwrap()
    }

    #[test]
    fn quad_is_triangulated_and_flattened() {
        let verts = load(QUAD);
        assert_eq!(verts.len(), 6);
    }

    #[test]
    fn axes_are_converted_to_z_up() {
        let verts = load(QUAD);
        // OBJ (1, 0, -1) lands at (1, 1, 0).
        assert!(verts.iter().any(|v| v.position == [1.0, 1.0, 0.0]));
        // The +Y OBJ normal becomes +Z.
        for v in &verts {
            assert!((v.normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn uv_v_is_flipped() {
        let verts = load(QUAD);
        let origin = verts.iter().find(|v| v.position == [0.0, 0.0, 0.0]).unwrap();
        assert_eq!(origin.uv, [0.0, 1.0]);
    }

    #[test]
    fn missing_attributes_default() {
        let verts = load("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert_eq!(verts.len(), 3);
        for v in &verts {
            assert_eq!(v.color, [1.0, 1.0, 1.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
            assert!(v.tangent.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_geometry_from_obj(Path::new("/nonexistent/model.obj")).is_err());
    }
}
