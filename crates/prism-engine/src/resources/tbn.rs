use glam::{Mat3, Vec2, Vec3};

use super::VertexAttributes;

/// Tangent frame of a triangle, returned as a matrix whose columns are
/// T, B and N.
///
/// T and B follow the UV gradients, flipped if needed so that `T x B`
/// agrees with `expected_n`, then orthonormalized against it. N is
/// `expected_n` normalized. When the UVs are degenerate an arbitrary
/// orthonormal pair around N is used instead.
pub fn compute_tbn(corners: &[VertexAttributes; 3], expected_n: Vec3) -> Mat3 {
    let p = corners.map(|c| Vec3::from_array(c.position));
    let uv = corners.map(|c| Vec2::from_array(c.uv));

    let n = normal_or_face(expected_n, p);

    let e_pos = [p[1] - p[0], p[2] - p[0]];
    let e_uv = [uv[1] - uv[0], uv[2] - uv[0]];

    let t = e_pos[0] * e_uv[1].y - e_pos[1] * e_uv[0].y;
    let b = e_pos[1] * e_uv[0].x - e_pos[0] * e_uv[1].x;

    let (mut t, b) = match (t.try_normalize(), b.try_normalize()) {
        (Some(t), Some(b)) => (t, b),
        _ => return fallback_frame(n),
    };

    if t.cross(b).dot(n) < 0.0 {
        t = -t;
    }

    let Some(t) = (t - t.dot(n) * n).try_normalize() else {
        return fallback_frame(n);
    };
    let b = n.cross(t);

    Mat3::from_cols(t, b, n)
}

/// Fills tangent/bitangent/normal of every vertex of a flat triangle list.
///
/// Each corner keeps its own shading normal as N. Trailing vertices that do
/// not form a full triangle are left untouched.
pub fn populate_texture_frame_attributes(vertices: &mut [VertexAttributes]) {
    for tri in vertices.chunks_exact_mut(3) {
        let corners = [tri[0], tri[1], tri[2]];
        for v in tri.iter_mut() {
            let frame = compute_tbn(&corners, Vec3::from_array(v.normal));
            v.tangent = frame.x_axis.to_array();
            v.bitangent = frame.y_axis.to_array();
            v.normal = frame.z_axis.to_array();
        }
    }
}

/// `n` normalized, else the triangle's geometric normal, else +Z.
fn normal_or_face(n: Vec3, p: [Vec3; 3]) -> Vec3 {
    n.try_normalize()
        .or_else(|| (p[1] - p[0]).cross(p[2] - p[0]).try_normalize())
        .unwrap_or(Vec3::Z)
}

fn fallback_frame(n: Vec3) -> Mat3 {
    let t = n.any_orthonormal_vector();
    Mat3::from_cols(t, n.cross(t), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(p: [f32; 3], uv: [f32; 2], n: [f32; 3]) -> VertexAttributes {
        VertexAttributes {
            position: p,
            normal: n,
            uv,
            ..Default::default()
        }
    }

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn uv_aligned_triangle_gives_axis_frame() {
        let z = [0.0, 0.0, 1.0];
        let corners = [
            vertex([0.0, 0.0, 0.0], [0.0, 0.0], z),
            vertex([1.0, 0.0, 0.0], [1.0, 0.0], z),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0], z),
        ];
        let m = compute_tbn(&corners, Vec3::Z);
        assert_close(m.x_axis, Vec3::X);
        assert_close(m.y_axis, Vec3::Y);
        assert_close(m.z_axis, Vec3::Z);
    }

    #[test]
    fn frame_flips_to_match_expected_normal() {
        let corners = [
            vertex([0.0, 0.0, 0.0], [0.0, 0.0], [0.0; 3]),
            vertex([1.0, 0.0, 0.0], [1.0, 0.0], [0.0; 3]),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0], [0.0; 3]),
        ];
        let m = compute_tbn(&corners, -Vec3::Z);
        assert_close(m.z_axis, -Vec3::Z);
        assert!(m.x_axis.cross(m.y_axis).dot(m.z_axis) > 0.99);
    }

    #[test]
    fn mirrored_uvs_flip_tangent_and_stay_right_handed() {
        let z = [0.0, 0.0, 1.0];
        let corners = [
            vertex([0.0, 0.0, 0.0], [1.0, 0.0], z),
            vertex([1.0, 0.0, 0.0], [0.0, 0.0], z),
            vertex([0.0, 1.0, 0.0], [1.0, 1.0], z),
        ];
        let m = compute_tbn(&corners, Vec3::Z);
        assert_close(m.x_axis, -Vec3::X);
        assert_close(m.y_axis, -Vec3::Y);
        assert_close(m.x_axis.cross(m.y_axis), Vec3::Z);
    }

    #[test]
    fn degenerate_uvs_never_produce_nan() {
        let corners = [
            vertex([0.0, 0.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
            vertex([1.0, 0.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
            vertex([0.0, 1.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]),
        ];
        let m = compute_tbn(&corners, Vec3::Z);
        assert!(m.is_finite());
        assert!(m.x_axis.dot(Vec3::Z).abs() < 1e-5);
        assert!((m.x_axis.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tangent_is_orthogonal_to_tilted_normal() {
        let tilted = Vec3::new(0.0, 0.3, 1.0).normalize();
        let corners = [
            vertex([0.0, 0.0, 0.0], [0.0, 0.0], tilted.to_array()),
            vertex([1.0, 0.0, 0.0], [1.0, 0.0], tilted.to_array()),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0], tilted.to_array()),
        ];
        let m = compute_tbn(&corners, tilted);
        assert!(m.x_axis.dot(tilted).abs() < 1e-5);
        assert!(m.y_axis.dot(tilted).abs() < 1e-5);
        assert_close(m.z_axis, tilted);
    }

    #[test]
    fn populate_ignores_incomplete_trailing_triangle() {
        let z = [0.0, 0.0, 1.0];
        let mut verts = vec![
            vertex([0.0, 0.0, 0.0], [0.0, 0.0], z),
            vertex([1.0, 0.0, 0.0], [1.0, 0.0], z),
            vertex([0.0, 1.0, 0.0], [0.0, 1.0], z),
            vertex([5.0, 5.0, 5.0], [0.0, 0.0], z),
        ];
        populate_texture_frame_attributes(&mut verts);
        assert_eq!(verts[0].tangent, [1.0, 0.0, 0.0]);
        assert_eq!(verts[3].tangent, [0.0; 3]);
    }
}
