//! Geometry clean-up applied to every imported mesh: strip and fan
//! expansion, vertex welding, UV flipping, smooth normals and tangent frames.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

pub fn triangles_from_strip(indices: &[u32]) -> Vec<u32> {
    let mut triangles = Vec::new();
    for i in 0..indices.len().saturating_sub(2) {
        // keep a consistent winding on odd triangles
        if i % 2 == 0 {
            triangles.extend_from_slice(&[indices[i], indices[i + 1], indices[i + 2]]);
        } else {
            triangles.extend_from_slice(&[indices[i + 1], indices[i], indices[i + 2]]);
        }
    }
    triangles
}

pub fn triangles_from_fan(indices: &[u32]) -> Vec<u32> {
    let Some((&center, rim)) = indices.split_first() else {
        return Vec::new();
    };
    rim.windows(2).flat_map(|edge| [center, edge[0], edge[1]]).collect()
}

/// Geometry with per-vertex attribute streams. Empty `normals` or
/// `tex_coords` mean the attribute is absent.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty() && self.normals.len() == self.positions.len()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.tex_coords.is_empty() && self.tex_coords.len() == self.positions.len()
    }
}

/// Merges vertices whose position, normal and UV are bit-identical and
/// rewrites the indices. Unreferenced vertices are dropped.
pub fn join_identical_vertices(geometry: Geometry) -> Geometry {
    let has_normals = geometry.has_normals();
    let has_uvs = geometry.has_tex_coords();

    let key = |i: usize| -> [u32; 8] {
        let p = geometry.positions[i];
        let n = if has_normals { geometry.normals[i] } else { Vec3::ZERO };
        let t = if has_uvs { geometry.tex_coords[i] } else { Vec2::ZERO };
        [p.x, p.y, p.z, n.x, n.y, n.z, t.x, t.y].map(f32::to_bits)
    };

    let mut remap: HashMap<[u32; 8], u32> = HashMap::new();
    let mut welded = Geometry::default();
    welded.indices.reserve(geometry.indices.len());

    for &index in &geometry.indices {
        let i = index as usize;
        let next = welded.positions.len() as u32;
        let target = *remap.entry(key(i)).or_insert_with(|| {
            welded.positions.push(geometry.positions[i]);
            if has_normals {
                welded.normals.push(geometry.normals[i]);
            }
            if has_uvs {
                welded.tex_coords.push(geometry.tex_coords[i]);
            }
            next
        });
        welded.indices.push(target);
    }

    welded
}

/// `v -> 1 - v`, matching OpenGL's bottom-left texture origin.
pub fn flip_uvs(tex_coords: &mut [Vec2]) {
    for uv in tex_coords {
        uv.y = 1.0 - uv.y;
    }
}

/// Area-weighted average of the adjacent face normals.
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        // cross product length is twice the triangle area
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Per-vertex tangent and bitangent from UV gradients, accumulated over the
/// adjacent triangles. Triangles with a degenerate UV mapping contribute
/// nothing.
pub fn tangent_frames(
    positions: &[Vec3],
    normals: &[Vec3],
    tex_coords: &[Vec2],
    indices: &[u32],
) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut tangents = vec![Vec3::ZERO; positions.len()];
    let mut bitangents = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let edge1 = positions[b] - positions[a];
        let edge2 = positions[c] - positions[a];
        let duv1 = tex_coords[b] - tex_coords[a];
        let duv2 = tex_coords[c] - tex_coords[a];

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

        for v in [a, b, c] {
            tangents[v] += tangent;
            bitangents[v] += bitangent;
        }
    }

    // Gram-Schmidt against the normal
    for i in 0..positions.len() {
        let n = normals.get(i).copied().unwrap_or(Vec3::ZERO);
        let t = tangents[i];
        tangents[i] = (t - n * n.dot(t)).normalize_or_zero();
        bitangents[i] = bitangents[i].normalize_or_zero();
    }

    (tangents, bitangents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_eq(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn strips_alternate_winding() {
        assert_eq!(triangles_from_strip(&[0, 1, 2, 3]), vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(triangles_from_fan(&[0, 1, 2, 3]), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn short_fans_yield_nothing() {
        assert!(triangles_from_fan(&[]).is_empty());
        assert!(triangles_from_fan(&[0, 1]).is_empty());
    }

    #[test]
    fn identical_corners_are_welded() {
        // two triangles of a quad, unindexed
        let p = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let geometry = Geometry {
            positions: p.to_vec(),
            indices: (0..6).collect(),
            ..Default::default()
        };
        let welded = join_identical_vertices(geometry);
        assert_eq!(welded.positions.len(), 4);
        assert_eq!(welded.indices, vec![0, 1, 2, 1, 3, 2]);
    }

    #[test]
    fn differing_uvs_keep_vertices_apart() {
        let geometry = Geometry {
            positions: vec![Vec3::ZERO, Vec3::ZERO],
            tex_coords: vec![Vec2::ZERO, Vec2::ONE],
            indices: vec![0, 1],
            ..Default::default()
        };
        assert_eq!(join_identical_vertices(geometry).positions.len(), 2);
    }

    #[test]
    fn uv_flip_mirrors_v() {
        let mut uvs = vec![Vec2::new(0.25, 0.0), Vec2::new(0.5, 0.75)];
        flip_uvs(&mut uvs);
        assert_eq!(uvs, vec![Vec2::new(0.25, 1.0), Vec2::new(0.5, 0.25)]);
    }

    #[test]
    fn flat_quad_gets_up_normals() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, -1.0), Vec3::NEG_Z];
        let normals = smooth_normals(&positions, &[0, 1, 2, 0, 2, 3]);
        for n in normals {
            assert_vec3_eq(n, Vec3::Y);
        }
    }

    #[test]
    fn unreferenced_vertex_normal_is_zero() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let normals = smooth_normals(&positions, &[0, 1, 2]);
        assert_vec3_eq(normals[0], Vec3::Z);
        assert_eq!(normals[3], Vec3::ZERO);
    }

    #[test]
    fn tangents_follow_u_and_bitangents_follow_v() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let (t, b) = tangent_frames(&positions, &normals, &uvs, &[0, 1, 2]);
        for i in 0..3 {
            assert_vec3_eq(t[i], Vec3::X);
            assert_vec3_eq(b[i], Vec3::Y);
        }
    }

    #[test]
    fn degenerate_uvs_give_zero_tangents() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = vec![Vec2::ZERO; 3];
        let (t, b) = tangent_frames(&positions, &normals, &uvs, &[0, 1, 2]);
        assert!(t.iter().chain(b.iter()).all(|v| *v == Vec3::ZERO));
    }
}
