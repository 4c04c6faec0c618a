//! Scene importers. Each format produces an [`ImportedScene`]: CPU-side
//! meshes that already went through [`finish_mesh`], plus the node tree that
//! references them.

pub mod gltf_loader;
pub mod obj_loader;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use glam::{Vec2, Vec3};
use log::warn;

use crate::engine::utils::postprocess::{
    flip_uvs, join_identical_vertices, smooth_normals, tangent_frames, Geometry,
};

#[derive(Debug)]
pub enum ImportError {
    Io(String),
    Parse(String),
    NoRootNode,
    UnsupportedFormat(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(msg) => write!(f, "could not read scene: {msg}"),
            ImportError::Parse(msg) => write!(f, "malformed scene: {msg}"),
            ImportError::NoRootNode => write!(f, "scene has no root node"),
            ImportError::UnsupportedFormat(ext) => write!(f, "unsupported scene format `{ext}`"),
        }
    }
}

impl std::error::Error for ImportError {}

/// A triangulated, welded mesh with normals and, when UV channel 0 exists,
/// tangent frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// `None` when the source has no UV channel 0.
    pub tex_coords: Option<Vec<Vec2>>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Indices into [`ImportedScene::meshes`].
    pub meshes: Vec<usize>,
    /// Indices into [`ImportedScene::nodes`].
    pub children: Vec<usize>,
}

#[derive(Debug, Default, Clone)]
pub struct ImportedScene {
    pub meshes: Vec<ImportedMesh>,
    pub nodes: Vec<SceneNode>,
    pub roots: Vec<usize>,
}

impl ImportedScene {
    /// Mesh indices in depth-first node order: a node's own meshes, then its
    /// children. A mesh referenced by several nodes appears once per node.
    pub fn mesh_references(&self) -> Vec<usize> {
        let mut references = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                warn!("node {index} does not exist, skipped");
                continue;
            };
            if !visited.insert(index) {
                warn!("node `{}` reached twice, skipped", node.name);
                continue;
            }
            references.extend(node.meshes.iter().copied().filter(|&m| m < self.meshes.len()));
            stack.extend(node.children.iter().rev().copied());
        }

        references
    }
}

/// Picks the importer from the file extension.
pub fn import_scene(path: &Path) -> Result<ImportedScene, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let scene = match ext.as_str() {
        "gltf" | "glb" => gltf_loader::import_file(path)?,
        "obj" => obj_loader::import_file(path)?,
        _ => return Err(ImportError::UnsupportedFormat(ext)),
    };

    if scene.roots.is_empty() {
        return Err(ImportError::NoRootNode);
    }
    Ok(scene)
}

/// Welds identical vertices, fills in missing normals, flips UVs and
/// computes tangent frames. `geometry.indices` must be a triangle list.
pub fn finish_mesh(name: impl Into<String>, geometry: Geometry) -> ImportedMesh {
    let mut geometry = join_identical_vertices(geometry);

    if !geometry.has_normals() {
        geometry.normals = smooth_normals(&geometry.positions, &geometry.indices);
    }

    let tex_coords = geometry.has_tex_coords().then(|| {
        let mut uvs = std::mem::take(&mut geometry.tex_coords);
        flip_uvs(&mut uvs);
        uvs
    });

    let (tangents, bitangents) = match &tex_coords {
        Some(uvs) => tangent_frames(&geometry.positions, &geometry.normals, uvs, &geometry.indices),
        None => {
            let zeros = vec![Vec3::ZERO; geometry.positions.len()];
            (zeros.clone(), zeros)
        }
    };

    ImportedMesh {
        name: name.into(),
        positions: geometry.positions,
        normals: geometry.normals,
        tex_coords,
        tangents,
        bitangents,
        indices: geometry.indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(meshes: &[usize], children: &[usize]) -> SceneNode {
        SceneNode {
            name: String::new(),
            meshes: meshes.to_vec(),
            children: children.to_vec(),
        }
    }

    fn dummy_mesh() -> ImportedMesh {
        finish_mesh("tri", Geometry {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![0, 1, 2],
            ..Default::default()
        })
    }

    #[test]
    fn references_are_depth_first_and_duplicated() {
        let scene = ImportedScene {
            meshes: vec![dummy_mesh(), dummy_mesh()],
            nodes: vec![node(&[0], &[1, 2]), node(&[1], &[3]), node(&[0], &[]), node(&[0, 1], &[])],
            roots: vec![0],
        };
        assert_eq!(scene.mesh_references(), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn cycles_and_dangling_indices_are_skipped() {
        let scene = ImportedScene {
            meshes: vec![dummy_mesh()],
            nodes: vec![node(&[0, 7], &[1, 9]), node(&[0], &[0])],
            roots: vec![0],
        };
        assert_eq!(scene.mesh_references(), vec![0, 0]);
    }

    #[test]
    fn finishing_without_uvs_zero_fills_tangents() {
        let mesh = dummy_mesh();
        assert!(mesh.tex_coords.is_none());
        assert_eq!(mesh.normals, vec![Vec3::Z; 3]);
        assert!(mesh.tangents.iter().chain(&mesh.bitangents).all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn finishing_with_uvs_flips_and_builds_tangents() {
        let mesh = finish_mesh("tri", Geometry {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            tex_coords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            indices: vec![0, 1, 2],
        });
        assert_eq!(mesh.tex_coords, Some(vec![Vec2::Y, Vec2::new(1.0, 1.0), Vec2::ZERO]));
        // v is flipped, so the bitangent points down the V axis
        assert!(mesh.tangents[0].abs_diff_eq(Vec3::X, 1e-5));
        assert!(mesh.bitangents[0].abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = import_scene(Path::new("scene.fbx")).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref e) if e == "fbx"));
    }
}
