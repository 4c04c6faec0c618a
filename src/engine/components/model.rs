use std::path::Path;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use log::{debug, error, info, warn};

use crate::engine::components::mesh::{Mesh, Vertex};
use crate::engine::gpu::Gpu;
use crate::engine::loaders::{import_scene, ImportedMesh, ImportedScene};

/// Every mesh reachable from the scene roots of a model file.
pub struct Model<G: Gpu = glow::Context> {
    meshes: Vec<Mesh<G>>,
}

impl<G: Gpu> Model<G> {
    /// Imports and uploads a `.obj`, `.gltf` or `.glb` file. Import errors
    /// are logged and produce a model without meshes.
    pub fn load(gpu: Rc<G>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match import_scene(path) {
            Ok(scene) => {
                let model = Self::from_scene(gpu, &scene);
                info!("📦 loaded {} ({} meshes)", path.display(), model.meshes.len());
                model
            }
            Err(e) => {
                error!("❌ model {}: {e}", path.display());
                Self { meshes: Vec::new() }
            }
        }
    }

    /// Uploads one mesh per node reference, in depth-first order.
    pub fn from_scene(gpu: Rc<G>, scene: &ImportedScene) -> Self {
        let meshes = scene
            .mesh_references()
            .into_iter()
            .map(|index| {
                let imported = &scene.meshes[index];
                let (vertices, missing_uvs) = vertices_of(imported);
                if missing_uvs > 0 {
                    debug!("mesh `{}`: {missing_uvs} vertices without texture coordinates", imported.name);
                }
                Mesh::new(gpu.clone(), vertices, imported.indices.clone())
            })
            .collect();
        Self { meshes }
    }

    pub fn from_meshes(meshes: Vec<Mesh<G>>) -> Self {
        Self { meshes }
    }

    pub fn meshes(&self) -> &[Mesh<G>] {
        &self.meshes
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn draw(&self) {
        for mesh in &self.meshes {
            mesh.draw();
        }
    }
}

/// GPU vertices plus the number of them that had no texture coordinates;
/// each of those is also logged.
fn vertices_of(mesh: &ImportedMesh) -> (Vec<Vertex>, usize) {
    let mut missing_uvs = 0;
    let vertices = (0..mesh.positions.len())
        .map(|i| {
            let mut vertex = Vertex {
                position: mesh.positions[i],
                normal: mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO),
                ..Vertex::default()
            };
            match &mesh.tex_coords {
                Some(uvs) => {
                    vertex.tex_coords = uvs[i];
                    vertex.tangent = mesh.tangents[i];
                    vertex.bitangent = mesh.bitangents[i];
                }
                None => {
                    warn!("mesh `{}` vertex {i} has no texture coordinates", mesh.name);
                    missing_uvs += 1;
                    vertex.tex_coords = Vec2::ZERO;
                }
            }
            vertex
        })
        .collect();
    (vertices, missing_uvs)
}
