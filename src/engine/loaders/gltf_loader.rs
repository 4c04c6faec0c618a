use std::path::Path;

use glam::{Vec2, Vec3};
use gltf::buffer::Data;
use gltf::mesh::Mode;
use log::{debug, warn};

use super::{finish_mesh, ImportError, ImportedScene, SceneNode};
use crate::engine::utils::postprocess::{triangles_from_fan, triangles_from_strip, Geometry};

/// Loads a `.gltf` (with external or embedded buffers) or a `.glb`.
pub fn import_file(path: &Path) -> Result<ImportedScene, ImportError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(io) => ImportError::Io(format!("{}: {io}", path.display())),
        other => ImportError::Parse(format!("{}: {other}", path.display())),
    })?;
    import_document(&document, &buffers)
}

/// Builds the scene from an already parsed document. Every triangle
/// primitive becomes one mesh; a node lists the meshes of all primitives of
/// its glTF mesh.
pub fn import_document(document: &gltf::Document, buffers: &[Data]) -> Result<ImportedScene, ImportError> {
    let mut scene = ImportedScene::default();

    let mut primitives_of_mesh: Vec<Vec<usize>> = Vec::with_capacity(document.meshes().len());
    for mesh in document.meshes() {
        let mesh_name = mesh.name().unwrap_or("mesh").to_string();
        let mut imported = Vec::new();
        for primitive in mesh.primitives() {
            match read_primitive(&primitive, buffers)? {
                Some(geometry) => {
                    let name = format!("{mesh_name}.{}", primitive.index());
                    imported.push(scene.meshes.len());
                    scene.meshes.push(finish_mesh(name, geometry));
                }
                None => warn!(
                    "primitive {} of `{mesh_name}` uses {:?}, only triangles are drawn",
                    primitive.index(),
                    primitive.mode()
                ),
            }
        }
        primitives_of_mesh.push(imported);
    }

    scene.nodes = document
        .nodes()
        .map(|node| SceneNode {
            name: node.name().unwrap_or_default().to_string(),
            meshes: node
                .mesh()
                .map(|m| primitives_of_mesh[m.index()].clone())
                .unwrap_or_default(),
            children: node.children().map(|c| c.index()).collect(),
        })
        .collect();

    let root_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::NoRootNode)?;
    scene.roots = root_scene.nodes().map(|n| n.index()).collect();

    debug!(
        "glTF scene: {} meshes, {} nodes, {} roots",
        scene.meshes.len(),
        scene.nodes.len(),
        scene.roots.len()
    );
    Ok(scene)
}

/// `Ok(None)` for point and line primitives.
fn read_primitive(primitive: &gltf::Primitive<'_>, buffers: &[Data]) -> Result<Option<Geometry>, ImportError> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| ImportError::Parse(format!("primitive {} has no positions", primitive.index())))?
        .map(Vec3::from)
        .collect();

    let normals: Vec<Vec3> = reader
        .read_normals()
        .map(|it| it.map(Vec3::from).collect())
        .unwrap_or_default();

    let tex_coords: Vec<Vec2> = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().map(Vec2::from).collect())
        .unwrap_or_default();

    let raw_indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let indices = match primitive.mode() {
        Mode::Triangles => raw_indices,
        Mode::TriangleStrip => triangles_from_strip(&raw_indices),
        Mode::TriangleFan => triangles_from_fan(&raw_indices),
        Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => return Ok(None),
    };

    if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(ImportError::Parse(format!(
            "primitive {} index {bad} out of range for {} vertices",
            primitive.index(),
            positions.len()
        )));
    }

    Ok(Some(Geometry {
        positions,
        normals,
        tex_coords,
        indices,
    }))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// One triangle: positions, normals, u32 indices, then optional UVs.
    pub(crate) fn triangle_buffer(with_uvs: bool) -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
        let indices: [u32; 3] = [0, 1, 2];
        let uvs: [f32; 6] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0];

        let mut bytes = Vec::new();
        bytes.extend_from_slice(bytemuck::cast_slice(&positions));
        bytes.extend_from_slice(bytemuck::cast_slice(&normals));
        bytes.extend_from_slice(bytemuck::cast_slice(&indices));
        if with_uvs {
            bytes.extend_from_slice(bytemuck::cast_slice(&uvs));
        }
        bytes
    }

    /// A document whose single mesh is referenced by `node0`, its child
    /// `node1` and `node3` (under the mesh-less `node2`).
    pub(crate) fn shared_mesh_document(with_uvs: bool) -> (gltf::Document, Vec<Data>) {
        let bin = triangle_buffer(with_uvs);
        let mut attributes = json!({ "POSITION": 0, "NORMAL": 1 });
        let mut buffer_views = vec![
            json!({ "buffer": 0, "byteOffset": 0, "byteLength": 36 }),
            json!({ "buffer": 0, "byteOffset": 36, "byteLength": 36 }),
            json!({ "buffer": 0, "byteOffset": 72, "byteLength": 12 }),
        ];
        let mut accessors = vec![
            json!({ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                    "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }),
            json!({ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }),
            json!({ "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" }),
        ];
        if with_uvs {
            attributes["TEXCOORD_0"] = json!(3);
            buffer_views.push(json!({ "buffer": 0, "byteOffset": 84, "byteLength": 24 }));
            accessors.push(json!({ "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC2" }));
        }

        let document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": bin.len() }],
            "bufferViews": buffer_views,
            "accessors": accessors,
            "meshes": [{ "name": "tri", "primitives": [{ "attributes": attributes, "indices": 2 }] }],
            "nodes": [
                { "name": "node0", "mesh": 0, "children": [1] },
                { "name": "node1", "mesh": 0 },
                { "name": "node2", "children": [3] },
                { "name": "node3", "mesh": 0 }
            ],
            "scenes": [{ "nodes": [0, 2] }],
            "scene": 0
        });

        let bytes = serde_json::to_vec(&document).unwrap();
        let gltf = gltf::Gltf::from_slice(&bytes).unwrap();
        (gltf.document, vec![Data(bin)])
    }

    #[test]
    fn shared_mesh_is_referenced_by_every_node() {
        let (document, buffers) = shared_mesh_document(false);
        let scene = import_document(&document, &buffers).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.roots, vec![0, 2]);
        assert_eq!(scene.mesh_references(), vec![0, 0, 0]);
    }

    #[test]
    fn primitive_attributes_are_read() {
        let (document, buffers) = shared_mesh_document(true);
        let scene = import_document(&document, &buffers).unwrap();
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.name, "tri.0");
        assert_eq!(mesh.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(mesh.normals, vec![Vec3::Z; 3]);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.tex_coords, Some(vec![Vec2::Y, Vec2::ONE, Vec2::ZERO]));
    }

    #[test]
    fn missing_uvs_are_reported_as_absent() {
        let (document, buffers) = shared_mesh_document(false);
        let scene = import_document(&document, &buffers).unwrap();
        assert!(scene.meshes[0].tex_coords.is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = import_file(Path::new("does/not/exist.gltf")).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
