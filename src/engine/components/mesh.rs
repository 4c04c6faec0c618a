use std::mem::{offset_of, size_of};
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use log::{debug, error};

use crate::engine::gpu::{Gpu, VertexAttribute};

/// Interleaved vertex layout shared by every mesh and shader in the crate.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    pub fn from_position(position: impl Into<Vec3>) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    /// Attribute slots matching the `layout (location = N)` declarations in
    /// the shaders: position, normal, texcoords, tangent, bitangent.
    pub fn attributes() -> [VertexAttribute; 5] {
        let stride = size_of::<Vertex>() as i32;
        let attr = |location, components, offset: usize| VertexAttribute {
            location,
            components,
            stride,
            offset: offset as i32,
        };
        [
            attr(0, 3, offset_of!(Vertex, position)),
            attr(1, 3, offset_of!(Vertex, normal)),
            attr(2, 2, offset_of!(Vertex, tex_coords)),
            attr(3, 3, offset_of!(Vertex, tangent)),
            attr(4, 3, offset_of!(Vertex, bitangent)),
        ]
    }
}

/// Buffer layout the vertices are uploaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Interleaved,
    /// Tightly packed positions at location 0.
    PositionsOnly,
}

const POSITION_ONLY: VertexAttribute = VertexAttribute {
    location: 0,
    components: 3,
    stride: size_of::<Vec3>() as i32,
    offset: 0,
};

struct MeshHandles<G: Gpu> {
    vao: G::VertexArray,
    vbo: G::Buffer,
    ebo: G::Buffer,
}

/// Geometry uploaded once to a VAO + vertex buffer + index buffer.
///
/// Not `Clone`: the GPU objects have a single owner and are deleted exactly
/// once, either by [`Mesh::release`] or on drop.
pub struct Mesh<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    handles: Option<MeshHandles<G>>,
}

impl<G: Gpu> Mesh<G> {
    /// Takes ownership of the geometry and uploads it immediately.
    ///
    /// Out-of-range indices are rejected: the error is logged and an empty
    /// mesh is returned so that nothing invalid reaches the GPU.
    pub fn new(gpu: Rc<G>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self::build(gpu, vertices, indices, Layout::Interleaved)
    }

    /// Uploads only the positions, at location 0 with a 12 byte stride. The
    /// CPU-side vertices keep every other attribute zeroed.
    pub fn from_positions(gpu: Rc<G>, positions: &[[f32; 3]], indices: Vec<u32>) -> Self {
        let vertices = positions.iter().map(|&p| Vertex::from_position(p)).collect();
        Self::build(gpu, vertices, indices, Layout::PositionsOnly)
    }

    fn build(gpu: Rc<G>, vertices: Vec<Vertex>, indices: Vec<u32>, layout: Layout) -> Self {
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            error!("mesh index {bad} out of range for {} vertices, mesh dropped", vertices.len());
            return Self::empty(gpu);
        }

        let uploaded = match layout {
            Layout::Interleaved => upload(&*gpu, bytemuck::cast_slice(&vertices), &Vertex::attributes(), &indices),
            Layout::PositionsOnly => {
                let positions: Vec<Vec3> = vertices.iter().map(|v| v.position).collect();
                upload(&*gpu, bytemuck::cast_slice(&positions), &[POSITION_ONLY], &indices)
            }
        };
        let handles = match uploaded {
            Ok(handles) => Some(handles),
            Err(e) => {
                error!("mesh upload failed: {e}");
                None
            }
        };

        Self {
            gpu,
            vertices,
            indices,
            handles,
        }
    }

    pub fn empty(gpu: Rc<G>) -> Self {
        Self {
            gpu,
            vertices: Vec::new(),
            indices: Vec::new(),
            handles: None,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_uploaded(&self) -> bool {
        self.handles.is_some()
    }

    /// Binds the VAO and draws every index as a triangle list.
    pub fn draw(&self) {
        let Some(handles) = &self.handles else {
            return;
        };
        self.gpu.bind_vertex_array(Some(handles.vao));
        self.gpu.draw_indexed_triangles(self.indices.len());
        self.gpu.bind_vertex_array(None);
    }

    /// Deletes the VAO and both buffers. Calling it again does nothing.
    pub fn release(&mut self) {
        if let Some(MeshHandles { vao, vbo, ebo }) = self.handles.take() {
            self.gpu.delete_vertex_array(vao);
            self.gpu.delete_buffer(vbo);
            self.gpu.delete_buffer(ebo);
            debug!("mesh {vao:?} released");
        }
    }
}

impl<G: Gpu> Drop for Mesh<G> {
    fn drop(&mut self) {
        self.release();
    }
}

fn upload<G: Gpu>(
    gpu: &G,
    vertex_data: &[u8],
    attributes: &[VertexAttribute],
    indices: &[u32],
) -> Result<MeshHandles<G>, String> {
    let vao = gpu.create_vertex_array()?;
    let vbo = match gpu.create_buffer() {
        Ok(vbo) => vbo,
        Err(e) => {
            gpu.delete_vertex_array(vao);
            return Err(e);
        }
    };
    let ebo = match gpu.create_buffer() {
        Ok(ebo) => ebo,
        Err(e) => {
            gpu.delete_buffer(vbo);
            gpu.delete_vertex_array(vao);
            return Err(e);
        }
    };

    gpu.bind_vertex_array(Some(vao));
    gpu.upload_vertex_buffer(vbo, vertex_data);
    gpu.upload_index_buffer(ebo, bytemuck::cast_slice(indices));
    for &attribute in attributes {
        gpu.vertex_attribute(attribute);
    }
    gpu.unbind_vertex_buffer();
    // the element buffer binding stays recorded in the VAO
    gpu.bind_vertex_array(None);

    debug!("uploaded mesh {vao:?}: {} bytes of vertices, {} indices", vertex_data.len(), indices.len());
    Ok(MeshHandles { vao, vbo, ebo })
}
