//! Narrow view of the OpenGL API used by the engine components.
//!
//! Components are generic over [`Gpu`] so they can run against a real
//! `glow::Context` or against the recording backend used in tests.

mod glow_backend;
pub use glow_backend::load_gl_functions;
#[cfg(test)]
pub mod recording;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    Fill,
    Line,
}

/// Layout of one float vertex attribute inside an interleaved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    pub stride: i32,
    pub offset: i32,
}

/// A typed uniform value, one variant per setter of the shader program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Uint(u32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

macro_rules! uniform_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

uniform_from! {
    bool => Bool,
    i32 => Int,
    u32 => Uint,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

/// The OpenGL operations the engine needs.
///
/// Object creation failures are reported as `Err(String)`, the same
/// convention `glow` uses. Everything else follows GL semantics: operations
/// act on whatever is currently bound.
pub trait Gpu {
    type Shader: Copy + std::fmt::Debug;
    type Program: Copy + std::fmt::Debug;
    type Buffer: Copy + std::fmt::Debug;
    type VertexArray: Copy + std::fmt::Debug;
    type UniformLocation: std::fmt::Debug;

    // Shaders and programs
    fn create_shader(&self, stage: ShaderStage, source: &str) -> Result<Self::Shader, String>;
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);
    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    // Uniforms and subroutines
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn set_uniform(&self, location: &Self::UniformLocation, value: UniformValue);
    fn subroutine_index(&self, program: Self::Program, stage: ShaderStage, name: &str) -> Option<u32>;
    fn set_subroutines(&self, stage: ShaderStage, indices: &[u32]);

    // Geometry
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn bind_vertex_array(&self, vao: Option<Self::VertexArray>);
    fn delete_vertex_array(&self, vao: Self::VertexArray);
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn upload_vertex_buffer(&self, buffer: Self::Buffer, data: &[u8]);
    fn upload_index_buffer(&self, buffer: Self::Buffer, data: &[u8]);
    fn unbind_vertex_buffer(&self);
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn vertex_attribute(&self, attribute: VertexAttribute);
    fn draw_indexed_triangles(&self, index_count: usize);

    // Frame state
    fn viewport(&self, width: u32, height: u32);
    fn clear(&self, color: [f32; 4], depth: bool);
    fn set_depth_test(&self, enabled: bool);
    fn set_polygon_mode(&self, mode: PolygonMode);
}
