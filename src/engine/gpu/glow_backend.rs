use std::ffi::{c_void, CStr, CString};

use glow::HasContext;
use log::{debug, warn};

use super::{Gpu, PolygonMode, ShaderStage, UniformValue, VertexAttribute};

fn stage_enum(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

/// Loads the entry points `glow` does not wrap (shader subroutines) through
/// the `gl` crate. Call once the context is current, with the same loader
/// used for `glow`.
pub fn load_gl_functions(mut loader: impl FnMut(&CStr) -> *const c_void) {
    gl::load_with(|symbol| match CString::new(symbol) {
        Ok(name) => loader(name.as_c_str()),
        Err(_) => std::ptr::null(),
    });
    if !gl::GetSubroutineIndex::is_loaded() || !gl::UniformSubroutinesuiv::is_loaded() {
        warn!("⚠️  shader subroutines unavailable, illumination models cannot be switched");
    } else {
        debug!("gl subroutine entry points loaded");
    }
}

fn subroutine_index_raw(program: u32, stage: ShaderStage, name: &str) -> Option<u32> {
    if !gl::GetSubroutineIndex::is_loaded() {
        return None;
    }
    let name = CString::new(name).ok()?;
    // SAFETY: the entry point is loaded and `name` is NUL-terminated.
    let index = unsafe { gl::GetSubroutineIndex(program, stage_enum(stage), name.as_ptr()) };
    (index != gl::INVALID_INDEX).then_some(index)
}

fn set_subroutines_raw(stage: ShaderStage, indices: &[u32]) -> bool {
    if !gl::UniformSubroutinesuiv::is_loaded() {
        return false;
    }
    // SAFETY: the entry point is loaded and `indices` outlives the call.
    unsafe { gl::UniformSubroutinesuiv(stage_enum(stage), indices.len() as i32, indices.as_ptr()) };
    true
}

// SAFETY (whole impl): every call runs on the thread owning the current
// context, and every handle passed in was created by this same context.
impl Gpu for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = glow::VertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage, source: &str) -> Result<glow::Shader, String> {
        unsafe {
            let shader = HasContext::create_shader(self, stage_enum(stage))?;
            self.shader_source(shader, source);
            self.compile_shader(shader);
            Ok(shader)
        }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: glow::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<glow::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: glow::Program, shader: glow::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: glow::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn delete_program(&self, program: glow::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform(&self, location: &glow::UniformLocation, value: UniformValue) {
        let loc = Some(location);
        unsafe {
            match value {
                UniformValue::Bool(v) => self.uniform_1_i32(loc, v as i32),
                UniformValue::Int(v) => self.uniform_1_i32(loc, v),
                UniformValue::Uint(v) => self.uniform_1_u32(loc, v),
                UniformValue::Float(v) => self.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => self.uniform_2_f32_slice(loc, &v.to_array()),
                UniformValue::Vec3(v) => self.uniform_3_f32_slice(loc, &v.to_array()),
                UniformValue::Vec4(v) => self.uniform_4_f32_slice(loc, &v.to_array()),
                // glam matrices are column-major like GLSL, no transpose needed
                UniformValue::Mat2(m) => self.uniform_matrix_2_f32_slice(loc, false, &m.to_cols_array()),
                UniformValue::Mat3(m) => self.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array()),
                UniformValue::Mat4(m) => self.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array()),
            }
        }
    }

    fn subroutine_index(&self, program: glow::Program, stage: ShaderStage, name: &str) -> Option<u32> {
        subroutine_index_raw(program.0.get(), stage, name)
    }

    fn set_subroutines(&self, stage: ShaderStage, indices: &[u32]) {
        if !set_subroutines_raw(stage, indices) {
            debug!("subroutine selection skipped, entry point not loaded");
        }
    }

    fn create_vertex_array(&self) -> Result<glow::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vao: Option<glow::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vao) }
    }

    fn delete_vertex_array(&self, vao: glow::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vao) }
    }

    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn upload_vertex_buffer(&self, buffer: glow::Buffer, data: &[u8]) {
        unsafe {
            self.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn upload_index_buffer(&self, buffer: glow::Buffer, data: &[u8]) {
        // Stays bound: the element buffer binding is recorded in the VAO.
        unsafe {
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, data, glow::STATIC_DRAW);
        }
    }

    fn unbind_vertex_buffer(&self) {
        unsafe { self.bind_buffer(glow::ARRAY_BUFFER, None) }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn vertex_attribute(&self, attribute: VertexAttribute) {
        unsafe {
            self.enable_vertex_attrib_array(attribute.location);
            self.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                attribute.stride,
                attribute.offset,
            );
        }
    }

    fn draw_indexed_triangles(&self, index_count: usize) {
        unsafe { self.draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0) }
    }

    fn viewport(&self, width: u32, height: u32) {
        unsafe { HasContext::viewport(self, 0, 0, width as i32, height as i32) }
    }

    fn clear(&self, color: [f32; 4], depth: bool) {
        let [r, g, b, a] = color;
        unsafe {
            self.clear_color(r, g, b, a);
            let mut mask = glow::COLOR_BUFFER_BIT;
            if depth {
                self.clear_depth_f32(1.0);
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            HasContext::clear(self, mask);
        }
    }

    fn set_depth_test(&self, enabled: bool) {
        unsafe {
            if enabled {
                self.enable(glow::DEPTH_TEST);
            } else {
                self.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn set_polygon_mode(&self, mode: PolygonMode) {
        let mode = match mode {
            PolygonMode::Fill => glow::FILL,
            PolygonMode::Line => glow::LINE,
        };
        unsafe { self.polygon_mode(glow::FRONT_AND_BACK, mode) }
    }
}
