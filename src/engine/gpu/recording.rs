//! In-memory [`Gpu`] used by the unit tests.
//!
//! Handles are plain integers. Every created object is tracked so tests can
//! assert that it was deleted exactly once.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use super::{Gpu, PolygonMode, ShaderStage, UniformValue, VertexAttribute};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    UseProgram(Option<u32>),
    BindVertexArray(Option<u32>),
    VertexAttribute(VertexAttribute),
    DrawIndexed(usize),
    Subroutines(ShaderStage, Vec<u32>),
    PolygonMode(PolygonMode),
}

#[derive(Default)]
pub struct RecordingGpu {
    next_handle: Cell<u32>,
    live: RefCell<HashSet<u32>>,
    deleted: RefCell<Vec<u32>>,
    shader_sources: RefCell<HashMap<u32, String>>,
    failed_shaders: RefCell<HashSet<u32>>,
    failing_stage: Cell<Option<ShaderStage>>,
    fail_link: Cell<bool>,
    // None means every name resolves
    known_uniforms: RefCell<Option<HashSet<String>>>,
    subroutines: RefCell<Vec<String>>,
    uniforms: RefCell<Vec<(String, UniformValue)>>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingGpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the given uniform names resolve to a location.
    pub fn with_uniforms(names: &[&str]) -> Self {
        let gpu = Self::default();
        *gpu.known_uniforms.borrow_mut() = Some(names.iter().map(|n| n.to_string()).collect());
        gpu
    }

    pub fn fail_compile(&self, stage: ShaderStage) {
        self.failing_stage.set(Some(stage));
    }

    pub fn fail_link(&self) {
        self.fail_link.set(true);
    }

    pub fn with_subroutines(self, names: &[&str]) -> Self {
        *self.subroutines.borrow_mut() = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn allocate(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn free(&self, handle: u32) {
        assert!(self.live.borrow_mut().remove(&handle), "handle {handle} deleted twice or never created");
        self.deleted.borrow_mut().push(handle);
    }

    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn deleted(&self) -> Vec<u32> {
        self.deleted.borrow().clone()
    }

    pub fn shader_sources(&self) -> Vec<String> {
        let sources = self.shader_sources.borrow();
        let mut handles: Vec<_> = sources.keys().copied().collect();
        handles.sort_unstable();
        handles.iter().map(|h| sources[h].clone()).collect()
    }

    pub fn uniforms(&self) -> Vec<(String, UniformValue)> {
        self.uniforms.borrow().clone()
    }

    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.borrow().iter().rev().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Gpu for RecordingGpu {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage, source: &str) -> Result<u32, String> {
        let handle = self.allocate();
        self.shader_sources.borrow_mut().insert(handle, source.to_string());
        if self.failing_stage.get() == Some(stage) {
            self.failed_shaders.borrow_mut().insert(handle);
        }
        Ok(handle)
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        !self.failed_shaders.borrow().contains(&shader)
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1(1): error: syntax error".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.free(shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.allocate())
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, _program: u32) {}

    fn program_link_status(&self, _program: u32) -> bool {
        !self.fail_link.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: unresolved symbol".to_string()
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.free(program);
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        match &*self.known_uniforms.borrow() {
            Some(known) if !known.contains(name) => None,
            _ => Some(name.to_string()),
        }
    }

    fn set_uniform(&self, location: &String, value: UniformValue) {
        self.uniforms.borrow_mut().push((location.clone(), value));
    }

    fn subroutine_index(&self, _program: u32, _stage: ShaderStage, name: &str) -> Option<u32> {
        self.subroutines.borrow().iter().position(|s| s == name).map(|i| i as u32)
    }

    fn set_subroutines(&self, stage: ShaderStage, indices: &[u32]) {
        self.record(Call::Subroutines(stage, indices.to_vec()));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        Ok(self.allocate())
    }

    fn bind_vertex_array(&self, vao: Option<u32>) {
        self.record(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&self, vao: u32) {
        self.free(vao);
    }

    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.allocate())
    }

    fn upload_vertex_buffer(&self, _buffer: u32, _data: &[u8]) {}

    fn upload_index_buffer(&self, _buffer: u32, _data: &[u8]) {}

    fn unbind_vertex_buffer(&self) {}

    fn delete_buffer(&self, buffer: u32) {
        self.free(buffer);
    }

    fn vertex_attribute(&self, attribute: VertexAttribute) {
        self.record(Call::VertexAttribute(attribute));
    }

    fn draw_indexed_triangles(&self, index_count: usize) {
        self.record(Call::DrawIndexed(index_count));
    }

    fn viewport(&self, _width: u32, _height: u32) {}

    fn clear(&self, _color: [f32; 4], _depth: bool) {}

    fn set_depth_test(&self, _enabled: bool) {}

    fn set_polygon_mode(&self, mode: PolygonMode) {
        self.record(Call::PolygonMode(mode));
    }
}
