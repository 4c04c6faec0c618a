use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use log::{debug, error, info, trace, warn};

use crate::engine::gpu::{Gpu, ShaderStage, UniformValue};
use crate::engine::utils::glsl::{assemble_source, subroutine_names, GlVersion};

/// A linked vertex + fragment program.
///
/// Compile and link failures are logged and leave a program that can still
/// be bound and fed uniforms; it simply renders garbage or nothing.
pub struct ShaderProgram<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    program: Option<G::Program>,
    version: GlVersion,
    linked: bool,
    subroutines: HashMap<ShaderStage, Vec<String>>,
}

impl<G: Gpu> ShaderProgram<G> {
    /// Reads the stage sources and utility snippets from disk and builds the
    /// program. Unreadable files are logged and compiled as empty text.
    pub fn from_files(
        gpu: Rc<G>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        util_paths: &[impl AsRef<Path>],
        version: GlVersion,
    ) -> Self {
        let vertex = load_source(vertex_path.as_ref());
        let fragment = load_source(fragment_path.as_ref());
        let utils: Vec<String> = util_paths.iter().map(|p| load_source(p.as_ref())).collect();
        Self::from_sources(gpu, &vertex, &fragment, &utils, version)
    }

    pub fn from_sources(
        gpu: Rc<G>,
        vertex_source: &str,
        fragment_source: &str,
        utils: &[String],
        version: GlVersion,
    ) -> Self {
        let vertex_unit = assemble_source(version, utils, vertex_source);
        let fragment_unit = assemble_source(version, utils, fragment_source);

        let subroutines = HashMap::from([
            (ShaderStage::Vertex, subroutine_names(&vertex_unit)),
            (ShaderStage::Fragment, subroutine_names(&fragment_unit)),
        ]);

        let vertex = compile_stage(&*gpu, ShaderStage::Vertex, &vertex_unit);
        let fragment = compile_stage(&*gpu, ShaderStage::Fragment, &fragment_unit);

        let (program, linked) = match gpu.create_program() {
            Ok(program) => {
                for shader in [vertex, fragment].into_iter().flatten() {
                    gpu.attach_shader(program, shader);
                }
                gpu.link_program(program);
                let linked = gpu.program_link_status(program);
                if linked {
                    debug!("shader program {program:?} linked");
                } else {
                    error!("shader program link failed:\n{}", gpu.program_info_log(program));
                }
                (Some(program), linked)
            }
            Err(e) => {
                error!("could not create shader program: {e}");
                (None, false)
            }
        };

        for shader in [vertex, fragment].into_iter().flatten() {
            gpu.delete_shader(shader);
        }

        Self {
            gpu,
            program,
            version,
            linked,
            subroutines,
        }
    }

    pub fn version(&self) -> GlVersion {
        self.version
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn handle(&self) -> Option<G::Program> {
        self.program
    }

    pub fn gpu(&self) -> &Rc<G> {
        &self.gpu
    }

    /// Binds the program as the active one.
    pub fn use_program(&self) {
        if let Some(program) = self.program {
            self.gpu.use_program(Some(program));
        }
    }

    /// Deletes the GPU program. Calling it again does nothing.
    pub fn release(&mut self) {
        if let Some(program) = self.program.take() {
            self.gpu.delete_program(program);
            debug!("shader program {program:?} released");
        }
    }

    /// Writes `value` to the uniform `name`. Names that do not resolve in the
    /// linked program are ignored.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) {
        let Some(program) = self.program else {
            return;
        };
        match self.gpu.uniform_location(program, name) {
            Some(location) => self.gpu.set_uniform(&location, value.into()),
            None => trace!("uniform `{name}` not found, skipped"),
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_uint(&self, name: &str, value: u32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec2(&self, name: &str, value: impl Into<Vec2>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_vec3(&self, name: &str, value: impl Into<Vec3>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_vec4(&self, name: &str, value: impl Into<Vec4>) {
        self.set_uniform(name, value.into());
    }

    pub fn set_mat2(&self, name: &str, value: Mat2) {
        self.set_uniform(name, value);
    }

    pub fn set_mat3(&self, name: &str, value: Mat3) {
        self.set_uniform(name, value);
    }

    pub fn set_mat4(&self, name: &str, value: Mat4) {
        self.set_uniform(name, value);
    }

    /// Subroutine implementations declared for `stage`, in source order.
    pub fn subroutine_names(&self, stage: ShaderStage) -> &[String] {
        self.subroutines.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Selects the subroutine implementation `name` for `stage`. The program
    /// must be bound; subroutine selection is not part of program state.
    pub fn select_subroutine(&self, stage: ShaderStage, name: &str) {
        let Some(program) = self.program else {
            return;
        };
        match self.gpu.subroutine_index(program, stage, name) {
            Some(index) => self.gpu.set_subroutines(stage, &[index]),
            None => warn!("{} subroutine `{name}` not found", stage.label()),
        }
    }
}

impl<G: Gpu> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.release();
    }
}

fn load_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(source) => {
            info!("📄 loaded shader source {}", path.display());
            source
        }
        Err(e) => {
            error!("could not read shader source {}: {e}", path.display());
            String::new()
        }
    }
}

fn compile_stage<G: Gpu>(gpu: &G, stage: ShaderStage, source: &str) -> Option<G::Shader> {
    trace!("compiling {} shader:\n{source}", stage.label());
    match gpu.create_shader(stage, source) {
        Ok(shader) => {
            if !gpu.shader_compile_status(shader) {
                error!("{} shader compilation failed:\n{}", stage.label(), gpu.shader_info_log(shader));
            }
            Some(shader)
        }
        Err(e) => {
            error!("could not create {} shader: {e}", stage.label());
            None
        }
    }
}
