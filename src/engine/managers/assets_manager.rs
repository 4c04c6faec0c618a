use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::warn;

use crate::engine::components::model::Model;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::gpu::Gpu;
use crate::engine::utils::glsl::GlVersion;

/// Resolves asset names against one root directory laid out as
/// `shaders/` and `models/`, and builds programs and models from them.
#[derive(Debug, Clone)]
pub struct AssetsManager {
    root: PathBuf,
    version: GlVersion,
}

impl AssetsManager {
    pub fn new(root: impl Into<PathBuf>, version: GlVersion) -> Self {
        let root = root.into();
        if !root.is_dir() {
            warn!("⚠️  asset directory {} does not exist", root.display());
        }
        Self { root, version }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shader_path(&self, name: &str) -> PathBuf {
        self.root.join("shaders").join(name)
    }

    pub fn model_path(&self, name: &str) -> PathBuf {
        self.root.join("models").join(name)
    }

    /// Builds a program from `shaders/<vertex>` and `shaders/<fragment>`,
    /// prepending the named utility snippets in order.
    pub fn shader<G: Gpu>(&self, gpu: &Rc<G>, vertex: &str, fragment: &str, utils: &[&str]) -> ShaderProgram<G> {
        let util_paths: Vec<PathBuf> = utils.iter().map(|u| self.shader_path(u)).collect();
        ShaderProgram::from_files(
            gpu.clone(),
            self.shader_path(vertex),
            self.shader_path(fragment),
            &util_paths,
            self.version,
        )
    }

    pub fn model<G: Gpu>(&self, gpu: &Rc<G>, name: &str) -> Model<G> {
        Model::load(gpu.clone(), self.model_path(name))
    }
}
