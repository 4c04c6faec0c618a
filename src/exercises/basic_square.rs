use std::rc::Rc;

use crate::engine::components::mesh::Mesh;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::ExerciseConfig;
use crate::engine::gpu::Gpu;
use crate::engine::managers::assets_manager::AssetsManager;
use crate::engine::systems::window_system::{Exercise, Frame};

const POSITIONS: [[f32; 3]; 4] = [
    [0.5, 0.5, 0.0],   // top right
    [0.5, -0.5, 0.0],  // bottom right
    [-0.5, -0.5, 0.0], // bottom left
    [-0.5, 0.5, 0.0],  // top left
];
const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// Two indexed triangles forming a flat orange square.
pub struct BasicSquare<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    shader: ShaderProgram<G>,
    square: Mesh<G>,
}

impl<G: Gpu> Exercise<G> for BasicSquare<G> {
    const TITLE: &'static str = "Basic Square";

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self> {
        let assets = AssetsManager::new(&config.assets, config.gl);
        let shader = assets.shader(&gpu, "position.vert", "flat.frag", &[]);
        let square = Mesh::from_positions(gpu.clone(), &POSITIONS, INDICES.to_vec());
        Ok(Self { gpu, shader, square })
    }

    fn render(&mut self, _frame: &Frame) {
        self.gpu.clear([0.2, 0.3, 0.3, 1.0], false);
        self.shader.use_program();
        self.square.draw();
    }
}
