use std::rc::Rc;

use crate::engine::components::mesh::Mesh;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::ExerciseConfig;
use crate::engine::gpu::{Gpu, PolygonMode};
use crate::engine::managers::assets_manager::AssetsManager;
use crate::engine::systems::window_system::{Exercise, Frame};

const HULL: [[f32; 3]; 9] = [
    [0.0, 0.8, 0.0],
    [0.2, 0.0, 0.0],
    [0.5, 0.2, 0.0],
    [0.2, -0.3, 0.0],
    [0.1, -0.1, 0.0],
    [-0.1, -0.1, 0.0],
    [-0.2, -0.3, 0.0],
    [-0.5, 0.2, 0.0],
    [-0.2, 0.0, 0.0],
];

#[rustfmt::skip]
const HULL_INDICES: [u32; 21] = [
    0, 1, 4,
    0, 4, 5,
    0, 5, 8,
    1, 2, 3,
    1, 3, 4,
    5, 6, 8,
    6, 7, 8,
];

/// Wireframe starship whose colour pulses with `u_time`.
pub struct GlowingStarship<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    shader: ShaderProgram<G>,
    ship: Mesh<G>,
}

impl<G: Gpu> Exercise<G> for GlowingStarship<G> {
    const TITLE: &'static str = "Starship";

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self> {
        let assets = AssetsManager::new(&config.assets, config.gl);
        let shader = assets.shader(&gpu, "position.vert", "glow.frag", &[]);
        let ship = Mesh::from_positions(gpu.clone(), &HULL, HULL_INDICES.to_vec());
        gpu.set_polygon_mode(PolygonMode::Line);
        Ok(Self { gpu, shader, ship })
    }

    fn render(&mut self, frame: &Frame) {
        self.gpu.clear([0.0, 0.0, 0.0, 1.0], false);
        self.shader.use_program();
        self.shader.set_float("u_time", frame.time);
        self.ship.draw();
    }
}
