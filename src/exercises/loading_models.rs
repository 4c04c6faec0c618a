use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::engine::components::model::Model;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::ExerciseConfig;
use crate::engine::gpu::{Gpu, PolygonMode};
use crate::engine::managers::assets_manager::AssetsManager;
use crate::engine::systems::keyboard_input_system::InputState;
use crate::engine::systems::window_system::{Exercise, Frame};
use crate::engine::utils::math::{look_at, perspective};

const ORBIT_RADIUS: f32 = 20.0;
/// Degrees per second around X.
const TUMBLE_SPEED: f32 = 0.6;

/// A wireframe model seen by a camera orbiting the origin.
pub struct LoadingModels<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    shader: ShaderProgram<G>,
    model: Model<G>,
    model_matrix: Mat4,
}

impl<G: Gpu> LoadingModels<G> {
    /// Eye position on the orbit at `time` seconds.
    pub fn orbit_eye(time: f32) -> Vec3 {
        Vec3::new(ORBIT_RADIUS * time.sin(), 0.0, ORBIT_RADIUS * time.cos())
    }
}

impl<G: Gpu> Exercise<G> for LoadingModels<G> {
    const TITLE: &'static str = "Model Loading";

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self> {
        let assets = AssetsManager::new(&config.assets, config.gl);
        let shader = assets.shader(&gpu, "mvp.vert", "glow.frag", &[]);
        let model = assets.model(&gpu, "sphere.obj");

        gpu.set_depth_test(true);
        gpu.set_polygon_mode(PolygonMode::Line);

        shader.use_program();
        shader.set_mat4("u_proj", perspective(45.0, config.window.aspect_ratio(), 0.1, 100.0));

        Ok(Self {
            gpu,
            shader,
            model,
            model_matrix: Mat4::from_rotation_y(45f32.to_radians()),
        })
    }

    fn update(&mut self, _input: &mut InputState, frame: &Frame) {
        self.model_matrix *= Mat4::from_rotation_x((TUMBLE_SPEED * frame.delta_time).to_radians());
    }

    fn render(&mut self, frame: &Frame) {
        self.gpu.clear([0.2, 0.3, 0.3, 1.0], true);

        self.shader.use_program();
        self.shader.set_float("u_time", frame.time);
        self.shader.set_mat4("u_model", self.model_matrix);
        self.shader.set_mat4("u_view", look_at(Self::orbit_eye(frame.time), Vec3::ZERO, Vec3::Y));
        self.model.draw();
    }
}
