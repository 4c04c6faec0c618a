use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::engine::components::model::Model;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::ExerciseConfig;
use crate::engine::gpu::{Gpu, PolygonMode};
use crate::engine::managers::assets_manager::AssetsManager;
use crate::engine::systems::keyboard_input_system::InputState;
use crate::engine::systems::window_system::{Exercise, Frame};
use crate::engine::utils::math::{look_at, normal_matrix, perspective};

/// Parameters of the noise displacement in `deform.vert`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformParams {
    pub weight: f32,
    /// Multiplies the elapsed time fed to the shader.
    pub speed: f32,
    pub frequency: f32,
    pub power: f32,
    pub harmonics: f32,
    pub color: Vec3,
}

impl Default for DeformParams {
    fn default() -> Self {
        Self {
            weight: 0.2,
            speed: 5.0,
            frequency: 10.0,
            power: 1.0,
            harmonics: 4.0,
            color: Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

struct Placed<G: Gpu> {
    model: Model<G>,
    matrix: Mat4,
}

/// Three models displaced by noise in the vertex shader, optionally
/// spinning around Y.
pub struct BasicDeformations<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    shader: ShaderProgram<G>,
    objects: Vec<Placed<G>>,
    params: DeformParams,
    view: Mat4,
    projection: Mat4,
    spin_speed: f32,
    wireframe: bool,
}

impl<G: Gpu> Exercise<G> for BasicDeformations<G> {
    const TITLE: &'static str = "Basic Deformations";

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self> {
        let assets = AssetsManager::new(&config.assets, config.gl);
        let shader = assets.shader(&gpu, "deform.vert", "noise.frag", &[]);

        let place = |name: &str, offset: Vec3, scale: f32| Placed {
            model: assets.model(&gpu, name),
            matrix: Mat4::from_translation(offset) * Mat4::from_scale(Vec3::splat(scale)),
        };
        let objects = vec![
            place("cube.obj", Vec3::ZERO, 0.8),
            place("sphere.obj", Vec3::new(-3.0, 0.0, 0.0), 0.8),
            place("bunny_lp.obj", Vec3::new(3.0, 0.0, 0.0), 0.3),
        ];

        gpu.set_depth_test(true);

        Ok(Self {
            gpu,
            shader,
            objects,
            params: DeformParams::default(),
            view: look_at(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, Vec3::Y),
            projection: perspective(45.0, config.window.aspect_ratio(), 0.1, 100.0),
            spin_speed: config.scene.spin_speed,
            wireframe: false,
        })
    }

    fn update(&mut self, input: &mut InputState, frame: &Frame) {
        self.wireframe = input.wireframe;
        if input.spinning {
            let step = Mat4::from_rotation_y((frame.delta_time * self.spin_speed).to_radians());
            for object in &mut self.objects {
                object.matrix *= step;
            }
        }
    }

    fn render(&mut self, frame: &Frame) {
        self.gpu.clear([0.26, 0.46, 0.98, 1.0], true);
        self.gpu.set_polygon_mode(if self.wireframe { PolygonMode::Line } else { PolygonMode::Fill });

        let shader = &self.shader;
        let params = &self.params;
        shader.use_program();
        shader.set_mat4("u_proj", self.projection);
        shader.set_mat4("u_view", self.view);
        shader.set_vec3("u_color_in", params.color);
        shader.set_float("u_weight", params.weight);
        shader.set_float("u_time", frame.time * params.speed);
        shader.set_float("u_freq", params.frequency);
        shader.set_float("u_power", params.power);
        shader.set_float("u_harmonics", params.harmonics);

        for object in &self.objects {
            shader.set_mat4("u_model", object.matrix);
            shader.set_mat3("u_norm", normal_matrix(self.view * object.matrix));
            object.model.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gpu::recording::{Call, RecordingGpu};
    use crate::engine::gpu::UniformValue;
    use crate::exercises::testing;
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    #[test]
    fn missing_bunny_does_not_stop_the_scene() {
        let gpu = Rc::new(RecordingGpu::new());
        let mut exercise = BasicDeformations::setup(gpu.clone(), &testing::config()).unwrap();
        assert!(!exercise.objects[0].model.is_empty());
        assert!(!exercise.objects[1].model.is_empty());

        exercise.render(&testing::frame(1.0, 0.016));
        assert_eq!(gpu.uniform("u_time"), Some(UniformValue::Float(5.0)));
        assert_eq!(gpu.uniform("u_harmonics"), Some(UniformValue::Float(4.0)));
        assert!(gpu.uniform("u_norm").is_some());
    }

    #[test]
    fn spinning_rotates_and_wireframe_follows_input() {
        let gpu = Rc::new(RecordingGpu::new());
        let mut exercise = BasicDeformations::setup(gpu.clone(), &testing::config()).unwrap();
        let before = exercise.objects[0].matrix;

        let mut input = InputState::new();
        exercise.update(&mut input, &testing::frame(1.0, 1.0));
        assert!(!exercise.objects[0].matrix.abs_diff_eq(before, 1e-4));

        input.receive_key(KeyCode::KeyP, ElementState::Pressed, false);
        input.receive_key(KeyCode::KeyL, ElementState::Pressed, false);
        let spun = exercise.objects[0].matrix;
        exercise.update(&mut input, &testing::frame(2.0, 1.0));
        assert_eq!(exercise.objects[0].matrix, spun);

        exercise.render(&testing::frame(2.0, 1.0));
        assert!(gpu.calls().contains(&Call::PolygonMode(PolygonMode::Line)));
    }
}
