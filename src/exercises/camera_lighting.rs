use std::rc::Rc;

use glam::{Mat4, Vec3};
use log::info;
use winit::keyboard::KeyCode;

use crate::engine::components::camera::{Camera, CameraMovement};
use crate::engine::components::light::{Light, LightAttributes, LightKind, LightResponse};
use crate::engine::components::model::Model;
use crate::engine::components::object::Object;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::config::ExerciseConfig;
use crate::engine::gpu::{Gpu, PolygonMode, ShaderStage};
use crate::engine::managers::assets_manager::AssetsManager;
use crate::engine::systems::keyboard_input_system::InputState;
use crate::engine::systems::window_system::{Exercise, Frame};
use crate::engine::utils::math::perspective;

const PLANE_SUBROUTINE: &str = "Lambert";

/// Surface parameters shared by every lit object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub ambient: Vec3,
    pub kd: f32,
    pub ks: f32,
    pub ka: f32,
    pub shininess: f32,
    /// GGX roughness.
    pub alpha: f32,
    /// Fresnel reflectance at normal incidence.
    pub f0: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3::new(1.0, 0.0, 0.0),
            specular: Vec3::ONE,
            ambient: Vec3::splat(0.1),
            kd: 0.5,
            ks: 0.4,
            ka: 0.1,
            shininess: 25.0,
            alpha: 0.2,
            f0: 0.9,
        }
    }
}

impl Material {
    fn apply<G: Gpu>(&self, shader: &ShaderProgram<G>) {
        shader.set_vec3("diffuseColor", self.diffuse);
        shader.set_vec3("specularColor", self.specular);
        shader.set_vec3("ambientColor", self.ambient);
        shader.set_float("Kd", self.kd);
        shader.set_float("Ks", self.ks);
        shader.set_float("Ka", self.ka);
        shader.set_float("shininess", self.shininess);
        shader.set_float("alpha", self.alpha);
        shader.set_float("F0", self.f0);
    }
}

/// Lit scene with switchable illumination models, an FPS camera, a movable
/// point light, a directional fill light and a camera-mounted spot light.
pub struct CameraLighting<G: Gpu = glow::Context> {
    gpu: Rc<G>,
    shader: ShaderProgram<G>,
    plane: Model<G>,
    sphere: Model<G>,
    cube: Model<G>,
    bunny: Model<G>,
    camera: Camera,
    projection: Mat4,
    material: Material,
    plane_material: Material,
    point_light: Light,
    fill_light: Light,
    spot_light: Light,
    spot_enabled: bool,
    subroutines: Vec<String>,
    current_subroutine: usize,
    orientation_y: f32,
    spin_speed: f32,
    light_speed: f32,
    wireframe: bool,
}

impl<G: Gpu> CameraLighting<G> {
    pub fn current_subroutine(&self) -> Option<&str> {
        self.subroutines.get(self.current_subroutine).map(String::as_str)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn move_light(&mut self, input: &InputState, delta_time: f32) {
        let Light {
            kind: LightKind::Point { position },
            ..
        } = &mut self.point_light
        else {
            return;
        };
        let step = self.light_speed * delta_time;
        if input.is_pressed(KeyCode::ArrowLeft) {
            position.x -= step;
        }
        if input.is_pressed(KeyCode::ArrowRight) {
            position.x += step;
        }
        if input.is_pressed(KeyCode::ArrowUp) {
            position.z -= step;
        }
        if input.is_pressed(KeyCode::ArrowDown) {
            position.z += step;
        }
    }

    fn select(&self, name: &str) {
        self.shader.select_subroutine(ShaderStage::Fragment, name);
    }
}

impl<G: Gpu> Exercise<G> for CameraLighting<G> {
    const TITLE: &'static str = "Camera & Lighting";
    const CAPTURE_CURSOR: bool = true;

    fn setup(gpu: Rc<G>, config: &ExerciseConfig) -> anyhow::Result<Self> {
        let assets = AssetsManager::new(&config.assets, config.gl);
        let utils = ["types.utils", "constants.utils"];
        let shader = assets.shader(&gpu, "procedural_base.vert", "lighting.frag", &utils);

        let subroutines = shader.subroutine_names(ShaderStage::Fragment).to_vec();
        info!("🎨 illumination models: {}", subroutines.join(", "));
        if let Some(first) = subroutines.first() {
            info!("current subroutine: {first}");
        }

        let mut camera = Camera::new([0.0, 0.0, 7.0], true);
        camera.movement_speed = config.scene.camera_speed;
        camera.mouse_sensitivity = config.scene.mouse_sensitivity;

        let point_light = Light::point(
            [5.0, 10.0, 10.0],
            LightAttributes {
                ambient: Vec3::ONE,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                response: LightResponse::Attenuation {
                    constant: 1.0,
                    linear: 0.007,
                    quadratic: 0.0002,
                },
            },
        );
        let fill_light = Light::directional(
            [-0.3, -1.0, -0.2],
            LightAttributes {
                ambient: Vec3::ZERO,
                diffuse: Vec3::new(0.6, 0.7, 1.0),
                specular: Vec3::new(0.6, 0.7, 1.0),
                response: LightResponse::Weighted { ka: 0.0, kd: 0.25, ks: 0.1 },
            },
        );
        let spot_light = Light::spot(
            camera.position(),
            camera.front(),
            12.5f32.to_radians().cos(),
            LightAttributes {
                ambient: Vec3::ZERO,
                diffuse: Vec3::ONE,
                specular: Vec3::ONE,
                response: LightResponse::Attenuation {
                    constant: 1.0,
                    linear: 0.09,
                    quadratic: 0.032,
                },
            },
        );

        gpu.set_depth_test(true);

        Ok(Self {
            plane: assets.model(&gpu, "plane.obj"),
            sphere: assets.model(&gpu, "sphere.obj"),
            cube: assets.model(&gpu, "cube.obj"),
            bunny: assets.model(&gpu, "bunny_lp.obj"),
            gpu,
            shader,
            camera,
            projection: perspective(45.0, config.window.aspect_ratio(), 0.1, 10000.0),
            material: Material::default(),
            plane_material: Material {
                diffuse: Vec3::new(0.0, 0.5, 0.0),
                ..Material::default()
            },
            point_light,
            fill_light,
            spot_light,
            spot_enabled: false,
            subroutines,
            current_subroutine: 0,
            orientation_y: 0.0,
            spin_speed: config.scene.spin_speed,
            light_speed: config.scene.light_speed,
            wireframe: false,
        })
    }

    fn update(&mut self, input: &mut InputState, frame: &Frame) {
        self.wireframe = input.wireframe;
        self.spot_enabled = input.spot_light;

        if let Some(index) = input.take_subroutine(self.subroutines.len()) {
            self.current_subroutine = index;
            info!("current subroutine: {}", self.subroutines[index]);
        }

        let dt = frame.delta_time;
        for (key, movement) in [
            (KeyCode::KeyW, CameraMovement::Forward),
            (KeyCode::KeyS, CameraMovement::Backward),
            (KeyCode::KeyA, CameraMovement::Left),
            (KeyCode::KeyD, CameraMovement::Right),
        ] {
            if input.is_pressed(key) {
                self.camera.process_keyboard(movement, dt);
            }
        }
        let (dx, dy) = input.take_mouse_delta();
        if dx != 0.0 || dy != 0.0 {
            self.camera.process_mouse_movement(dx, dy);
        }

        self.move_light(input, dt);
        self.spot_light = Light::spot(
            self.camera.position(),
            self.camera.front(),
            12.5f32.to_radians().cos(),
            self.spot_light.attributes,
        );

        if input.spinning {
            self.orientation_y += dt * self.spin_speed;
        }
    }

    fn render(&mut self, _frame: &Frame) {
        self.gpu.clear([0.26, 0.46, 0.98, 1.0], true);
        self.gpu.set_polygon_mode(if self.wireframe { PolygonMode::Line } else { PolygonMode::Fill });

        let view = self.camera.view_matrix();
        let shader = &self.shader;
        shader.use_program();
        shader.set_mat4("projectionMatrix", self.projection);
        shader.set_mat4("viewMatrix", view);
        self.point_light.setup(shader, 0);
        self.fill_light.setup(shader, 0);
        self.spot_light.setup(shader, 0);
        shader.set_bool("spotLightEnabled", self.spot_enabled);

        // plane
        self.select(PLANE_SUBROUTINE);
        self.plane_material.apply(shader);
        Object::new(&self.plane)
            .translate([0.0, -1.0, 0.0])
            .scale([10.0, 1.0, 10.0])
            .draw(shader, view);

        // objects
        if let Some(name) = self.current_subroutine() {
            self.select(name);
        }
        self.material.apply(shader);

        let spin = self.orientation_y;
        Object::new(&self.sphere)
            .translate([-3.0, 0.0, 0.0])
            .rotate_deg(spin, Vec3::Y)
            .scale(Vec3::splat(0.8))
            .draw(shader, view);
        Object::new(&self.cube)
            .rotate(spin.to_radians(), Vec3::Y)
            .scale(Vec3::splat(0.8))
            .draw(shader, view);
        Object::new(&self.bunny)
            .translate([3.0, 0.0, 0.0])
            .rotate(spin.to_radians(), Vec3::Y)
            .scale(Vec3::splat(0.3))
            .draw(shader, view);
    }
}
