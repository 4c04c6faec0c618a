use glam::{Mat4, Vec3};

use crate::engine::utils::math::{direction_from_euler, look_at};

const PITCH_LIMIT: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person camera driven by Euler angles in degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    // walking keeps the height constant
    on_ground: bool,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: impl Into<Vec3>, on_ground: bool) -> Self {
        let mut camera = Self {
            position: position.into(),
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            on_ground,
            movement_speed: 3.0,
            mouse_sensitivity: 0.05,
        };
        camera.update_basis();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.front, self.up)
    }

    /// Moves along the view basis, flattened to the ground plane when the
    /// camera walks.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let (forward, right) = self.basis_vectors();
        let step = match direction {
            CameraMovement::Forward => forward,
            CameraMovement::Backward => -forward,
            CameraMovement::Left => -right,
            CameraMovement::Right => right,
        };
        self.position += step * velocity;
    }

    /// Mouse offsets in pixels; positive `y_offset` looks up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_basis();
    }

    /// Forward and right directions used for movement.
    pub fn basis_vectors(&self) -> (Vec3, Vec3) {
        if self.on_ground {
            let forward = Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero();
            (forward, self.right)
        } else {
            (self.front, self.right)
        }
    }

    fn update_basis(&mut self) {
        self.front = direction_from_euler(self.pitch, self.yaw);
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}
