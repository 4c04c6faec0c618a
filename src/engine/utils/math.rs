use glam::{Mat3, Mat4, Vec3};
use log::warn;

/// Right-handed projection with OpenGL's [-1, 1] depth range.
pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect_ratio, near, far)
}

pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Unit view direction for the given Euler angles in degrees. Yaw -90°
/// looks down -Z.
pub fn direction_from_euler(pitch_degrees: f32, yaw_degrees: f32) -> Vec3 {
    let (sp, cp) = pitch_degrees.to_radians().sin_cos();
    let (sy, cy) = yaw_degrees.to_radians().sin_cos();
    Vec3::new(cy * cp, sp, sy * cp).normalize()
}

/// Inverse-transpose of the upper 3x3 of `matrix`. A singular block has no
/// inverse, so identity is returned instead.
pub fn normal_matrix(matrix: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(matrix);
    let det = linear.determinant();
    if !det.is_finite() || det.abs() < f32::EPSILON {
        warn!("normal matrix of a singular transform, using identity");
        return Mat3::IDENTITY;
    }
    linear.inverse().transpose()
}
