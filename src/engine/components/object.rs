use glam::{Mat3, Mat4, Vec3};

use crate::engine::components::model::Model;
use crate::engine::components::shader::ShaderProgram;
use crate::engine::gpu::Gpu;
use crate::engine::utils::math::normal_matrix;

/// A model placed in the world for one draw.
///
/// Transform calls accumulate until [`Object::draw`], which consumes them:
/// afterwards the transform is identity again, so a frame rebuilds each
/// placement from scratch.
pub struct Object<'m, G: Gpu = glow::Context> {
    model: &'m Model<G>,
    transform: Mat4,
    normal_matrix: Mat3,
}

impl<'m, G: Gpu> Object<'m, G> {
    pub fn new(model: &'m Model<G>) -> Self {
        Self::with_transform(model, Mat4::IDENTITY)
    }

    pub fn with_transform(model: &'m Model<G>, transform: Mat4) -> Self {
        Self {
            model,
            transform,
            normal_matrix: Mat3::IDENTITY,
        }
    }

    pub fn model(&self) -> &'m Model<G> {
        self.model
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn normal_matrix(&self) -> Mat3 {
        self.normal_matrix
    }

    pub fn scale(&mut self, factors: impl Into<Vec3>) -> &mut Self {
        self.transform *= Mat4::from_scale(factors.into());
        self
    }

    pub fn translate(&mut self, offset: impl Into<Vec3>) -> &mut Self {
        self.transform *= Mat4::from_translation(offset.into());
        self
    }

    /// `axis` need not be normalized.
    pub fn rotate(&mut self, angle_rad: f32, axis: impl Into<Vec3>) -> &mut Self {
        let axis = axis.into().normalize_or_zero();
        if axis != Vec3::ZERO {
            self.transform *= Mat4::from_axis_angle(axis, angle_rad);
        }
        self
    }

    pub fn rotate_deg(&mut self, angle_deg: f32, axis: impl Into<Vec3>) -> &mut Self {
        self.rotate(angle_deg.to_radians(), axis)
    }

    pub fn compute_normal_matrix(&mut self, view_projection: Mat4) -> Mat3 {
        self.normal_matrix = normal_matrix(view_projection * self.transform);
        self.normal_matrix
    }

    /// Binds `shader`, pushes `modelMatrix` and `normalMatrix`, draws the
    /// model and resets both matrices to identity.
    pub fn draw(&mut self, shader: &ShaderProgram<G>, view_projection: Mat4) {
        shader.use_program();
        self.compute_normal_matrix(view_projection);
        shader.set_mat4("modelMatrix", self.transform);
        shader.set_mat3("normalMatrix", self.normal_matrix);
        self.model.draw();

        self.transform = Mat4::IDENTITY;
        self.normal_matrix = Mat3::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::components::mesh::Mesh;
    use crate::engine::gpu::recording::{Call, RecordingGpu};
    use crate::engine::gpu::UniformValue;
    use crate::engine::utils::glsl::GlVersion;
    use std::rc::Rc;

    fn fixtures() -> (Rc<RecordingGpu>, Model<RecordingGpu>, ShaderProgram<RecordingGpu>) {
        let gpu = Rc::new(RecordingGpu::new());
        let mesh = Mesh::from_positions(gpu.clone(), &[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![0, 1, 2]);
        let model = Model::from_meshes(vec![mesh]);
        let shader = ShaderProgram::from_sources(gpu.clone(), "void main() {}", "void main() {}", &[], GlVersion::default());
        (gpu, model, shader)
    }

    #[test]
    fn normal_matrix_ignores_translation() {
        let (_gpu, model, _shader) = fixtures();
        let mut object = Object::new(&model);
        object.translate([3.0, 0.0, 0.0]).scale(Vec3::splat(0.5));
        let normal = object.compute_normal_matrix(Mat4::IDENTITY);
        assert!(normal.abs_diff_eq(Mat3::from_diagonal(Vec3::splat(2.0)), 1e-5));
        assert_eq!(object.transform().w_axis.truncate(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn transforms_compose_by_right_multiplication() {
        let (_gpu, model, _shader) = fixtures();
        let mut object = Object::new(&model);
        object.translate([1.0, 0.0, 0.0]).rotate_deg(90.0, Vec3::Z);
        let moved = object.transform().transform_point3(Vec3::X);
        assert!(moved.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn draw_pushes_matrices_then_resets() {
        let (gpu, model, shader) = fixtures();
        let mut object = Object::new(&model);
        object.translate([0.0, -1.0, 0.0]).scale([10.0, 1.0, 10.0]);
        let expected = object.transform();

        object.draw(&shader, Mat4::IDENTITY);

        assert_eq!(gpu.uniform("modelMatrix"), Some(UniformValue::Mat4(expected)));
        assert!(matches!(gpu.uniform("normalMatrix"), Some(UniformValue::Mat3(_))));
        assert!(gpu.calls().contains(&Call::UseProgram(shader.handle())));
        assert!(gpu.calls().contains(&Call::DrawIndexed(3)));
        assert_eq!(object.transform(), Mat4::IDENTITY);
        assert_eq!(object.normal_matrix(), Mat3::IDENTITY);

        object.draw(&shader, Mat4::IDENTITY);
        assert_eq!(gpu.uniform("modelMatrix"), Some(UniformValue::Mat4(Mat4::IDENTITY)));
    }

    #[test]
    fn singular_transform_falls_back_to_identity() {
        let (_gpu, model, _shader) = fixtures();
        let mut object = Object::new(&model);
        object.scale([1.0, 0.0, 1.0]);
        assert_eq!(object.compute_normal_matrix(Mat4::IDENTITY), Mat3::IDENTITY);
    }
}
