use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::engine::components::shader::ShaderProgram;
use crate::engine::gpu::Gpu;

/// How a light's contribution is scaled in the shader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightResponse {
    /// Distance falloff `1 / (constant + linear d + quadratic d²)`.
    Attenuation { constant: f32, linear: f32, quadratic: f32 },
    /// Per-term weights of the ambient, diffuse and specular components.
    Weighted { ka: f32, kd: f32, ks: f32 },
}

impl Default for LightResponse {
    fn default() -> Self {
        LightResponse::Attenuation {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightAttributes {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub response: LightResponse,
}

impl Default for LightAttributes {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::ONE,
            specular: Vec3::ONE,
            response: LightResponse::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Point { position: Vec3 },
    Directional { direction: Vec3 },
    Spot { position: Vec3, direction: Vec3, cutoff_angle: f32 },
}

impl LightKind {
    /// Name of the uniform array the shader declares for this kind.
    pub fn array_name(&self) -> &'static str {
        match self {
            LightKind::Point { .. } => "pointLights",
            LightKind::Directional { .. } => "directionalLights",
            LightKind::Spot { .. } => "spotLights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub attributes: LightAttributes,
    pub kind: LightKind,
}

impl Light {
    pub fn point(position: impl Into<Vec3>, attributes: LightAttributes) -> Self {
        Self {
            attributes,
            kind: LightKind::Point {
                position: position.into(),
            },
        }
    }

    pub fn directional(direction: impl Into<Vec3>, attributes: LightAttributes) -> Self {
        Self {
            attributes,
            kind: LightKind::Directional {
                direction: direction.into(),
            },
        }
    }

    /// `cutoff_angle` is passed through untouched; the shader decides
    /// whether it is an angle or its cosine.
    pub fn spot(
        position: impl Into<Vec3>,
        direction: impl Into<Vec3>,
        cutoff_angle: f32,
        attributes: LightAttributes,
    ) -> Self {
        Self {
            attributes,
            kind: LightKind::Spot {
                position: position.into(),
                direction: direction.into(),
                cutoff_angle,
            },
        }
    }

    /// `pointLights[2].` and the like.
    pub fn prefix(&self, index: usize) -> String {
        format!("{}[{index}].", self.kind.array_name())
    }

    /// Writes this light into slot `index` of its uniform array. The index is
    /// not checked; slots the shader does not declare resolve to nothing.
    pub fn setup<G: Gpu>(&self, shader: &ShaderProgram<G>, index: usize) {
        let prefix = self.prefix(index);
        let field = |name: &str| format!("{prefix}{name}");

        let attrs = &self.attributes;
        shader.set_vec3(&field("diffuseColor"), attrs.diffuse);
        shader.set_vec3(&field("specularColor"), attrs.specular);
        shader.set_vec3(&field("ambientColor"), attrs.ambient);

        match attrs.response {
            LightResponse::Attenuation {
                constant,
                linear,
                quadratic,
            } => {
                shader.set_float(&field("constant"), constant);
                shader.set_float(&field("linear"), linear);
                shader.set_float(&field("quadratic"), quadratic);
            }
            LightResponse::Weighted { ka, kd, ks } => {
                shader.set_float(&field("Ka"), ka);
                shader.set_float(&field("Kd"), kd);
                shader.set_float(&field("Ks"), ks);
            }
        }

        match self.kind {
            LightKind::Point { position } => {
                shader.set_vec3(&field("position"), position);
            }
            LightKind::Directional { direction } => {
                shader.set_vec3(&field("direction"), direction);
            }
            LightKind::Spot {
                position,
                direction,
                cutoff_angle,
            } => {
                shader.set_vec3(&field("position"), position);
                shader.set_vec3(&field("direction"), direction);
                shader.set_float(&field("cutoffAngle"), cutoff_angle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gpu::recording::RecordingGpu;
    use crate::engine::gpu::UniformValue;
    use crate::engine::utils::glsl::GlVersion;
    use std::rc::Rc;

    fn shader(gpu: &Rc<RecordingGpu>) -> ShaderProgram<RecordingGpu> {
        ShaderProgram::from_sources(gpu.clone(), "void main() {}", "void main() {}", &[], GlVersion::default())
    }

    fn names(gpu: &RecordingGpu) -> Vec<String> {
        gpu.uniforms().into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn point_light_fields() {
        let gpu = Rc::new(RecordingGpu::new());
        let attrs = LightAttributes {
            response: LightResponse::Attenuation {
                constant: 1.0,
                linear: 0.09,
                quadratic: 0.032,
            },
            ..Default::default()
        };
        Light::point([5.0, 10.0, 10.0], attrs).setup(&shader(&gpu), 0);

        assert_eq!(
            names(&gpu),
            [
                "pointLights[0].diffuseColor",
                "pointLights[0].specularColor",
                "pointLights[0].ambientColor",
                "pointLights[0].constant",
                "pointLights[0].linear",
                "pointLights[0].quadratic",
                "pointLights[0].position",
            ]
        );
        assert_eq!(
            gpu.uniform("pointLights[0].position"),
            Some(UniformValue::Vec3(Vec3::new(5.0, 10.0, 10.0)))
        );
        assert_eq!(gpu.uniform("pointLights[0].linear"), Some(UniformValue::Float(0.09)));
    }

    #[test]
    fn weighted_response_uses_coefficient_names() {
        let gpu = Rc::new(RecordingGpu::new());
        let attrs = LightAttributes {
            response: LightResponse::Weighted { ka: 0.1, kd: 0.5, ks: 0.4 },
            ..Default::default()
        };
        Light::directional([0.0, -1.0, 0.0], attrs).setup(&shader(&gpu), 3);

        let names = names(&gpu);
        assert!(names.contains(&"directionalLights[3].Ka".to_string()));
        assert!(names.contains(&"directionalLights[3].Kd".to_string()));
        assert!(names.contains(&"directionalLights[3].direction".to_string()));
        assert!(!names.iter().any(|n| n.ends_with("constant")));
        assert_eq!(gpu.uniform("directionalLights[3].Ks"), Some(UniformValue::Float(0.4)));
    }

    #[test]
    fn spot_light_writes_cone() {
        let gpu = Rc::new(RecordingGpu::new());
        Light::spot(Vec3::ZERO, Vec3::NEG_Z, 0.9, LightAttributes::default()).setup(&shader(&gpu), 1);
        assert_eq!(gpu.uniform("spotLights[1].cutoffAngle"), Some(UniformValue::Float(0.9)));
        assert_eq!(gpu.uniform("spotLights[1].direction"), Some(UniformValue::Vec3(Vec3::NEG_Z)));
        assert!(gpu.uniform("spotLights[1].position").is_some());
    }

    #[test]
    fn undeclared_slots_are_ignored() {
        let gpu = Rc::new(RecordingGpu::with_uniforms(&["pointLights[0].position"]));
        let light = Light::point(Vec3::ONE, LightAttributes::default());
        light.setup(&shader(&gpu), 7);
        assert!(gpu.uniforms().is_empty());
        light.setup(&shader(&gpu), 0);
        assert_eq!(names(&gpu), ["pointLights[0].position"]);
    }
}
