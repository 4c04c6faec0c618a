pub mod camera;
pub mod light;
pub mod mesh;
pub mod model;
pub mod object;
pub mod shader;

pub use camera::{Camera, CameraMovement};
pub use light::{Light, LightAttributes, LightKind, LightResponse};
pub use mesh::{Mesh, Vertex};
pub use model::Model;
pub use object::Object;
pub use shader::ShaderProgram;
