pub mod config;
pub mod gpu;
pub mod logging;
pub mod loaders;
pub mod utils;
pub mod systems;
pub mod components;
pub mod managers;

// Re-export the pieces every exercise touches
pub use components::{Camera, Light, Mesh, Model, Object, ShaderProgram};
pub use config::ExerciseConfig;
pub use gpu::Gpu;
pub use managers::AssetsManager;
pub use systems::{Exercise, Frame, InputState};
