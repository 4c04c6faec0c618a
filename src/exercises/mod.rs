//! The exercise programs. Each one is generic over [`Gpu`] so the whole
//! setup and frame logic runs against the recording backend in tests; the
//! binaries under `src/bin` instantiate them with `glow::Context`.
//!
//! [`Gpu`]: crate::engine::gpu::Gpu

pub mod basic_deformations;
pub mod basic_square;
pub mod camera_lighting;
pub mod glowing_starship;
pub mod loading_models;

pub use basic_deformations::BasicDeformations;
pub use basic_square::BasicSquare;
pub use camera_lighting::CameraLighting;
pub use glowing_starship::GlowingStarship;
pub use loading_models::LoadingModels;
