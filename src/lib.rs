//! OpenGL tutorial exercises on top of a small engine layer: shader
//! programs with subroutine selection, GPU meshes, model import, object
//! transforms and lights.
//!
//! Every exercise is a binary under `src/bin` that hands an
//! [`engine::Exercise`] to [`engine::systems::launch`].

pub mod engine;
pub mod exercises;
