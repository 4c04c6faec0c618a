pub mod glsl;
pub mod math;
pub mod postprocess;

pub use glsl::GlVersion;
