pub mod keyboard_input_system;
pub mod window_system;

pub use keyboard_input_system::InputState;
pub use window_system::{launch, run, Exercise, Frame};
