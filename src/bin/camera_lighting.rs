use std::process::ExitCode;

use gl_exercises::engine::systems::launch;
use gl_exercises::exercises::CameraLighting;

fn main() -> ExitCode {
    launch::<CameraLighting>()
}
