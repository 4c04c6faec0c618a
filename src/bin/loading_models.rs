use std::process::ExitCode;

use gl_exercises::engine::systems::launch;
use gl_exercises::exercises::LoadingModels;

fn main() -> ExitCode {
    launch::<LoadingModels>()
}
