use std::process::ExitCode;

use gl_exercises::engine::systems::launch;
use gl_exercises::exercises::BasicDeformations;

fn main() -> ExitCode {
    launch::<BasicDeformations>()
}
