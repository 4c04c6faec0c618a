use std::process::ExitCode;

use gl_exercises::engine::systems::launch;
use gl_exercises::exercises::BasicSquare;

fn main() -> ExitCode {
    launch::<BasicSquare>()
}
