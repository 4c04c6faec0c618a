use std::process::ExitCode;

use gl_exercises::engine::systems::launch;
use gl_exercises::exercises::GlowingStarship;

fn main() -> ExitCode {
    launch::<GlowingStarship>()
}
