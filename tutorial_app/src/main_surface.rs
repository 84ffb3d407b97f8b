//! Create a window surface next to the instance and selected device

use std::process::ExitCode;
use vulkan_tutorial::{tutorial_main, TutorialStep};

fn main() -> ExitCode {
    tutorial_main(TutorialStep::WindowSurface)
}
