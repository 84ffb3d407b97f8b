//! Create a Vulkan instance with the extensions GLFW needs

use std::process::ExitCode;
use vulkan_tutorial::{tutorial_main, TutorialStep};

fn main() -> ExitCode {
    tutorial_main(TutorialStep::Instance)
}
