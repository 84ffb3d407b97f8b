//! Instance creation with validation layers and a debug messenger (debug builds)

use std::process::ExitCode;
use vulkan_tutorial::{tutorial_main, TutorialStep};

fn main() -> ExitCode {
    tutorial_main(TutorialStep::ValidationLayers)
}
