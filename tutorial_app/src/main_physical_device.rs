//! Pick the first physical device with a graphics queue family

use std::process::ExitCode;
use vulkan_tutorial::{tutorial_main, TutorialStep};

fn main() -> ExitCode {
    tutorial_main(TutorialStep::PhysicalDevice)
}
