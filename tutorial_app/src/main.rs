//! Base code: open a window and pump events until it is closed

use std::process::ExitCode;
use vulkan_tutorial::{tutorial_main, TutorialStep};

fn main() -> ExitCode {
    tutorial_main(TutorialStep::BaseCode)
}
