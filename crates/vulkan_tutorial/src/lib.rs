//! # Vulkan Tutorial
//!
//! The opening chapters of the Vulkan Tutorial as a library plus one small
//! binary per chapter: open a GLFW window, negotiate instance layers and
//! extensions, create the instance with optional validation, and pick the
//! first physical device with a graphics queue family.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vulkan_tutorial::prelude::*;
//!
//! fn main() -> std::process::ExitCode {
//!     tutorial_main(TutorialStep::PhysicalDevice)
//! }
//! ```
//!
//! Nothing renders: after setup the program pumps window events until the
//! window is closed or Escape is pressed.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod backend;
pub mod config;
pub mod foundation;
pub mod render;

mod application;
mod error;

pub use application::{run, tutorial_main, tutorial_main_with, AppState, Application, TutorialStep};
pub use error::{TutorialError, TutorialResult};

/// Common imports for tutorial binaries
pub mod prelude {
    pub use crate::{
        backend::{GlfwWindowing, WindowSystem},
        config::{Config, TutorialConfig, WindowConfig},
        foundation::{ScopeGuard, ScopedHandle},
        render::vulkan::{DeviceFeature, DeviceRequirements, RequirementList, VulkanInstance},
        run, tutorial_main, tutorial_main_with, AppState, Application, TutorialError, TutorialResult,
        TutorialStep,
    };
}
