//! # Backend Module
//!
//! Windowing backends. The application only talks to a [`WindowSystem`], so
//! initialization and teardown can be exercised without a display.

pub mod glfw_window;

pub use glfw_window::{GlfwWindowing, Window, WindowingLibrary};

use ash::vk;

use crate::error::TutorialResult;
use crate::render::vulkan::VulkanInstance;

/// What the tutorial needs from a windowing library once a window is open
pub trait WindowSystem {
    /// Instance extensions the windowing library needs to present to its windows
    fn required_instance_extensions(&self) -> TutorialResult<Vec<String>>;

    /// Create a presentation surface for the window
    ///
    /// The caller owns the returned surface and must destroy it before the instance.
    fn create_surface(&self, instance: &VulkanInstance) -> TutorialResult<vk::SurfaceKHR>;

    /// Process pending events; returns `true` once the user asked to quit
    fn pump_events(&mut self) -> bool;
}
