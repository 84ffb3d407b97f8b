//! Error types shared by every tutorial step

use ash::vk;
use thiserror::Error;

use crate::application::AppState;
use crate::config::ConfigError;

/// Tutorial errors
///
/// Everything here is fatal to the run. Missing optional capabilities are
/// not errors; they are logged as warnings during negotiation.
#[derive(Error, Debug)]
pub enum TutorialError {
    /// The windowing library failed to start
    #[error("Windowing library initialization failed: {0}")]
    WindowingInit(String),

    /// The window could not be created
    #[error("Window creation failed: {title}")]
    WindowCreation {
        /// Title of the window that was requested
        title: String,
    },

    /// The windowing library cannot report Vulkan instance extensions
    #[error("Windowing library does not support Vulkan")]
    WindowingExtensions,

    /// The windowing library failed to create a Vulkan surface
    #[error("Surface creation failed: {0:?}")]
    SurfaceCreation(vk::Result),

    /// The Vulkan loader could not be found or loaded
    #[error("Failed to load Vulkan: {0}")]
    VulkanLoad(String),

    /// The driver rejected the instance configuration
    #[error("Instance creation failed: {0:?}")]
    InstanceCreation(vk::Result),

    /// Any other Vulkan API error
    #[error("Vulkan API error: {0:?}")]
    Vulkan(#[from] vk::Result),

    /// No physical device passed the selection predicate
    #[error("No suitable GPU found among {candidates} device(s)")]
    NoSuitableDevice {
        /// How many devices were enumerated
        candidates: usize,
    },

    /// A layer, extension or application name could not be passed to Vulkan
    #[error("Invalid name {0:?}: contains an interior NUL byte")]
    InvalidName(String),

    /// The application state machine was driven backwards or repeated
    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the application was in
        from: AppState,
        /// State that was requested
        to: AppState,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for tutorial operations
pub type TutorialResult<T> = Result<T, TutorialError>;
