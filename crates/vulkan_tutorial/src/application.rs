//! Tutorial application lifecycle
//!
//! Every tutorial binary runs the same sequence and stops initializing at its
//! [`TutorialStep`]:
//!
//! ```text
//! Uninitialized -> WindowingReady -> InstanceReady -> DeviceSelected -> Running -> Terminated
//! ```
//!
//! Transitions only move forward. Earlier tutorial steps skip the states they
//! do not reach (the base code goes straight from `WindowingReady` to
//! `Running`).

use ash::extensions::khr::Surface;
use ash::vk;
use std::process::ExitCode;

use crate::backend::{GlfwWindowing, WindowSystem};
use crate::config::{Config, TutorialConfig, WindowConfig};
use crate::error::{TutorialError, TutorialResult};
use crate::foundation::{logging, ScopeGuard, ScopedHandle};
use crate::render::vulkan::capabilities::log_capabilities;
use crate::render::vulkan::device::log_candidates;
use crate::render::vulkan::{
    enumerate_candidates, load_entry, query_available_extensions, query_available_layers,
    select_physical_device, RequirementList, SelectedDevice, VulkanInstance,
};

/// Application lifecycle states, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppState {
    /// Nothing acquired yet
    Uninitialized,
    /// Windowing library and window are up
    WindowingReady,
    /// Vulkan instance (and optional debug messenger and surface) created
    InstanceReady,
    /// A physical device was picked
    DeviceSelected,
    /// Pumping window events
    Running,
    /// Quit was requested
    Terminated,
}

impl AppState {
    /// Check that `target` comes strictly after the current state
    pub fn ensure_can_advance(self, target: Self) -> TutorialResult<()> {
        if target <= self {
            return Err(TutorialError::InvalidTransition {
                from: self,
                to: target,
            });
        }
        Ok(())
    }

    /// Move to `target`, which must come strictly after the current state
    pub fn advance(&mut self, target: Self) -> TutorialResult<()> {
        self.ensure_can_advance(target)?;
        log::debug!("State {:?} -> {:?}", self, target);
        *self = target;
        Ok(())
    }
}

/// The tutorial chapters, each one doing a bit more setup than the previous
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TutorialStep {
    /// Window and event loop only
    BaseCode,
    /// Create a Vulkan instance
    Instance,
    /// Add validation layers and the debug messenger
    ValidationLayers,
    /// Pick a physical device with a graphics queue family
    PhysicalDevice,
    /// Create a window surface as well
    WindowSurface,
}

impl TutorialStep {
    /// Window title used when the config does not set one
    pub const fn title(self) -> &'static str {
        match self {
            Self::BaseCode => "Tutorial 0 - Base code",
            Self::Instance => "Tutorial 1 - Creating an instance",
            Self::ValidationLayers => "Tutorial 2 - Validation layers",
            Self::PhysicalDevice => "Tutorial 3 - Physical devices and queue families",
            Self::WindowSurface => "Tutorial 4 - Window surface",
        }
    }

    /// Whether this step creates a Vulkan instance
    pub fn creates_instance(self) -> bool {
        self >= Self::Instance
    }

    /// Whether this step asks for validation (when the build wants it)
    pub fn uses_validation(self) -> bool {
        self >= Self::ValidationLayers
    }

    /// Whether validation is requested: debug builds only
    pub fn requests_validation(self) -> bool {
        self.uses_validation() && cfg!(debug_assertions)
    }

    /// Whether this step selects a physical device
    pub fn selects_device(self) -> bool {
        self >= Self::PhysicalDevice
    }

    /// Whether this step creates a window surface
    pub fn creates_surface(self) -> bool {
        self >= Self::WindowSurface
    }
}

/// Owns everything a tutorial step acquires
pub struct Application<W: WindowSystem> {
    // Field order is drop order: reverse of acquisition
    surface: Option<ScopedHandle<vk::SurfaceKHR>>,
    instance: Option<VulkanInstance>,
    windowing: W,
    selected_device: Option<SelectedDevice>,
    state: AppState,
}

impl<W: WindowSystem> Application<W> {
    /// Take ownership of an initialized windowing system
    pub fn new(windowing: W) -> TutorialResult<Self> {
        let mut state = AppState::Uninitialized;
        state.advance(AppState::WindowingReady)?;
        Ok(Self {
            surface: None,
            instance: None,
            windowing,
            selected_device: None,
            state,
        })
    }

    /// Current lifecycle state
    pub const fn state(&self) -> AppState {
        self.state
    }

    /// The device picked by [`Self::select_device`]
    pub const fn selected_device(&self) -> Option<&SelectedDevice> {
        self.selected_device.as_ref()
    }

    /// The Vulkan instance, once created
    pub const fn instance(&self) -> Option<&VulkanInstance> {
        self.instance.as_ref()
    }

    /// Negotiate capabilities and create the instance (and the surface if asked)
    pub fn init_instance(
        &mut self,
        config: &TutorialConfig,
        want_validation: bool,
        create_surface: bool,
    ) -> TutorialResult<()> {
        self.state.ensure_can_advance(AppState::InstanceReady)?;
        let entry = load_entry()?;

        let window_extensions = self.windowing.required_instance_extensions()?;
        log::info!("Windowing library requires: {}", window_extensions.join(", "));

        let available_extensions = query_available_extensions(&entry)?;
        log_capabilities("instance extensions", &available_extensions);
        let available_layers = query_available_layers(&entry)?;
        if want_validation {
            log_capabilities("instance layers", &available_layers);
        }

        let requirements = RequirementList::negotiate(
            &window_extensions,
            want_validation,
            &available_layers,
            &available_extensions,
        );
        let instance = VulkanInstance::new(entry, &config.application, &requirements)?;

        if create_surface {
            let raw = self.windowing.create_surface(&instance)?;
            let loader = Surface::new(instance.entry(), instance.instance());
            self.surface = Some(ScopedHandle::new("window surface", raw, move |surface| unsafe {
                loader.destroy_surface(surface, None);
            }));
            log::info!("Window surface created");
        }

        self.instance = Some(instance);
        self.state.advance(AppState::InstanceReady)
    }

    /// Pick the first suitable physical device
    pub fn select_device(&mut self, config: &TutorialConfig) -> TutorialResult<()> {
        self.state.ensure_can_advance(AppState::DeviceSelected)?;
        let instance = self.instance.as_ref().ok_or(TutorialError::InvalidTransition {
            from: self.state,
            to: AppState::DeviceSelected,
        })?;

        let candidates = enumerate_candidates(instance.instance())?;
        log_candidates(&candidates);
        let selected = select_physical_device(&candidates, &config.device)?;

        self.selected_device = Some(selected);
        self.state.advance(AppState::DeviceSelected)
    }

    /// Pump events until the user quits
    pub fn main_loop(&mut self) -> TutorialResult<()> {
        self.state.advance(AppState::Running)?;
        log::info!("Running, close the window or press Escape to quit");

        while !self.windowing.pump_events() {}

        log::info!("Quit requested");
        self.state.advance(AppState::Terminated)
    }
}

/// Run one tutorial step with the given windowing initializer
///
/// Returns the final state, which is [`AppState::Terminated`] on success. On
/// error everything acquired so far has already been released.
pub fn run<W, F>(config: &TutorialConfig, step: TutorialStep, init_windowing: F) -> TutorialResult<AppState>
where
    W: WindowSystem,
    F: FnOnce(&WindowConfig, &str) -> TutorialResult<W>,
{
    let title = config.window.title.as_deref().unwrap_or_else(|| step.title());
    log::info!("Starting \"{}\"", title);

    let windowing = init_windowing(&config.window, title)?;
    let mut app = Application::new(windowing)?;
    let aborted = ScopeGuard::new(|| log::warn!("Initialization aborted, releasing resources"));

    if step.creates_instance() {
        app.init_instance(config, step.requests_validation(), step.creates_surface())?;
    }
    if step.selects_device() {
        app.select_device(config)?;
    }
    aborted.commit();

    app.main_loop()?;
    Ok(app.state())
}

/// Entry point shared by the tutorial binaries
pub fn tutorial_main(step: TutorialStep) -> ExitCode {
    let config = TutorialConfig::load_or_default(TutorialConfig::DEFAULT_PATH)
        .map_err(TutorialError::from)
        .and_then(|config| {
            config.validate()?;
            Ok(config)
        });

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    tutorial_main_with(&config, step, GlfwWindowing::init)
}

/// Run one tutorial step and map the outcome to a process exit code
pub fn tutorial_main_with<W, F>(
    config: &TutorialConfig,
    step: TutorialStep,
    init_windowing: F,
) -> ExitCode
where
    W: WindowSystem,
    F: FnOnce(&WindowConfig, &str) -> TutorialResult<W>,
{
    match run(config, step, init_windowing) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
