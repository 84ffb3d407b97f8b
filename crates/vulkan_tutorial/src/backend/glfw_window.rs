//! GLFW-based window management for Vulkan
//!
//! GLFW is initialized without a client API so no OpenGL context is created.
//! The library handle and the window handle are both held in
//! [`ScopedHandle`]s; [`GlfwWindowing`] declares the window before the
//! library so the window is destroyed first.

use ash::vk;
use glfw::{Action, Key, WindowEvent};

use super::WindowSystem;
use crate::config::WindowConfig;
use crate::error::{TutorialError, TutorialResult};
use crate::foundation::ScopedHandle;
use crate::render::vulkan::VulkanInstance;

type EventReceiver = glfw::GlfwReceiver<(f64, WindowEvent)>;

/// How long to block waiting for events before checking again, in seconds
const EVENT_WAIT_TIMEOUT: f64 = 1.0 / 60.0;

/// Initialized GLFW library
pub struct WindowingLibrary {
    glfw: ScopedHandle<glfw::Glfw>,
}

impl WindowingLibrary {
    /// Initialize GLFW for Vulkan rendering
    pub fn init() -> TutorialResult<Self> {
        let mut glfw = glfw::init(|error, description| {
            log::error!("GLFW error {:?}: {}", error, description);
        })
        .map_err(|e| TutorialError::WindowingInit(format!("{:?}", e)))?;

        // Configure for Vulkan (no OpenGL context)
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));

        log::info!("GLFW initialized ({})", glfw::get_version_string());
        Ok(Self {
            glfw: ScopedHandle::new("GLFW library", glfw, drop),
        })
    }

    fn glfw(&self) -> TutorialResult<&glfw::Glfw> {
        self.glfw
            .get()
            .ok_or_else(|| TutorialError::WindowingInit("GLFW already terminated".to_string()))
    }

    fn glfw_mut(&mut self) -> TutorialResult<&mut glfw::Glfw> {
        self.glfw
            .get_mut()
            .ok_or_else(|| TutorialError::WindowingInit("GLFW already terminated".to_string()))
    }

    /// Create a window
    pub fn create_window(&mut self, config: &WindowConfig, title: &str) -> TutorialResult<Window> {
        let glfw = self.glfw_mut()?;
        glfw.window_hint(glfw::WindowHint::Resizable(config.resizable));

        let (mut window, events) = glfw
            .create_window(config.width, config.height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| TutorialError::WindowCreation {
                title: title.to_string(),
            })?;

        window.set_close_polling(true);
        window.set_key_polling(true);

        log::info!("Window \"{}\" created ({}x{})", title, config.width, config.height);
        Ok(Window {
            window: ScopedHandle::new("GLFW window", window, drop),
            events,
        })
    }

    /// Instance extensions GLFW needs for surface creation
    pub fn required_instance_extensions(&self) -> TutorialResult<Vec<String>> {
        let glfw = self.glfw()?;
        if !glfw.vulkan_supported() {
            return Err(TutorialError::WindowingExtensions);
        }
        glfw.get_required_instance_extensions()
            .ok_or(TutorialError::WindowingExtensions)
    }

    /// Block until events arrive or the timeout expires
    pub fn wait_events(&mut self) {
        if let Ok(glfw) = self.glfw_mut() {
            glfw.wait_events_timeout(EVENT_WAIT_TIMEOUT);
        }
    }
}

/// GLFW window wrapper with proper resource management
pub struct Window {
    window: ScopedHandle<glfw::PWindow>,
    events: EventReceiver,
}

impl Window {
    /// Drain queued events; returns `true` if any of them asks to quit
    pub fn drain_quit_events(&mut self) -> bool {
        let mut quit = false;
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                    quit = true;
                }
                _ => {}
            }
        }
        quit || self.should_close()
    }

    /// Whether the window was asked to close
    pub fn should_close(&self) -> bool {
        self.window.get().map_or(true, |window| window.should_close())
    }

    /// Create a Vulkan surface using GLFW's built-in functionality
    pub fn create_surface(&self, instance: vk::Instance) -> TutorialResult<vk::SurfaceKHR> {
        let window = self
            .window
            .get()
            .ok_or(TutorialError::SurfaceCreation(vk::Result::ERROR_INITIALIZATION_FAILED))?;

        let mut surface = vk::SurfaceKHR::null();
        let result = window.create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(TutorialError::SurfaceCreation(result))
        }
    }
}

/// GLFW library plus its single window
pub struct GlfwWindowing {
    // Field order is drop order: window before library
    window: Window,
    library: WindowingLibrary,
}

impl GlfwWindowing {
    /// Initialize GLFW and open the tutorial window
    pub fn init(config: &WindowConfig, title: &str) -> TutorialResult<Self> {
        let mut library = WindowingLibrary::init()?;
        let window = library.create_window(config, title)?;
        Ok(Self { window, library })
    }
}

impl WindowSystem for GlfwWindowing {
    fn required_instance_extensions(&self) -> TutorialResult<Vec<String>> {
        self.library.required_instance_extensions()
    }

    fn create_surface(&self, instance: &VulkanInstance) -> TutorialResult<vk::SurfaceKHR> {
        self.window.create_surface(instance.handle())
    }

    fn pump_events(&mut self) -> bool {
        self.library.wait_events();
        self.window.drain_quit_events()
    }
}
