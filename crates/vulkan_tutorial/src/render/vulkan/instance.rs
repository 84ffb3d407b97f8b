//! Vulkan instance creation
//!
//! The instance owns the loader entry and, when the requirement list enabled
//! `VK_EXT_debug_utils`, the debug messenger. Teardown order is messenger,
//! then instance, then the loader library.

use ash::{vk, Entry, Instance};
use std::ffi::{c_char, CString};

use super::capabilities::RequirementList;
use super::debug::{messenger_create_info, DebugMessenger};
use crate::config::ApplicationInfoConfig;
use crate::error::{TutorialError, TutorialResult};

/// Load the Vulkan loader library
pub fn load_entry() -> TutorialResult<Entry> {
    let entry = unsafe { Entry::load() }
        .map_err(|e| TutorialError::VulkanLoad(e.to_string()))?;
    log::debug!("Vulkan loader loaded");
    Ok(entry)
}

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    // Field order is drop order
    debug_messenger: Option<DebugMessenger>,
    instance: Instance,
    entry: Entry,
}

impl VulkanInstance {
    /// Create an instance enabling exactly the layers and extensions in `requirements`
    pub fn new(
        entry: Entry,
        app: &ApplicationInfoConfig,
        requirements: &RequirementList,
    ) -> TutorialResult<Self> {
        let app_name = to_cstring(&app.name)?;
        let engine_name = to_cstring(&app.engine_name)?;
        let (major, minor, patch) = app.version;
        let (engine_major, engine_minor, engine_patch) = app.engine_version;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(&engine_name)
            .engine_version(vk::make_api_version(0, engine_major, engine_minor, engine_patch))
            .api_version(vk::API_VERSION_1_0);

        let extension_names = to_cstrings(requirements.extensions())?;
        let layer_names = to_cstrings(requirements.layers())?;
        let extension_ptrs = as_ptrs(&extension_names);
        let layer_ptrs = as_ptrs(&layer_names);

        // Reports problems in vkCreateInstance/vkDestroyInstance themselves
        let mut debug_info = messenger_create_info();
        let create_info = chain_debug_info(
            vk::InstanceCreateInfo::builder()
                .application_info(&app_info)
                .enabled_extension_names(&extension_ptrs)
                .enabled_layer_names(&layer_ptrs),
            &mut debug_info,
            requirements.debug_utils_enabled(),
        );

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(TutorialError::InstanceCreation)?;
        log::info!(
            "Vulkan instance created ({} extension(s), {} layer(s))",
            extension_ptrs.len(),
            layer_ptrs.len()
        );

        // From here on the instance is owned, so a failing messenger still tears it down
        let mut this = Self {
            debug_messenger: None,
            instance,
            entry,
        };

        if requirements.debug_utils_enabled() {
            this.debug_messenger = Some(DebugMessenger::new(&this.entry, &this.instance)?);
        }

        Ok(this)
    }

    /// Get a reference to the Vulkan entry
    pub const fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Get a reference to the Vulkan instance
    pub const fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Raw instance handle, as needed by the windowing library
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        // Messenger must go before the instance
        drop(self.debug_messenger.take());
        log::debug!("Destroying Vulkan instance");
        unsafe {
            self.instance.destroy_instance(None);
        }
    }
}

fn chain_debug_info<'a>(
    create_info: vk::InstanceCreateInfoBuilder<'a>,
    debug_info: &'a mut vk::DebugUtilsMessengerCreateInfoEXT,
    enabled: bool,
) -> vk::InstanceCreateInfoBuilder<'a> {
    if enabled {
        create_info.push_next(debug_info)
    } else {
        create_info
    }
}

fn to_cstring(name: &str) -> TutorialResult<CString> {
    CString::new(name).map_err(|_| TutorialError::InvalidName(name.to_string()))
}

fn to_cstrings(names: &[String]) -> TutorialResult<Vec<CString>> {
    names.iter().map(|name| to_cstring(name)).collect()
}

fn as_ptrs(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_nul_is_rejected() {
        let result = to_cstrings(&["VK_KHR_surface".to_string(), "bad\0name".to_string()]);
        assert!(matches!(result, Err(TutorialError::InvalidName(name)) if name == "bad\0name"));
    }

    #[test]
    fn test_debug_info_chained_only_when_enabled() {
        let mut debug_info = messenger_create_info();
        let chained = chain_debug_info(vk::InstanceCreateInfo::builder(), &mut debug_info, true);
        assert!(!chained.p_next.is_null());

        let mut debug_info = messenger_create_info();
        let plain = chain_debug_info(vk::InstanceCreateInfo::builder(), &mut debug_info, false);
        assert!(plain.p_next.is_null());
    }

    #[test]
    fn test_pointers_follow_names() {
        let names = to_cstrings(&["VK_KHR_surface".to_string(), "VK_EXT_debug_utils".to_string()])
            .unwrap();
        let ptrs = as_ptrs(&names);

        assert_eq!(ptrs.len(), 2);
        assert_eq!(ptrs[0], names[0].as_ptr());
        assert_eq!(ptrs[1], names[1].as_ptr());
    }
}
