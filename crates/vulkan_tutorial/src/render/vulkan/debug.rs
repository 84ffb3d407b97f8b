//! Validation message reporting through `VK_EXT_debug_utils`

use ash::extensions::ext::DebugUtils;
use ash::{vk, Entry, Instance};
use std::ffi::CStr;

use crate::error::TutorialResult;

/// Debug messenger with RAII cleanup
///
/// Must be dropped before the instance it was created from.
pub struct DebugMessenger {
    loader: DebugUtils,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl DebugMessenger {
    /// Install [`debug_callback`] on the instance
    pub fn new(entry: &Entry, instance: &Instance) -> TutorialResult<Self> {
        let loader = DebugUtils::new(entry, instance);
        let create_info = messenger_create_info();

        let messenger = unsafe { loader.create_debug_utils_messenger(&create_info, None)? };
        log::debug!("Debug messenger installed");

        Ok(Self { loader, messenger })
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        log::debug!("Destroying debug messenger");
        unsafe {
            self.loader.destroy_debug_utils_messenger(self.messenger, None);
        }
    }
}

/// Severities and message types the tutorial subscribes to
pub fn messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT {
    vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_callback))
        .build()
}

/// Log level for a validation message severity
pub fn severity_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::Level::Error
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        log::Level::Warn
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        log::Level::Info
    } else {
        log::Level::Debug
    }
}

/// Format a validation message for the log
pub fn format_message(message_type: vk::DebugUtilsMessageTypeFlagsEXT, message: &str) -> String {
    format!("[Vulkan] {:?} - {}", message_type, message)
}

/// Debug callback for validation layers
///
/// Called synchronously by the driver from inside other Vulkan calls. Only logs.
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    let message = if callback_data.is_null() || (*callback_data).p_message.is_null() {
        std::borrow::Cow::Borrowed("")
    } else {
        CStr::from_ptr((*callback_data).p_message).to_string_lossy()
    };

    log::log!(
        severity_level(message_severity),
        "{}",
        format_message(message_type, &message)
    );

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_levels() {
        use vk::DebugUtilsMessageSeverityFlagsEXT as Severity;

        assert_eq!(severity_level(Severity::ERROR), log::Level::Error);
        assert_eq!(severity_level(Severity::WARNING), log::Level::Warn);
        assert_eq!(severity_level(Severity::INFO), log::Level::Info);
        assert_eq!(severity_level(Severity::VERBOSE), log::Level::Debug);
        // Highest bit wins when several are set
        assert_eq!(severity_level(Severity::WARNING | Severity::ERROR), log::Level::Error);
    }

    #[test]
    fn test_format_message() {
        let text = format_message(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION, "bad usage");
        assert!(text.starts_with("[Vulkan] "));
        assert!(text.ends_with(" - bad usage"));
    }

    #[test]
    fn test_callback_tolerates_null_data() {
        let result = unsafe {
            debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                std::ptr::null(),
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn test_callback_reads_message() {
        let message = std::ffi::CString::new("validation says hi").unwrap();
        let data = vk::DebugUtilsMessengerCallbackDataEXT {
            p_message: message.as_ptr(),
            ..Default::default()
        };

        let result = unsafe {
            debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &data,
                std::ptr::null_mut(),
            )
        };
        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn test_create_info_has_callback() {
        let info = messenger_create_info();
        assert!(info.pfn_user_callback.is_some());
        assert!(info
            .message_severity
            .contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR));
    }
}
