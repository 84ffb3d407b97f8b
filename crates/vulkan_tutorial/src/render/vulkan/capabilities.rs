//! Instance layer and extension negotiation
//!
//! The loader reports a snapshot of the layers and instance extensions it can
//! provide. The application cross-references that snapshot with what the
//! windowing library needs and with the optional validation pieces, and ends
//! up with a [`RequirementList`] for instance creation.
//!
//! Missing optional pieces (the validation layer, the debug utils extension)
//! only produce a warning; the instance is created without them.

use ash::{vk, Entry};
use std::ffi::c_char;

use crate::error::TutorialResult;

/// Khronos validation layer
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Debug utils instance extension, carries the debug messenger
pub const DEBUG_UTILS_EXTENSION: &str = "VK_EXT_debug_utils";

/// One layer or extension reported by the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRecord {
    /// Layer or extension name, e.g. `VK_KHR_surface`
    pub name: String,
    /// Version of the spec the capability implements
    pub spec_version: u32,
    /// Implementation version (layers only, 0 for extensions)
    pub implementation_version: u32,
    /// Human readable description (layers only, empty for extensions)
    pub description: String,
}

impl CapabilityRecord {
    /// Record with just a name, mostly useful for tests and tooling
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec_version: 0,
            implementation_version: 0,
            description: String::new(),
        }
    }
}

impl From<&vk::LayerProperties> for CapabilityRecord {
    fn from(properties: &vk::LayerProperties) -> Self {
        Self {
            name: fixed_str(&properties.layer_name),
            spec_version: properties.spec_version,
            implementation_version: properties.implementation_version,
            description: fixed_str(&properties.description),
        }
    }
}

impl From<&vk::ExtensionProperties> for CapabilityRecord {
    fn from(properties: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_str(&properties.extension_name),
            spec_version: properties.spec_version,
            implementation_version: 0,
            description: String::new(),
        }
    }
}

/// Convert a NUL-terminated fixed-size Vulkan string
pub(crate) fn fixed_str(chars: &[c_char]) -> String {
    #[allow(clippy::cast_sign_loss)]
    let bytes: Vec<u8> = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Snapshot of the instance layers available from the loader
pub fn query_available_layers(entry: &Entry) -> TutorialResult<Vec<CapabilityRecord>> {
    #[allow(unused_unsafe)]
    let layers = unsafe { entry.enumerate_instance_layer_properties()? };
    Ok(layers.iter().map(CapabilityRecord::from).collect())
}

/// Snapshot of the instance extensions available from the loader and implicit layers
pub fn query_available_extensions(entry: &Entry) -> TutorialResult<Vec<CapabilityRecord>> {
    #[allow(unused_unsafe)]
    let extensions = unsafe { entry.enumerate_instance_extension_properties(None)? };
    Ok(extensions.iter().map(CapabilityRecord::from).collect())
}

/// Whether `name` is in the snapshot (exact, case-sensitive match)
pub fn is_present(name: &str, records: &[CapabilityRecord]) -> bool {
    records.iter().any(|record| record.name == name)
}

/// Print a snapshot the way the tutorial lists available extensions
pub fn log_capabilities(kind: &str, records: &[CapabilityRecord]) {
    log::info!("{} available {}:", records.len(), kind);
    for record in records {
        if record.description.is_empty() {
            log::info!("\t{} (v{})", record.name, record.spec_version);
        } else {
            log::info!("\t{} (v{}): {}", record.name, record.spec_version, record.description);
        }
    }
}

/// Layers and extensions to enable on the instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementList {
    extensions: Vec<String>,
    layers: Vec<String>,
}

impl RequirementList {
    /// Build the requirement list from the capability snapshots
    ///
    /// Windowing extensions are always requested. With `want_validation`, the
    /// validation layer and the debug utils extension are each added only if
    /// the snapshot has them.
    pub fn negotiate(
        window_extensions: &[String],
        want_validation: bool,
        available_layers: &[CapabilityRecord],
        available_extensions: &[CapabilityRecord],
    ) -> Self {
        let mut list = Self::default();

        for extension in window_extensions {
            if !is_present(extension, available_extensions) {
                log::warn!("Windowing extension {} is not reported by the loader", extension);
            }
            list.push_extension(extension);
        }

        if want_validation {
            if is_present(VALIDATION_LAYER, available_layers) {
                log::info!("Enabling {}", VALIDATION_LAYER);
                list.push_layer(VALIDATION_LAYER);
            } else {
                log::warn!("{} is not available, continuing without validation", VALIDATION_LAYER);
            }

            if is_present(DEBUG_UTILS_EXTENSION, available_extensions) {
                log::info!("Enabling {}", DEBUG_UTILS_EXTENSION);
                list.push_extension(DEBUG_UTILS_EXTENSION);
            } else {
                log::warn!(
                    "{} is not available, validation messages will not be reported",
                    DEBUG_UTILS_EXTENSION
                );
            }
        }

        list
    }

    fn push_extension(&mut self, name: &str) {
        if !self.extensions.iter().any(|e| e == name) {
            self.extensions.push(name.to_string());
        }
    }

    fn push_layer(&mut self, name: &str) {
        if !self.layers.iter().any(|l| l == name) {
            self.layers.push(name.to_string());
        }
    }

    /// Instance extensions, in request order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Instance layers, in request order
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Whether the validation layer made it into the list
    pub fn validation_enabled(&self) -> bool {
        self.layers.iter().any(|l| l == VALIDATION_LAYER)
    }

    /// Whether the debug utils extension made it into the list
    pub fn debug_utils_enabled(&self) -> bool {
        self.extensions.iter().any(|e| e == DEBUG_UTILS_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<CapabilityRecord> {
        names.iter().map(|&name| CapabilityRecord::named(name)).collect()
    }

    fn window_extensions() -> Vec<String> {
        vec!["VK_KHR_surface".to_string(), "VK_KHR_xcb_surface".to_string()]
    }

    #[test]
    fn test_is_present_exact_match() {
        let snapshot = records(&["VK_KHR_surface", "VK_EXT_debug_utils"]);

        assert!(is_present("VK_EXT_debug_utils", &snapshot));
        assert!(!is_present("vk_ext_debug_utils", &snapshot));
        assert!(!is_present("VK_EXT_debug", &snapshot));
        assert!(!is_present("VK_EXT_debug_utils", &[]));
    }

    #[test]
    fn test_negotiate_with_everything_available() {
        let layers = records(&[VALIDATION_LAYER]);
        let extensions = records(&["VK_KHR_surface", "VK_KHR_xcb_surface", DEBUG_UTILS_EXTENSION]);

        let list = RequirementList::negotiate(&window_extensions(), true, &layers, &extensions);

        assert_eq!(
            list.extensions(),
            ["VK_KHR_surface", "VK_KHR_xcb_surface", DEBUG_UTILS_EXTENSION]
        );
        assert_eq!(list.layers(), [VALIDATION_LAYER]);
        assert!(list.validation_enabled());
        assert!(list.debug_utils_enabled());
    }

    #[test]
    fn test_negotiate_missing_layer_keeps_extension() {
        let extensions = records(&["VK_KHR_surface", "VK_KHR_xcb_surface", DEBUG_UTILS_EXTENSION]);

        let list = RequirementList::negotiate(&window_extensions(), true, &[], &extensions);

        assert!(list.layers().is_empty());
        assert!(list.debug_utils_enabled());
        assert_eq!(list.extensions().len(), 3);
    }

    #[test]
    fn test_negotiate_missing_debug_utils_keeps_layer() {
        let layers = records(&[VALIDATION_LAYER]);
        let extensions = records(&["VK_KHR_surface", "VK_KHR_xcb_surface"]);

        let list = RequirementList::negotiate(&window_extensions(), true, &layers, &extensions);

        assert!(list.validation_enabled());
        assert!(!list.debug_utils_enabled());
        assert_eq!(list.extensions(), window_extensions().as_slice());
    }

    #[test]
    fn test_negotiate_without_validation_pieces() {
        let extensions = records(&["VK_KHR_surface", "VK_KHR_xcb_surface"]);

        let list = RequirementList::negotiate(&window_extensions(), true, &[], &extensions);

        assert_eq!(list.extensions(), window_extensions().as_slice());
        assert!(list.layers().is_empty());
        assert!(!list.validation_enabled());
        assert!(!list.debug_utils_enabled());
    }

    #[test]
    fn test_negotiate_without_validation() {
        let layers = records(&[VALIDATION_LAYER]);
        let extensions = records(&["VK_KHR_surface", DEBUG_UTILS_EXTENSION]);

        let list = RequirementList::negotiate(&window_extensions(), false, &layers, &extensions);

        assert!(list.layers().is_empty());
        assert!(!list.debug_utils_enabled());
        // Windowing extensions are requested even when the snapshot lacks one
        assert_eq!(list.extensions(), window_extensions().as_slice());
    }

    #[test]
    fn test_negotiate_does_not_duplicate() {
        let extensions = records(&[DEBUG_UTILS_EXTENSION]);
        let window = vec![DEBUG_UTILS_EXTENSION.to_string()];

        let list = RequirementList::negotiate(&window, true, &[], &extensions);

        assert_eq!(list.extensions(), [DEBUG_UTILS_EXTENSION]);
    }

    #[test]
    fn test_records_from_vulkan_properties() {
        let mut layer = vk::LayerProperties {
            spec_version: vk::make_api_version(0, 1, 3, 0),
            implementation_version: 1,
            ..Default::default()
        };
        for (dst, src) in layer.layer_name.iter_mut().zip(VALIDATION_LAYER.bytes()) {
            *dst = src as c_char;
        }
        for (dst, src) in layer.description.iter_mut().zip("Khronos validation".bytes()) {
            *dst = src as c_char;
        }

        let record = CapabilityRecord::from(&layer);
        assert_eq!(record.name, VALIDATION_LAYER);
        assert_eq!(record.description, "Khronos validation");
        assert_eq!(record.implementation_version, 1);

        let extension = vk::ExtensionProperties::default();
        assert_eq!(CapabilityRecord::from(&extension).name, "");
    }
}
