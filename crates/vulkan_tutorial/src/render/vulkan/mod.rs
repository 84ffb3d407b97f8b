//! Vulkan bootstrap: capability negotiation, instance, debug messenger and
//! physical device selection

pub mod capabilities;
pub mod debug;
pub mod device;
pub mod instance;

pub use capabilities::{
    is_present, query_available_extensions, query_available_layers, CapabilityRecord,
    RequirementList, DEBUG_UTILS_EXTENSION, VALIDATION_LAYER,
};
pub use debug::DebugMessenger;
pub use device::{
    enumerate_candidates, select_physical_device, DeviceCandidate, DeviceFeature,
    DeviceRequirements, SelectedDevice,
};
pub use instance::{load_entry, VulkanInstance};
