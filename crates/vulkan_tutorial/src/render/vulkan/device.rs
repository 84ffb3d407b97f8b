//! Physical device selection
//!
//! Devices are taken in the order the driver enumerates them and the first one
//! that qualifies wins. A device qualifies when one of its queue families
//! supports graphics and it has every feature listed in
//! [`DeviceRequirements`]. There is no scoring: a discrete GPU enumerated
//! after a qualifying integrated one is not preferred.

use ash::{vk, Instance};
use serde::{Deserialize, Serialize};

use super::capabilities::fixed_str;
use crate::error::{TutorialError, TutorialResult};

/// Optional device features a tutorial step can insist on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceFeature {
    /// `geometryShader`
    GeometryShader,
    /// `tessellationShader`
    TessellationShader,
    /// `samplerAnisotropy`
    SamplerAnisotropy,
    /// `multiViewport`
    MultiViewport,
}

impl DeviceFeature {
    /// Whether `features` advertises this feature
    pub fn supported_by(self, features: &vk::PhysicalDeviceFeatures) -> bool {
        let flag = match self {
            Self::GeometryShader => features.geometry_shader,
            Self::TessellationShader => features.tessellation_shader,
            Self::SamplerAnisotropy => features.sampler_anisotropy,
            Self::MultiViewport => features.multi_viewport,
        };
        flag == vk::TRUE
    }
}

/// What a physical device must offer to be selected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceRequirements {
    /// Features the device must support
    pub features: Vec<DeviceFeature>,
}

impl DeviceRequirements {
    /// Require an additional feature
    #[must_use]
    pub fn with_feature(mut self, feature: DeviceFeature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }
}

/// A physical device and the properties selection looks at
#[derive(Debug, Clone)]
pub struct DeviceCandidate {
    /// Vulkan physical device handle
    pub handle: vk::PhysicalDevice,
    /// Device name as reported by the driver
    pub name: String,
    /// Discrete, integrated, virtual, CPU or other
    pub device_type: vk::PhysicalDeviceType,
    /// Highest Vulkan version the device supports
    pub api_version: u32,
    /// Supported device features
    pub features: vk::PhysicalDeviceFeatures,
    /// Available queue families, indexed by family index
    pub queue_families: Vec<vk::QueueFamilyProperties>,
}

impl DeviceCandidate {
    /// Query a device's properties, features and queue families
    pub fn query(instance: &Instance, handle: vk::PhysicalDevice) -> Self {
        let properties = unsafe { instance.get_physical_device_properties(handle) };
        let features = unsafe { instance.get_physical_device_features(handle) };
        let queue_families =
            unsafe { instance.get_physical_device_queue_family_properties(handle) };

        Self {
            handle,
            name: fixed_str(&properties.device_name),
            device_type: properties.device_type,
            api_version: properties.api_version,
            features,
            queue_families,
        }
    }

    /// Index of the first queue family that supports graphics
    pub fn graphics_queue_family(&self) -> Option<u32> {
        self.queue_families
            .iter()
            .position(|family| {
                family.queue_count > 0 && family.queue_flags.contains(vk::QueueFlags::GRAPHICS)
            })
            .and_then(|index| u32::try_from(index).ok())
    }

    /// Required features this device lacks
    pub fn missing_features(&self, requirements: &DeviceRequirements) -> Vec<DeviceFeature> {
        requirements
            .features
            .iter()
            .copied()
            .filter(|feature| !feature.supported_by(&self.features))
            .collect()
    }
}

/// The outcome of device selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedDevice {
    /// Position of the chosen device in the enumeration order
    pub index: usize,
    /// Physical device handle
    pub handle: vk::PhysicalDevice,
    /// Queue family used for graphics
    pub graphics_family: u32,
}

/// Enumerate the instance's physical devices, in driver order
pub fn enumerate_candidates(instance: &Instance) -> TutorialResult<Vec<DeviceCandidate>> {
    let devices = unsafe { instance.enumerate_physical_devices()? };
    log::info!("Found {} physical device(s)", devices.len());

    Ok(devices
        .into_iter()
        .map(|device| DeviceCandidate::query(instance, device))
        .collect())
}

/// Pick the first candidate with a graphics queue family and every required feature
pub fn select_physical_device(
    candidates: &[DeviceCandidate],
    requirements: &DeviceRequirements,
) -> TutorialResult<SelectedDevice> {
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(graphics_family) = candidate.graphics_queue_family() else {
            log::info!("Skipping {}: no graphics queue family", candidate.name);
            continue;
        };

        let missing = candidate.missing_features(requirements);
        if !missing.is_empty() {
            log::info!("Skipping {}: missing features {:?}", candidate.name, missing);
            continue;
        }

        log::info!(
            "Selected GPU: {} ({:?}), graphics queue family {}",
            candidate.name,
            candidate.device_type,
            graphics_family
        );
        return Ok(SelectedDevice {
            index,
            handle: candidate.handle,
            graphics_family,
        });
    }

    Err(TutorialError::NoSuitableDevice {
        candidates: candidates.len(),
    })
}

/// Log every candidate and its queue families
pub fn log_candidates(candidates: &[DeviceCandidate]) {
    for candidate in candidates {
        let (major, minor) = (
            vk::api_version_major(candidate.api_version),
            vk::api_version_minor(candidate.api_version),
        );
        log::info!(
            "\t{} ({:?}, Vulkan {}.{})",
            candidate.name,
            candidate.device_type,
            major,
            minor
        );
        for (index, family) in candidate.queue_families.iter().enumerate() {
            log::info!(
                "\t\tqueue family {}: {} queue(s), {:?}",
                index,
                family.queue_count,
                family.queue_flags
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    fn candidate(raw: u64, name: &str, families: Vec<vk::QueueFamilyProperties>) -> DeviceCandidate {
        DeviceCandidate {
            handle: vk::PhysicalDevice::from_raw(raw),
            name: name.to_string(),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            api_version: vk::API_VERSION_1_0,
            features: vk::PhysicalDeviceFeatures::default(),
            queue_families: families,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let candidates = vec![
            candidate(1, "A", vec![family(vk::QueueFlags::COMPUTE)]),
            candidate(
                2,
                "B",
                vec![
                    family(vk::QueueFlags::TRANSFER),
                    family(vk::QueueFlags::COMPUTE),
                    family(vk::QueueFlags::GRAPHICS),
                ],
            ),
            candidate(3, "C", vec![family(vk::QueueFlags::GRAPHICS)]),
        ];

        let selected = select_physical_device(&candidates, &DeviceRequirements::default()).unwrap();

        assert_eq!(selected.index, 1);
        assert_eq!(selected.handle, vk::PhysicalDevice::from_raw(2));
        assert_eq!(selected.graphics_family, 2);
    }

    #[test]
    fn test_no_qualifying_device() {
        let candidates = vec![
            candidate(1, "A", vec![family(vk::QueueFlags::COMPUTE)]),
            candidate(2, "B", vec![]),
        ];

        let result = select_physical_device(&candidates, &DeviceRequirements::default());
        assert!(matches!(result, Err(TutorialError::NoSuitableDevice { candidates: 2 })));

        let result = select_physical_device(&[], &DeviceRequirements::default());
        assert!(matches!(result, Err(TutorialError::NoSuitableDevice { candidates: 0 })));
    }

    #[test]
    fn test_empty_graphics_family_is_skipped() {
        let mut empty = family(vk::QueueFlags::GRAPHICS);
        empty.queue_count = 0;
        let device = candidate(1, "A", vec![empty, family(vk::QueueFlags::GRAPHICS)]);

        assert_eq!(device.graphics_queue_family(), Some(1));
    }

    #[test]
    fn test_required_feature_filters_devices() {
        let plain = candidate(1, "A", vec![family(vk::QueueFlags::GRAPHICS)]);
        let mut capable = candidate(2, "B", vec![family(vk::QueueFlags::GRAPHICS)]);
        capable.features.geometry_shader = vk::TRUE;

        let requirements = DeviceRequirements::default().with_feature(DeviceFeature::GeometryShader);
        assert_eq!(plain.missing_features(&requirements), vec![DeviceFeature::GeometryShader]);

        let selected = select_physical_device(&[plain, capable], &requirements).unwrap();
        assert_eq!(selected.index, 1);
    }

    #[test]
    fn test_with_feature_deduplicates() {
        let requirements = DeviceRequirements::default()
            .with_feature(DeviceFeature::SamplerAnisotropy)
            .with_feature(DeviceFeature::SamplerAnisotropy);
        assert_eq!(requirements.features.len(), 1);
    }

    #[test]
    fn test_feature_lookup() {
        let features = vk::PhysicalDeviceFeatures {
            multi_viewport: vk::TRUE,
            ..Default::default()
        };
        assert!(DeviceFeature::MultiViewport.supported_by(&features));
        assert!(!DeviceFeature::TessellationShader.supported_by(&features));
    }
}
