//! Graphics API setup

pub mod vulkan;
