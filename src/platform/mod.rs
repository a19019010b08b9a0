//! Platform detection and normalization module
//!
//! This module turns the host operating system and CPU architecture into the
//! naming scheme used by the network-hub release assets.

mod detection;
mod target;

pub use detection::{DefaultPlatformDetector, HostPlatform, PlatformDetector};
pub use target::{Arch, Os, TOOL_NAME, TargetPlatform, executable_name, normalize};
