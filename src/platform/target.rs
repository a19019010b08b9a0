use anyhow::Result;
use std::fmt;

use crate::error::SetupError;

/// Prefix shared by every release asset and by the installed binary.
pub const TOOL_NAME: &str = "network-hub";

/// Operating system in the vendor naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Macos,
    Linux,
}

impl Os {
    pub fn as_str(self) -> &'static str {
        match self {
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Linux => "linux",
        }
    }

    /// Maps a runner OS identifier (`win32`, `darwin`, `linux`).
    pub fn from_host(host_os: &str) -> Result<Self, SetupError> {
        match host_os {
            "win32" => Ok(Os::Windows),
            "darwin" => Ok(Os::Macos),
            "linux" => Ok(Os::Linux),
            other => Err(SetupError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// CPU architecture in the vendor naming scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Maps a runner architecture identifier (`x64`, `arm64`).
    pub fn from_host(host_arch: &str) -> Result<Self, SetupError> {
        match host_arch {
            "x64" => Ok(Arch::Amd64),
            "arm64" => Ok(Arch::Arm64),
            other => Err(SetupError::UnsupportedArchitecture(other.to_string())),
        }
    }
}

/// A supported OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetPlatform {
    pub os: Os,
    pub arch: Arch,
}

impl TargetPlatform {
    /// Name of the release asset built for this platform,
    /// e.g. `network-hub-macos-arm64` or `network-hub-windows-amd64.exe`.
    pub fn executable_name(&self) -> String {
        format!(
            "{}-{}-{}{}",
            TOOL_NAME,
            self.os.as_str(),
            self.arch.as_str(),
            self.exe_suffix()
        )
    }

    /// Name the binary is stored under, so later steps can call it as `network-hub`.
    pub fn binary_file_name(&self) -> String {
        format!("{}{}", TOOL_NAME, self.exe_suffix())
    }

    fn exe_suffix(&self) -> &'static str {
        match self.os {
            Os::Windows => ".exe",
            Os::Macos | Os::Linux => "",
        }
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.as_str(), self.arch.as_str())
    }
}

/// Normalizes raw host identifiers. The OS is checked before the architecture.
pub fn normalize(host_os: &str, host_arch: &str) -> Result<TargetPlatform> {
    let os = Os::from_host(host_os)?;
    let arch = Arch::from_host(host_arch)?;
    Ok(TargetPlatform { os, arch })
}

pub fn executable_name(host_os: &str, host_arch: &str) -> Result<String> {
    Ok(normalize(host_os, host_arch)?.executable_name())
}
