//! Package and machine architecture classification
//!
//! Applicability follows the deployment rules for MSIX packages: neutral and
//! same-architecture packages always apply, and framework packages are
//! additionally allowed to ride on platform emulation (x86-on-x64, and
//! everything on arm64).

use std::fmt;

use serde::Deserialize;

use crate::deploy::DeploymentBehavior;
use crate::error::{DeployError, Result};

/// Target architecture of a package, or the native architecture of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    /// Architecture-independent package (never a machine architecture)
    Neutral,
    X86,
    X64,
    Arm,
    Arm64,
}

impl Architecture {
    /// Classify a machine identifier as reported by the OS or the toolchain
    ///
    /// Accepts both Windows `PROCESSOR_ARCHITECTURE` spellings (`AMD64`,
    /// `ARM64`, `x86`) and Rust target spellings (`x86_64`, `aarch64`).
    pub fn from_machine_id(machine: &str) -> Result<Self> {
        match machine.to_ascii_lowercase().as_str() {
            "x86" | "i386" | "i686" => Ok(Architecture::X86),
            "amd64" | "x86_64" | "x64" => Ok(Architecture::X64),
            "arm" => Ok(Architecture::Arm),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            _ => Err(DeployError::UnsupportedPlatform {
                machine: machine.to_string(),
            }),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Architecture::Neutral => "neutral",
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
        };
        write!(f, "{}", name)
    }
}

/// Detect the native architecture of the machine
///
/// The installer itself may run emulated, so on Windows this consults
/// `PROCESSOR_ARCHITEW6432` (set for emulated processes) before
/// `PROCESSOR_ARCHITECTURE`, rather than trusting the architecture this
/// binary was compiled for. Elsewhere the build target is the machine.
pub fn native_architecture() -> Result<Architecture> {
    #[cfg(windows)]
    {
        for var in ["PROCESSOR_ARCHITEW6432", "PROCESSOR_ARCHITECTURE"] {
            if let Ok(machine) = std::env::var(var) {
                return Architecture::from_machine_id(&machine);
            }
        }
    }
    Architecture::from_machine_id(std::env::consts::ARCH)
}

/// Decide whether a package architecture is installable on the given machine
///
/// Rules, in order:
/// 1. Neutral packages apply everywhere.
/// 2. Same architecture always applies.
/// 3. Non-framework packages (by manifest and by catalog role) ship one image
///    per architecture, so cross-architecture substitution is not attempted.
/// 4. Framework packages ride emulation: x86 applies on x64, and every
///    current architecture applies on arm64.
pub fn is_applicable(
    package_arch: Architecture,
    is_framework: bool,
    behavior: DeploymentBehavior,
    native_arch: Architecture,
) -> bool {
    if package_arch == Architecture::Neutral {
        return true;
    }

    if package_arch == native_arch {
        return true;
    }

    if !is_framework && behavior != DeploymentBehavior::Framework {
        return false;
    }

    if native_arch == Architecture::X64 && package_arch == Architecture::X86 {
        return true;
    }

    if native_arch == Architecture::Arm64 {
        return true;
    }

    false
}
