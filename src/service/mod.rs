//! OS deployment service abstraction
//!
//! The orchestrator drives package deployment through the [`DeploymentService`]
//! trait. The underlying OS operations are asynchronous, but deployments
//! mutate machine-wide registration state and must be serialized, so the
//! trait is synchronous and implementations block until the operation
//! settles.
//!
//! Results carry HRESULT-style codes plus the secondary diagnostic fields
//! the deployment stack reports on failure (extended code, error text,
//! activity id for support escalation).

pub mod powershell;

pub use powershell::PowerShellBackend;

use std::path::Path;

use uuid::Uuid;

/// Success
pub const S_OK: u32 = 0;
/// Unspecified failure
pub const E_FAIL: u32 = 0x8000_4005;
/// Access is denied (provisioning without elevation)
pub const ERROR_ACCESS_DENIED: u32 = 0x8007_0005;
/// The package could not be opened
pub const ERROR_INSTALL_OPEN_PACKAGE_FAILED: u32 = 0x8007_3CF0;
/// The package could not be found
pub const ERROR_INSTALL_PACKAGE_NOT_FOUND: u32 = 0x8007_3CF1;
/// The package data is invalid
pub const ERROR_INSTALL_INVALID_PACKAGE: u32 = 0x8007_3CF2;
/// A package dependency could not be satisfied
pub const ERROR_INSTALL_RESOLVE_DEPENDENCY_FAILED: u32 = 0x8007_3CF3;
/// Package registration failed
pub const ERROR_INSTALL_REGISTRATION_FAILURE: u32 = 0x8007_3CF6;
/// Generic package install failure
pub const ERROR_INSTALL_FAILED: u32 = 0x8007_3CF9;
/// The package is already installed; not an error, triggers re-registration
pub const ERROR_PACKAGE_ALREADY_EXISTS: u32 = 0x8007_3CFB;

/// Outcome of one deployment operation
#[derive(Debug, Clone, Default)]
pub struct DeploymentResult {
    /// Primary result code; `S_OK` means success
    pub code: u32,
    /// Extended error code, when the service reports one
    pub extended_code: u32,
    /// Descriptive error text, when the service reports one
    pub error_text: String,
    /// Correlation id for support escalation
    pub activity_id: Option<Uuid>,
}

impl DeploymentResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(code: u32, extended_code: u32, error_text: impl Into<String>) -> Self {
        Self {
            code,
            extended_code,
            error_text: error_text.into(),
            activity_id: Some(Uuid::new_v4()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == S_OK
    }

    pub fn is_already_exists(&self) -> bool {
        self.code == ERROR_PACKAGE_ALREADY_EXISTS
    }
}

/// Synchronous facade over the OS package deployment operations
pub trait DeploymentService {
    /// Add (install) a package from a staged, file-backed image
    fn add_package(&self, package_path: &Path) -> DeploymentResult;

    /// Register an already-installed package by its full name
    fn register_package(&self, full_name: &str) -> DeploymentResult;

    /// Provision a package for all users of the machine by family name
    fn provision_package(&self, family_name: &str) -> DeploymentResult;
}

/// Backend for dry runs: every operation reports success without touching
/// the machine. The orchestrator never actually invokes it in dry-run mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl DeploymentService for NullBackend {
    fn add_package(&self, _package_path: &Path) -> DeploymentResult {
        DeploymentResult::success()
    }

    fn register_package(&self, _full_name: &str) -> DeploymentResult {
        DeploymentResult::success()
    }

    fn provision_package(&self, _family_name: &str) -> DeploymentResult {
        DeploymentResult::success()
    }
}

impl crate::license::LicenseInstaller for NullBackend {
    fn install_license(&self, _id: &str, _license: &[u8]) -> DeploymentResult {
        DeploymentResult::success()
    }
}
