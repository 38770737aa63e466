//! License installation
//!
//! Licenses are installed before any package so that a failed run leaves
//! "all licenses, some packages" rather than the reverse: incomplete packages
//! are easy to detect and retry, incomplete licenses are not. The first
//! license failure therefore aborts the whole run.

use crate::service::DeploymentResult;

/// Catalog entry for an embedded license
#[derive(Debug, Clone, Copy)]
pub struct LicenseDescriptor<'a> {
    /// Resource identifier of the license blob
    pub resource_id: &'a str,
}

/// Facade over the OS license installation operation
pub trait LicenseInstaller {
    /// Install one license blob
    fn install_license(&self, id: &str, license: &[u8]) -> DeploymentResult;
}
