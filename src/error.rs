//! Error types and handling for appxdeploy
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for deployment operations
#[derive(Error, Diagnostic, Debug)]
pub enum DeployError {
    // Package errors
    #[error("Invalid package format: {reason}")]
    #[diagnostic(
        code(appxdeploy::package::invalid_format),
        help("The package image is not a valid archive or its manifest is missing identity fields")
    )]
    InvalidPackageFormat { reason: String },

    #[error("Failed to add or register package '{package}': {code:#010x}")]
    #[diagnostic(
        code(appxdeploy::deploy::add_failed),
        help("The installer stops at the first add/register failure; see the deployment error details above")
    )]
    AddPackageFailed { package: String, code: u32 },

    // Platform errors
    #[error("Unsupported platform: machine type '{machine}' is not recognized")]
    #[diagnostic(code(appxdeploy::platform::unsupported))]
    UnsupportedPlatform { machine: String },

    // Resource errors
    #[error("Embedded resource not found: {id} ({kind})")]
    #[diagnostic(code(appxdeploy::resource::not_found))]
    ResourceNotFound { id: String, kind: String },

    // Staging errors
    #[error("Failed to stage package to a temporary file: {reason}")]
    #[diagnostic(
        code(appxdeploy::stage::write_failed),
        help("Check that the system temp directory exists and has free space")
    )]
    StagingFailed { reason: String },

    // License errors
    #[error("Failed to install license '{id}': {code:#010x}")]
    #[diagnostic(
        code(appxdeploy::license::install_failed),
        help("Licenses are installed before any package; fix the license error and re-run")
    )]
    LicenseInstallFailed { id: String, code: u32 },

    // Backend errors
    #[error("Deployment backend unavailable: {reason}")]
    #[diagnostic(
        code(appxdeploy::service::unavailable),
        help("Package deployment requires the Windows package manager; use --dry-run elsewhere")
    )]
    ServiceUnavailable { reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(appxdeploy::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for DeployError {
    fn from(err: std::io::Error) -> Self {
        DeployError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        DeployError::InvalidPackageFormat {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DeployError>;
