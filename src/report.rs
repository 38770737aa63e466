//! Failure decoding and rendering
//!
//! Turns HRESULT-style codes into readable text and decides which captured
//! diagnostic fields are contextually valid: extended code and error text
//! only come out of add/register operations, so showing them for any other
//! stage would surface stale detail from an unrelated call.

use crate::deploy::{DeployContext, InstallStage};
use crate::service;

/// Remediation hint for provisioning failures caused by missing elevation
pub const ELEVATION_HINT: &str =
    "TIP: run the installer from an elevated prompt to provision the package for all users";

/// Human-readable text for well-known deployment codes
pub fn describe(code: u32) -> Option<&'static str> {
    match code {
        service::S_OK => Some("The operation completed successfully."),
        service::E_FAIL => Some("Unspecified error."),
        service::ERROR_ACCESS_DENIED => Some("Access is denied."),
        service::ERROR_INSTALL_OPEN_PACKAGE_FAILED => Some("The package could not be opened."),
        service::ERROR_INSTALL_PACKAGE_NOT_FOUND => Some("The package could not be found."),
        service::ERROR_INSTALL_INVALID_PACKAGE => Some("The package data is invalid."),
        service::ERROR_INSTALL_RESOLVE_DEPENDENCY_FAILED => {
            Some("A dependency of the package could not be found or satisfied.")
        }
        service::ERROR_INSTALL_REGISTRATION_FAILURE => Some("Package registration failed."),
        service::ERROR_INSTALL_FAILED => Some("Package installation failed."),
        service::ERROR_PACKAGE_ALREADY_EXISTS => {
            Some("The package is already installed on this machine.")
        }
        _ => None,
    }
}

/// Render the failure detail for a result code in the given workflow context
///
/// Returns an empty string for success. Extended error code and error text
/// are shown only for the add/register stages; the activity id is grouped
/// with them. Access-denied provisioning failures get the elevation hint.
pub fn render(code: u32, ctx: &DeployContext) -> String {
    if code == service::S_OK {
        return String::new();
    }

    let mut parts: Vec<String> = Vec::new();

    if let Some(text) = describe(code) {
        parts.push(text.to_string());
    }

    let add_or_register = matches!(
        ctx.stage,
        InstallStage::AddPackage | InstallStage::RegisterPackage
    );

    if add_or_register {
        if ctx.error.extended_code != 0 {
            let mut line = format!("ExtendedError: {:#010x}", ctx.error.extended_code);
            if let Some(text) = describe(ctx.error.extended_code) {
                line.push(' ');
                line.push_str(text);
            }
            parts.push(line);
        }

        if !ctx.error.error_text.is_empty() {
            parts.push(format!("ErrorMessage: {}", ctx.error.error_text));
        }

        if let Some(activity_id) = ctx.error.activity_id {
            parts.push(format!("ActivityId: {}", activity_id));
        }
    }

    if ctx.stage == InstallStage::ProvisionPackage && code == service::ERROR_ACCESS_DENIED {
        parts.push(ELEVATION_HINT.to_string());
    }

    parts.join("\n")
}
