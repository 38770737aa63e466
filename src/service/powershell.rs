//! PowerShell-backed deployment service
//!
//! Drives the Windows package manager through the Appx cmdlets rather than
//! linking against WinRT. Each operation runs one short script, blocks on it,
//! and maps the outcome to a [`DeploymentResult`]: an `0x`-prefixed HRESULT
//! is scraped out of stderr when the cmdlet surfaces one, stderr becomes the
//! error text, and a fresh activity id is minted per operation.

use std::path::Path;
use std::process::Command;

use uuid::Uuid;

use super::{DeploymentResult, DeploymentService, E_FAIL};
use crate::error::{DeployError, Result};
use crate::license::LicenseInstaller;
use crate::stage::StagedPackage;

/// Deployment backend shelling out to `powershell.exe`
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerShellBackend;

impl PowerShellBackend {
    /// Create the backend; fails off Windows, where the package deployment
    /// stack does not exist
    pub fn new() -> Result<Self> {
        if cfg!(windows) {
            Ok(Self)
        } else {
            Err(DeployError::ServiceUnavailable {
                reason: "the Windows package deployment stack is only available on Windows"
                    .to_string(),
            })
        }
    }

    fn run_script(&self, script: &str) -> DeploymentResult {
        let output = Command::new("powershell.exe")
            .args(["-NoProfile", "-NonInteractive", "-Command", script])
            .output();

        match output {
            Err(e) => DeploymentResult {
                code: E_FAIL,
                extended_code: 0,
                error_text: format!("failed to launch powershell: {}", e),
                activity_id: Some(Uuid::new_v4()),
            },
            Ok(out) if out.status.success() => DeploymentResult::success(),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
                DeploymentResult {
                    code: extract_hresult(&stderr).unwrap_or(E_FAIL),
                    extended_code: 0,
                    error_text: stderr,
                    activity_id: Some(Uuid::new_v4()),
                }
            }
        }
    }
}

impl DeploymentService for PowerShellBackend {
    fn add_package(&self, package_path: &Path) -> DeploymentResult {
        self.run_script(&format!(
            "Add-AppxPackage -Path '{}'",
            package_path.display()
        ))
    }

    fn register_package(&self, full_name: &str) -> DeploymentResult {
        self.run_script(&format!(
            "Add-AppxPackage -RegisterByFamilyName -MainPackage '{}'",
            full_name
        ))
    }

    fn provision_package(&self, family_name: &str) -> DeploymentResult {
        // No cmdlet provisions by family name; call the WinRT PackageManager
        // directly and poll the async operation until it settles.
        self.run_script(&format!(
            "$null = [Windows.Management.Deployment.PackageManager,Windows,ContentType=WindowsRuntime]; \
             $pm = New-Object Windows.Management.Deployment.PackageManager; \
             $op = $pm.ProvisionPackageForAllUsersAsync('{}'); \
             while ($op.Status -eq 'Started') {{ Start-Sleep -Milliseconds 100 }}; \
             if ($op.Status -ne 'Completed') {{ \
               [Console]::Error.WriteLine(('0x{{0:x8}}' -f $op.ErrorCode.HResult)); exit 1 \
             }}",
            family_name
        ))
    }
}

impl LicenseInstaller for PowerShellBackend {
    fn install_license(&self, _id: &str, license: &[u8]) -> DeploymentResult {
        // The licensing cmdlet needs a file-backed license like the package
        // cmdlets do, so reuse the staging guard.
        let mut stream = std::io::Cursor::new(license);
        let staged = match StagedPackage::stage(&mut stream) {
            Ok(staged) => staged,
            Err(e) => {
                return DeploymentResult {
                    code: E_FAIL,
                    extended_code: 0,
                    error_text: e.to_string(),
                    activity_id: Some(Uuid::new_v4()),
                };
            }
        };
        self.run_script(&format!(
            "Add-AppxProvisionedPackage -Online -LicensePath '{}'",
            staged.path().display()
        ))
    }
}

/// Scrape the first `0x`-prefixed 32-bit code out of cmdlet error output
fn extract_hresult(text: &str) -> Option<u32> {
    let lower = text.to_ascii_lowercase();
    let mut rest = lower.as_str();
    while let Some(pos) = rest.find("0x") {
        let digits = &rest[pos + 2..];
        let hex: String = digits.chars().take_while(char::is_ascii_hexdigit).collect();
        if hex.len() == 8 {
            if let Ok(code) = u32::from_str_radix(&hex, 16) {
                return Some(code);
            }
        }
        rest = &rest[pos + 2..];
    }
    None
}
