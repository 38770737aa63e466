//! Deployment orchestrator
//!
//! Drives the per-package workflow (inspect, applicability gate, stage,
//! add/register, provision) and the all-packages loop. Each package gets a
//! fresh [`DeployContext`], so diagnostic state can never leak from one
//! package's report into the next.
//!
//! Failure policy: an add/register failure aborts the whole run (a missing or
//! broken package is unrecoverable), while a provisioning failure only
//! degrades the result to "installed for the current user" and the run
//! continues. Licenses install before any package and abort on first failure.

use std::io::{Seek, SeekFrom};

use console::style;
use uuid::Uuid;

use crate::arch::{self, Architecture};
use crate::error::{DeployError, Result};
use crate::license::{LicenseDescriptor, LicenseInstaller};
use crate::manifest::{self, PackageProperties};
use crate::progress::{self, ProgressDisplay};
use crate::report;
use crate::resource::{ResourceKind, ResourceStore};
use crate::service::{self, DeploymentService};
use crate::stage::StagedPackage;

/// Catalog role of a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentBehavior {
    /// Shared dependency other packages declare; gets cross-architecture
    /// allowances and is never provisioned
    Framework,
    /// Independently provisioned application package
    Application,
}

/// Catalog entry for an embedded package
#[derive(Debug, Clone, Copy)]
pub struct PackageDescriptor<'a> {
    /// Resource identifier of the package image
    pub resource_id: &'a str,
    pub behavior: DeploymentBehavior,
}

/// Furthest stage reached while deploying the current package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallStage {
    #[default]
    None,
    InstallLicense,
    GetPackageProperties,
    CreatePackageUri,
    AddPackage,
    RegisterPackage,
    ProvisionPackage,
}

/// Diagnostic detail captured from a failed deployment operation
#[derive(Debug, Clone, Default)]
pub struct DeploymentErrorContext {
    pub extended_code: u32,
    pub error_text: String,
    pub activity_id: Option<Uuid>,
}

impl DeploymentErrorContext {
    /// Copy the secondary diagnostic fields out of a failed result
    pub fn capture(&mut self, result: &service::DeploymentResult) {
        self.extended_code = result.extended_code;
        self.error_text = result.error_text.clone();
        self.activity_id = result.activity_id;
    }
}

/// Per-package workflow state, fresh for every package
#[derive(Debug, Clone, Default)]
pub struct DeployContext {
    pub stage: InstallStage,
    pub error: DeploymentErrorContext,
}

impl DeployContext {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Side effects the orchestrator performs
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Suppress per-package progress and result lines
    pub quiet: bool,
    /// Evaluate applicability but skip staging, add and provision calls
    pub dry_run: bool,
    pub install_packages: bool,
    pub install_licenses: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            quiet: false,
            dry_run: false,
            install_packages: true,
            install_licenses: true,
        }
    }
}

/// Deployment orchestrator over a deployment service backend
pub struct Deployer<'a> {
    service: &'a dyn DeploymentService,
    native_arch: Architecture,
    options: Options,
}

impl<'a> Deployer<'a> {
    /// Create an orchestrator for the current machine
    pub fn new(service: &'a dyn DeploymentService, options: Options) -> Result<Self> {
        Ok(Self {
            service,
            native_arch: arch::native_architecture()?,
            options,
        })
    }

    /// Create an orchestrator for an explicit machine architecture
    pub fn with_native_arch(
        service: &'a dyn DeploymentService,
        options: Options,
        native_arch: Architecture,
    ) -> Self {
        Self {
            service,
            native_arch,
            options,
        }
    }

    /// Install all licenses, then deploy all packages
    pub fn run(
        &self,
        store: &ResourceStore<'_>,
        packages: &[PackageDescriptor<'_>],
        licenses: &[LicenseDescriptor<'_>],
        licensing: &dyn LicenseInstaller,
    ) -> Result<()> {
        self.install_licenses(store, licenses, licensing)?;
        self.deploy_packages(store, packages)
    }

    /// Install the license catalog, aborting on the first failure
    pub fn install_licenses(
        &self,
        store: &ResourceStore<'_>,
        licenses: &[LicenseDescriptor<'_>],
        licensing: &dyn LicenseInstaller,
    ) -> Result<()> {
        if !self.options.install_licenses {
            return Ok(());
        }

        let mut ctx = DeployContext::new();
        ctx.stage = InstallStage::InstallLicense;

        for license in licenses {
            if !self.options.quiet {
                println!("Installing license: {}", style(license.resource_id).cyan());
            }

            if self.options.dry_run {
                continue;
            }

            let bytes = store.bytes(license.resource_id, ResourceKind::License)?;
            let result = licensing.install_license(license.resource_id, bytes);
            if !self.options.quiet {
                println!(
                    "License install result: {:#010x} {}",
                    result.code,
                    report::render(result.code, &ctx)
                );
            }
            if !result.is_success() {
                return Err(DeployError::LicenseInstallFailed {
                    id: license.resource_id.to_string(),
                    code: result.code,
                });
            }
        }

        Ok(())
    }

    /// Deploy every package in catalog order, aborting on the first
    /// add/register failure
    pub fn deploy_packages(
        &self,
        store: &ResourceStore<'_>,
        packages: &[PackageDescriptor<'_>],
    ) -> Result<()> {
        if !self.options.install_packages {
            return Ok(());
        }

        let show_bar = !self.options.quiet && !self.options.dry_run && packages.len() > 1;
        let progress = show_bar.then(|| ProgressDisplay::new(packages.len() as u64));

        for (index, descriptor) in packages.iter().enumerate() {
            if let Some(display) = &progress {
                display.update_package(descriptor.resource_id, index + 1, packages.len());
            }

            // Fresh context per package: stage cursor and captured error
            // detail start zeroed and die with the package's workflow.
            let mut ctx = DeployContext::new();
            if let Err(e) = self.deploy_package(store, descriptor, &mut ctx, progress.as_ref()) {
                if let Some(display) = &progress {
                    display.abandon();
                }
                return Err(e);
            }

            if let Some(display) = &progress {
                display.inc_package();
            }
        }

        if let Some(display) = &progress {
            display.finish();
        }
        Ok(())
    }

    fn deploy_package(
        &self,
        store: &ResourceStore<'_>,
        descriptor: &PackageDescriptor<'_>,
        ctx: &mut DeployContext,
        progress: Option<&ProgressDisplay>,
    ) -> Result<()> {
        ctx.stage = InstallStage::GetPackageProperties;

        let mut stream = store.stream(descriptor.resource_id, ResourceKind::Package)?;
        let properties = manifest::read_properties(&mut stream)?;

        if !arch::is_applicable(
            properties.architecture,
            properties.is_framework,
            descriptor.behavior,
            self.native_arch,
        ) {
            if !self.options.quiet {
                progress::emit(
                    progress,
                    &format!(
                        "Skipping package: {} ({} not applicable on {})",
                        style(&properties.full_name).dim(),
                        properties.architecture,
                        self.native_arch
                    ),
                );
            }
            return Ok(());
        }

        if !self.options.quiet {
            progress::emit(
                progress,
                &format!("Deploying package: {}", style(&properties.full_name).cyan()),
            );
        }

        if self.options.dry_run {
            return Ok(());
        }

        ctx.stage = InstallStage::CreatePackageUri;

        // The deployment service wants a file-backed image; stage the stream
        // to a temp file that the guard removes on every exit path below.
        stream.seek(SeekFrom::Start(0))?;
        let staged = StagedPackage::stage(&mut stream)?;

        ctx.stage = InstallStage::AddPackage;

        let add_code = self.add_or_register(staged.path(), &properties, ctx);
        if !self.options.quiet {
            progress::emit(
                progress,
                &format!(
                    "Package deployment result: {:#010x} {}",
                    add_code,
                    report::render(add_code, ctx)
                ),
            );
        }
        if add_code != service::S_OK {
            return Err(DeployError::AddPackageFailed {
                package: properties.full_name.clone(),
                code: add_code,
            });
        }

        // Framework provisioning is not exposed by the deployment service.
        if !properties.is_framework {
            ctx.stage = InstallStage::ProvisionPackage;

            // Expected to fail without elevation; degraded but acceptable.
            let result = self.service.provision_package(&properties.family_name);
            ctx.error.activity_id = result.activity_id;
            if !self.options.quiet {
                progress::emit(
                    progress,
                    &format!(
                        "Provisioning result: {:#010x} {}",
                        result.code,
                        report::render(result.code, ctx)
                    ),
                );
            }
        }

        Ok(())
    }

    /// Add the staged package; fall back to re-registration when an
    /// equivalent package is already installed (e.g. via provisioning)
    fn add_or_register(
        &self,
        staged_path: &std::path::Path,
        properties: &PackageProperties,
        ctx: &mut DeployContext,
    ) -> u32 {
        let result = self.service.add_package(staged_path);
        if result.is_success() {
            return service::S_OK;
        }

        if result.is_already_exists() {
            ctx.stage = InstallStage::RegisterPackage;
            let registered = self.service.register_package(&properties.full_name);
            if registered.is_success() {
                return service::S_OK;
            }
            ctx.error.capture(&registered);
            return registered.code;
        }

        ctx.error.capture(&result);
        result.code
    }
}
