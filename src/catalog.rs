//! Compiled-in package and license catalogs
//!
//! The installer is self-contained: the package images under
//! `resources/packages/` are embedded at build time and deployed in the
//! order listed here (frameworks first, so dependent packages resolve).
//! Release pipelines swap the payloads; the ids and roles stay.

use crate::deploy::{DeploymentBehavior, PackageDescriptor};
use crate::license::LicenseDescriptor;
use crate::resource::{Resource, ResourceKind, ResourceStore};

macro_rules! package_bytes {
    ($name:literal) => {
        include_bytes!(concat!("../resources/packages/", $name))
    };
}

#[cfg(feature = "licenses")]
macro_rules! license_bytes {
    ($name:literal) => {
        include_bytes!(concat!("../resources/licenses/", $name))
    };
}

/// Embedded resource store backing the compiled-in catalogs
pub fn embedded_store() -> ResourceStore<'static> {
    let mut entries = vec![
        Resource {
            id: "framework-x86",
            kind: ResourceKind::Package,
            bytes: package_bytes!("framework-x86.appx"),
        },
        Resource {
            id: "framework-x64",
            kind: ResourceKind::Package,
            bytes: package_bytes!("framework-x64.appx"),
        },
        Resource {
            id: "framework-arm64",
            kind: ResourceKind::Package,
            bytes: package_bytes!("framework-arm64.appx"),
        },
        Resource {
            id: "main-x64",
            kind: ResourceKind::Package,
            bytes: package_bytes!("main-x64.appx"),
        },
        Resource {
            id: "main-arm64",
            kind: ResourceKind::Package,
            bytes: package_bytes!("main-arm64.appx"),
        },
        Resource {
            id: "singleton-neutral",
            kind: ResourceKind::Package,
            bytes: package_bytes!("singleton-neutral.appx"),
        },
    ];

    #[cfg(feature = "licenses")]
    entries.extend([
        Resource {
            id: "main",
            kind: ResourceKind::License,
            bytes: license_bytes!("main.lic"),
        },
        Resource {
            id: "singleton",
            kind: ResourceKind::License,
            bytes: license_bytes!("singleton.lic"),
        },
    ]);

    ResourceStore::new(entries)
}

/// Ordered package catalog
pub fn packages() -> &'static [PackageDescriptor<'static>] {
    &[
        PackageDescriptor {
            resource_id: "framework-x86",
            behavior: DeploymentBehavior::Framework,
        },
        PackageDescriptor {
            resource_id: "framework-x64",
            behavior: DeploymentBehavior::Framework,
        },
        PackageDescriptor {
            resource_id: "framework-arm64",
            behavior: DeploymentBehavior::Framework,
        },
        PackageDescriptor {
            resource_id: "main-x64",
            behavior: DeploymentBehavior::Application,
        },
        PackageDescriptor {
            resource_id: "main-arm64",
            behavior: DeploymentBehavior::Application,
        },
        PackageDescriptor {
            resource_id: "singleton-neutral",
            behavior: DeploymentBehavior::Application,
        },
    ]
}

/// Ordered license catalog, installed before any package
#[cfg(feature = "licenses")]
pub fn licenses() -> &'static [LicenseDescriptor<'static>] {
    &[
        LicenseDescriptor { resource_id: "main" },
        LicenseDescriptor {
            resource_id: "singleton",
        },
    ]
}

#[cfg(not(feature = "licenses"))]
pub fn licenses() -> &'static [LicenseDescriptor<'static>] {
    &[]
}
