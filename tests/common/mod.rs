//! Shared helpers for integration tests: in-memory package images and a
//! scripted deployment backend.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;

use appxdeploy::license::LicenseInstaller;
use appxdeploy::resource::{Resource, ResourceKind, ResourceStore};
use appxdeploy::service::{DeploymentResult, DeploymentService};

pub const TEST_PUBLISHER: &str = "CN=Contoso Corporation, O=Contoso, C=US";

/// Build a package image in memory: a zip with a manifest.json and payload
pub fn package_bytes(name: &str, arch: &str, framework: bool) -> Vec<u8> {
    let manifest = format!(
        r#"{{
            "identity": {{
                "name": "{name}",
                "publisher": "{TEST_PUBLISHER}",
                "version": "1.4.0.0",
                "architecture": "{arch}"
            }},
            "framework": {framework}
        }}"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("manifest.json", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(manifest.as_bytes()).unwrap();
    writer
        .start_file("payload.bin", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&[0xABu8; 512]).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Build a resource store over borrowed package/license bytes
pub fn store_with<'a>(
    packages: &[(&'a str, &'a [u8])],
    licenses: &[(&'a str, &'a [u8])],
) -> ResourceStore<'a> {
    let mut entries = Vec::new();
    for &(id, bytes) in packages {
        entries.push(Resource {
            id,
            kind: ResourceKind::Package,
            bytes,
        });
    }
    for &(id, bytes) in licenses {
        entries.push(Resource {
            id,
            kind: ResourceKind::License,
            bytes,
        });
    }
    ResourceStore::new(entries)
}

/// One recorded backend invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(PathBuf),
    Register(String),
    Provision(String),
    License(String),
}

/// Deployment and licensing backend with scripted results
///
/// Each operation pops the next scripted result for that operation, or
/// reports success once the script runs out. Every invocation is recorded
/// in order.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub calls: RefCell<Vec<Call>>,
    add_results: RefCell<VecDeque<DeploymentResult>>,
    register_results: RefCell<VecDeque<DeploymentResult>>,
    provision_results: RefCell<VecDeque<DeploymentResult>>,
    license_results: RefCell<VecDeque<DeploymentResult>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_add(self, result: DeploymentResult) -> Self {
        self.add_results.borrow_mut().push_back(result);
        self
    }

    pub fn script_register(self, result: DeploymentResult) -> Self {
        self.register_results.borrow_mut().push_back(result);
        self
    }

    pub fn script_provision(self, result: DeploymentResult) -> Self {
        self.provision_results.borrow_mut().push_back(result);
        self
    }

    pub fn script_license(self, result: DeploymentResult) -> Self {
        self.license_results.borrow_mut().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(queue: &RefCell<VecDeque<DeploymentResult>>) -> DeploymentResult {
        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(DeploymentResult::success)
    }
}

impl DeploymentService for MockBackend {
    fn add_package(&self, package_path: &Path) -> DeploymentResult {
        self.calls
            .borrow_mut()
            .push(Call::Add(package_path.to_path_buf()));
        Self::next(&self.add_results)
    }

    fn register_package(&self, full_name: &str) -> DeploymentResult {
        self.calls
            .borrow_mut()
            .push(Call::Register(full_name.to_string()));
        Self::next(&self.register_results)
    }

    fn provision_package(&self, family_name: &str) -> DeploymentResult {
        self.calls
            .borrow_mut()
            .push(Call::Provision(family_name.to_string()));
        Self::next(&self.provision_results)
    }
}

impl LicenseInstaller for MockBackend {
    fn install_license(&self, id: &str, _license: &[u8]) -> DeploymentResult {
        self.calls.borrow_mut().push(Call::License(id.to_string()));
        Self::next(&self.license_results)
    }
}
