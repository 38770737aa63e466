//! End-to-end orchestrator scenarios against a scripted backend

mod common;

use appxdeploy::arch::Architecture;
use appxdeploy::deploy::{Deployer, DeploymentBehavior, Options, PackageDescriptor};
use appxdeploy::error::DeployError;
use appxdeploy::hash;
use appxdeploy::license::LicenseDescriptor;
use appxdeploy::service::{
    DeploymentResult, ERROR_ACCESS_DENIED, ERROR_INSTALL_FAILED, ERROR_PACKAGE_ALREADY_EXISTS,
};

use common::{Call, MockBackend, TEST_PUBLISHER, package_bytes, store_with};

fn quiet_options() -> Options {
    Options {
        quiet: true,
        ..Options::default()
    }
}

fn full_name(name: &str, arch: &str) -> String {
    format!("{}_1.4.0.0_{}_{}", name, arch, hash::publisher_id(TEST_PUBLISHER))
}

fn family_name(name: &str) -> String {
    format!("{}_{}", name, hash::publisher_id(TEST_PUBLISHER))
}

#[test]
fn test_applicable_application_is_added_and_provisioned() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let store = store_with(&[("main-x64", &main)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::Add(_)));
    assert_eq!(
        calls[1],
        Call::Provision(family_name("Contoso.AppRuntime.Main"))
    );
}

#[test]
fn test_framework_package_is_not_provisioned() {
    let framework = package_bytes("Contoso.AppRuntime.Framework", "x64", true);
    let store = store_with(&[("framework-x64", &framework)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "framework-x64",
        behavior: DeploymentBehavior::Framework,
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Call::Add(_)));
}

#[test]
fn test_already_exists_falls_back_to_registration() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let store = store_with(&[("main-x64", &main)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];

    // Pre-provisioned image: add reports "already exists", registration
    // succeeds, the package counts as deployed.
    let backend = MockBackend::new().script_add(DeploymentResult::failure(
        ERROR_PACKAGE_ALREADY_EXISTS,
        0,
        "",
    ));
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    let calls = backend.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], Call::Add(_)));
    assert_eq!(
        calls[1],
        Call::Register(full_name("Contoso.AppRuntime.Main", "x64"))
    );
    assert_eq!(
        calls[2],
        Call::Provision(family_name("Contoso.AppRuntime.Main"))
    );
}

#[test]
fn test_generic_add_failure_aborts_before_next_package() {
    let first = package_bytes("Contoso.AppRuntime.Framework", "x64", true);
    let second = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let store = store_with(&[("framework-x64", &first), ("main-x64", &second)], &[]);
    let packages = [
        PackageDescriptor {
            resource_id: "framework-x64",
            behavior: DeploymentBehavior::Framework,
        },
        PackageDescriptor {
            resource_id: "main-x64",
            behavior: DeploymentBehavior::Application,
        },
    ];

    let backend = MockBackend::new().script_add(DeploymentResult::failure(
        ERROR_INSTALL_FAILED,
        0,
        "install failed",
    ));
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    let err = deployer.deploy_packages(&store, &packages).unwrap_err();

    assert!(matches!(
        err,
        DeployError::AddPackageFailed { code, .. } if code == ERROR_INSTALL_FAILED
    ));
    // The second package was never attempted.
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_failed_registration_fallback_is_fatal() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let store = store_with(&[("main-x64", &main)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];

    let backend = MockBackend::new()
        .script_add(DeploymentResult::failure(ERROR_PACKAGE_ALREADY_EXISTS, 0, ""))
        .script_register(DeploymentResult::failure(
            ERROR_INSTALL_FAILED,
            0,
            "registration failed",
        ));
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    let err = deployer.deploy_packages(&store, &packages).unwrap_err();

    assert!(matches!(err, DeployError::AddPackageFailed { .. }));
    // No provisioning after a failed registration.
    assert_eq!(backend.calls().len(), 2);
}

#[test]
fn test_provision_access_denied_does_not_fail_the_run() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let singleton = package_bytes("Contoso.AppRuntime.Singleton", "neutral", false);
    let store = store_with(
        &[("main-x64", &main), ("singleton-neutral", &singleton)],
        &[],
    );
    let packages = [
        PackageDescriptor {
            resource_id: "main-x64",
            behavior: DeploymentBehavior::Application,
        },
        PackageDescriptor {
            resource_id: "singleton-neutral",
            behavior: DeploymentBehavior::Application,
        },
    ];

    // Not elevated: provisioning is denied for both, deployment still
    // completes for the current user.
    let backend = MockBackend::new()
        .script_provision(DeploymentResult::failure(ERROR_ACCESS_DENIED, 0, ""))
        .script_provision(DeploymentResult::failure(ERROR_ACCESS_DENIED, 0, ""));
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    let provisions = backend
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Provision(_)))
        .count();
    assert_eq!(provisions, 2);
}

#[test]
fn test_inapplicable_package_is_skipped_without_backend_calls() {
    let arm = package_bytes("Contoso.AppRuntime.Main", "arm64", false);
    let store = store_with(&[("main-arm64", &arm)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "main-arm64",
        behavior: DeploymentBehavior::Application,
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    assert!(backend.calls().is_empty());
}

#[test]
fn test_dry_run_inspects_but_never_touches_the_backend() {
    let framework = package_bytes("Contoso.AppRuntime.Framework", "x64", true);
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let singleton = package_bytes("Contoso.AppRuntime.Singleton", "neutral", false);
    let store = store_with(
        &[
            ("framework-x64", &framework),
            ("main-x64", &main),
            ("singleton-neutral", &singleton),
        ],
        &[],
    );
    let packages = [
        PackageDescriptor {
            resource_id: "framework-x64",
            behavior: DeploymentBehavior::Framework,
        },
        PackageDescriptor {
            resource_id: "main-x64",
            behavior: DeploymentBehavior::Application,
        },
        PackageDescriptor {
            resource_id: "singleton-neutral",
            behavior: DeploymentBehavior::Application,
        },
    ];

    let options = Options {
        quiet: true,
        dry_run: true,
        ..Options::default()
    };
    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, options, Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    assert!(backend.calls().is_empty());
}

#[test]
fn test_dry_run_still_rejects_invalid_packages() {
    let store = store_with(&[("broken", b"not a package")], &[]);
    let packages = [PackageDescriptor {
        resource_id: "broken",
        behavior: DeploymentBehavior::Application,
    }];

    let options = Options {
        quiet: true,
        dry_run: true,
        ..Options::default()
    };
    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, options, Architecture::X64);
    let err = deployer.deploy_packages(&store, &packages).unwrap_err();

    assert!(matches!(err, DeployError::InvalidPackageFormat { .. }));
}

#[test]
fn test_license_failure_aborts_before_any_package() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let license = br#"{"license": "main"}"#;
    let store = store_with(&[("main-x64", &main)], &[("main", license)]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];
    let licenses = [LicenseDescriptor {
        resource_id: "main",
    }];

    let backend = MockBackend::new().script_license(DeploymentResult::failure(
        ERROR_ACCESS_DENIED,
        0,
        "license denied",
    ));
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    let err = deployer
        .run(&store, &packages, &licenses, &backend)
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::LicenseInstallFailed { ref id, .. } if id == "main"
    ));
    // Licenses install first; no package operation ever happened.
    assert_eq!(backend.calls(), vec![Call::License("main".to_string())]);
}

#[test]
fn test_licenses_install_before_packages() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let license = br#"{"license": "main"}"#;
    let store = store_with(&[("main-x64", &main)], &[("main", license)]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];
    let licenses = [LicenseDescriptor {
        resource_id: "main",
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.run(&store, &packages, &licenses, &backend).unwrap();

    let calls = backend.calls();
    assert_eq!(calls[0], Call::License("main".to_string()));
    assert!(matches!(calls[1], Call::Add(_)));
}

#[test]
fn test_skip_flags_suppress_their_side_effects() {
    let main = package_bytes("Contoso.AppRuntime.Main", "x64", false);
    let license = br#"{"license": "main"}"#;
    let store = store_with(&[("main-x64", &main)], &[("main", license)]);
    let packages = [PackageDescriptor {
        resource_id: "main-x64",
        behavior: DeploymentBehavior::Application,
    }];
    let licenses = [LicenseDescriptor {
        resource_id: "main",
    }];

    let options = Options {
        quiet: true,
        install_packages: false,
        install_licenses: false,
        ..Options::default()
    };
    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, options, Architecture::X64);
    deployer.run(&store, &packages, &licenses, &backend).unwrap();

    assert!(backend.calls().is_empty());
}

#[test]
fn test_missing_resource_is_fatal() {
    let store = store_with(&[], &[]);
    let packages = [PackageDescriptor {
        resource_id: "does-not-exist",
        behavior: DeploymentBehavior::Application,
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    let err = deployer.deploy_packages(&store, &packages).unwrap_err();

    assert!(matches!(err, DeployError::ResourceNotFound { .. }));
}

#[test]
fn test_x86_framework_deploys_on_x64_machine() {
    let framework = package_bytes("Contoso.AppRuntime.Framework", "x86", true);
    let store = store_with(&[("framework-x86", &framework)], &[]);
    let packages = [PackageDescriptor {
        resource_id: "framework-x86",
        behavior: DeploymentBehavior::Framework,
    }];

    let backend = MockBackend::new();
    let deployer = Deployer::with_native_arch(&backend, quiet_options(), Architecture::X64);
    deployer.deploy_packages(&store, &packages).unwrap();

    assert_eq!(backend.calls().len(), 1);
}
