//! appxdeploy binary entry point

use clap::Parser;

use appxdeploy::cli::Cli;
use appxdeploy::deploy::{Deployer, Options};
use appxdeploy::service::{NullBackend, PowerShellBackend};
use appxdeploy::{Result, catalog};

fn main() {
    let cli = Cli::parse();
    let options = Options::from(&cli);

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    let store = catalog::embedded_store();
    let packages = catalog::packages();
    let licenses = catalog::licenses();

    if options.dry_run {
        // Applicability decisions are real; the backend is never invoked.
        let backend = NullBackend;
        Deployer::new(&backend, options)?.run(&store, packages, licenses, &backend)
    } else {
        let backend = PowerShellBackend::new()?;
        Deployer::new(&backend, options)?.run(&store, packages, licenses, &backend)
    }
}
