//! CLI definitions using clap derive API

use clap::Parser;

use crate::deploy::Options;

/// appxdeploy - self-contained MSIX catalog installer
///
/// Deploys the embedded package catalog machine-wide: licenses first, then
/// every package applicable to this machine's architecture.
#[derive(Parser, Debug)]
#[command(
    name = "appxdeploy",
    author,
    version,
    about = "Deploys the embedded MSIX package catalog machine-wide",
    long_about = "appxdeploy stages and installs an embedded catalog of MSIX packages through \
                  the OS package manager and provisions application packages for all users. \
                  Licenses are installed before any package; the run stops on the first \
                  license or add/register failure, while provisioning failures only degrade \
                  the install to the current user.",
    after_help = "EXAMPLES:\n  \
                  Install everything:\n    appxdeploy\n\n\
                  Preview what would be installed on this machine:\n    appxdeploy --dry-run\n\n\
                  Scripted install with no console output:\n    appxdeploy --quiet\n\n\
                  Packages only, keeping existing licenses:\n    appxdeploy --skip-licenses"
)]
pub struct Cli {
    /// Evaluate applicability and show what would be installed without
    /// changing the machine
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress per-package progress and result lines
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Skip package deployment
    #[arg(long)]
    pub skip_packages: bool,

    /// Skip license installation
    #[arg(long)]
    pub skip_licenses: bool,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Options {
            quiet: cli.quiet,
            dry_run: cli.dry_run,
            install_packages: !cli.skip_packages,
            install_licenses: !cli.skip_licenses,
        }
    }
}
