//! appxdeploy - self-contained MSIX catalog installer
//!
//! Takes a compiled-in catalog of package images, decides which are
//! applicable to the running machine, stages them to disk, installs them
//! through the OS package manager and provisions application packages for
//! all users. Failures keep the OS-provided diagnostic detail (extended
//! error code, error text, activity id) attached to the package and stage
//! that produced them.

pub mod arch;
pub mod catalog;
pub mod cli;
pub mod deploy;
pub mod error;
pub mod hash;
pub mod license;
pub mod manifest;
pub mod progress;
pub mod report;
pub mod resource;
pub mod service;
pub mod stage;

pub use error::{DeployError, Result};
