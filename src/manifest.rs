//! Package manifest inspection
//!
//! A package image is a zip archive carrying a `manifest.json` with the
//! package identity. Inspection parses the manifest and derives the full and
//! family names the deployment service keys on.

use std::fmt;
use std::io::{Read, Seek};
use std::str::FromStr;

use serde::Deserialize;

use crate::arch::Architecture;
use crate::error::{DeployError, Result};
use crate::hash;

/// Manifest file name inside a package archive
const MANIFEST_NAME: &str = "manifest.json";

/// Package version as a dotted quad (`major.minor.build.revision`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl FromStr for Version {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 4 {
            return Err(DeployError::InvalidPackageFormat {
                reason: format!("version '{}' is not a dotted quad", s),
            });
        }
        let mut quad = [0u16; 4];
        for (slot, part) in quad.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| DeployError::InvalidPackageFormat {
                    reason: format!("version '{}' has a non-numeric component", s),
                })?;
        }
        Ok(Version {
            major: quad[0],
            minor: quad[1],
            build: quad[2],
            revision: quad[3],
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Identity attributes extracted from a package manifest
#[derive(Debug, Clone)]
pub struct PackageProperties {
    /// `name_version_architecture_publisherId`
    pub full_name: String,
    /// `name_publisherId`
    pub family_name: String,
    pub architecture: Architecture,
    pub version: Version,
    pub is_framework: bool,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    identity: RawIdentity,
    #[serde(default)]
    framework: bool,
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    name: String,
    publisher: String,
    version: String,
    architecture: Architecture,
}

/// Read package identity from an open package stream
///
/// The stream position is unspecified afterwards; callers that go on to
/// stage the package rewind it first.
pub fn read_properties<R: Read + Seek>(stream: &mut R) -> Result<PackageProperties> {
    let mut archive =
        zip::ZipArchive::new(stream).map_err(|e| DeployError::InvalidPackageFormat {
            reason: format!("not a package archive: {}", e),
        })?;

    let manifest_file =
        archive
            .by_name(MANIFEST_NAME)
            .map_err(|_| DeployError::InvalidPackageFormat {
                reason: format!("archive has no {}", MANIFEST_NAME),
            })?;

    let raw: RawManifest = serde_json::from_reader(manifest_file)?;

    if raw.identity.name.is_empty() {
        return Err(DeployError::InvalidPackageFormat {
            reason: "manifest identity has an empty name".to_string(),
        });
    }
    if raw.identity.publisher.is_empty() {
        return Err(DeployError::InvalidPackageFormat {
            reason: "manifest identity has an empty publisher".to_string(),
        });
    }

    let version = Version::from_str(&raw.identity.version)?;
    let publisher_id = hash::publisher_id(&raw.identity.publisher);

    Ok(PackageProperties {
        full_name: format!(
            "{}_{}_{}_{}",
            raw.identity.name, version, raw.identity.architecture, publisher_id
        ),
        family_name: format!("{}_{}", raw.identity.name, publisher_id),
        architecture: raw.identity.architecture,
        version,
        is_framework: raw.framework,
    })
}
