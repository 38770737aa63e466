//! Embedded resource store
//!
//! Package and license images are compiled into the installer binary. The
//! store looks an image up by (identifier, kind) and exposes it as a
//! random-access byte stream; the archive reader needs to seek.

use std::fmt;
use std::io::Cursor;

use crate::error::{DeployError, Result};

/// Kind of an embedded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A package image (`.appx` archive)
    Package,
    /// A license blob
    License,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Package => write!(f, "package"),
            ResourceKind::License => write!(f, "license"),
        }
    }
}

/// A single embedded resource
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    /// Resource identifier (unique per kind)
    pub id: &'a str,
    pub kind: ResourceKind,
    pub bytes: &'a [u8],
}

/// Lookup table over embedded resources
#[derive(Debug, Clone, Default)]
pub struct ResourceStore<'a> {
    entries: Vec<Resource<'a>>,
}

impl<'a> ResourceStore<'a> {
    pub fn new(entries: Vec<Resource<'a>>) -> Self {
        Self { entries }
    }

    /// Raw bytes of a resource, or `ResourceNotFound`
    pub fn bytes(&self, id: &str, kind: ResourceKind) -> Result<&'a [u8]> {
        self.entries
            .iter()
            .find(|r| r.kind == kind && r.id == id)
            .map(|r| r.bytes)
            .ok_or_else(|| DeployError::ResourceNotFound {
                id: id.to_string(),
                kind: kind.to_string(),
            })
    }

    /// A seekable stream over a resource's bytes
    pub fn stream(&self, id: &str, kind: ResourceKind) -> Result<Cursor<&'a [u8]>> {
        Ok(Cursor::new(self.bytes(id, kind)?))
    }
}
