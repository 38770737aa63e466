//! Package staging
//!
//! The deployment service consumes packages from a file-addressable location,
//! so embedded images are copied to a uniquely named temp file first. The
//! write handle is closed before the path is handed out, and the file is
//! removed on every exit path of the surrounding workflow.

use std::env;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::{DeployError, Result};

/// Short prefix for staged package file names
const STAGE_PREFIX: &str = "apx";

/// Returns a directory path suitable for creating staged package files.
/// Never returns a relative path, so staged files are never created under the
/// current working directory (avoids repo/tmp when TMPDIR=tmp and cwd is the
/// repo).
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// A package image staged to disk, removed again when the guard goes away
///
/// Deletion is best effort: a stray temp file must never mask the primary
/// deployment error, so failures are logged to stderr and swallowed.
#[derive(Debug)]
pub struct StagedPackage {
    path: PathBuf,
    guard: Option<TempPath>,
}

impl StagedPackage {
    /// Copy the package stream to a uniquely named temp file
    pub fn stage<R: Read>(stream: &mut R) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(STAGE_PREFIX)
            .suffix(".appx")
            .tempfile_in(temp_dir_base())
            .map_err(|e| DeployError::StagingFailed {
                reason: e.to_string(),
            })?;

        io::copy(stream, &mut file).map_err(|e| DeployError::StagingFailed {
            reason: e.to_string(),
        })?;
        file.flush().map_err(|e| DeployError::StagingFailed {
            reason: e.to_string(),
        })?;

        // Closes the write handle; the guard keeps delete-on-drop semantics.
        let guard = file.into_temp_path();
        Ok(Self {
            path: guard.to_path_buf(),
            guard: Some(guard),
        })
    }

    /// Location of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the staged file now; calling this more than once is a no-op
    pub fn cleanup(&mut self) {
        if let Some(guard) = self.guard.take() {
            if let Err(e) = guard.close() {
                eprintln!(
                    "warning: failed to remove staged package {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for StagedPackage {
    fn drop(&mut self) {
        self.cleanup();
    }
}
