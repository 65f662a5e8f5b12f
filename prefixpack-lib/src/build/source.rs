//! Access to raw source data.
//!
//! Getting the data onto disk (downloading files, exporting a repository
//! subtree) is somebody else's job; the builder only needs file contents and
//! a directory tree to walk.

use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, bail};
use std::fs;

/// Supplies raw input files and directory trees by name.
pub trait SourceProvider {
    /// Read the whole of one source file.
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Return the root of an exported directory tree of raw text files.
    fn export_dir(&self, name: &str) -> Result<Utf8PathBuf>;
}

/// Resolves source names relative to a local directory.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: Utf8PathBuf,
}

impl LocalSource {
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl SourceProvider for LocalSource {
    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        fs::read(&path).into_app_err_with(|| format!("reading source file '{path}'"))
    }

    fn export_dir(&self, name: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(name);
        if !path.is_dir() {
            bail!("source directory '{path}' does not exist");
        }
        Ok(path)
    }
}
