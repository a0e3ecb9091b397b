//! Destination that writes straight to the filesystem.

use std::path::{Path, PathBuf};

use crate::destination::{file_contents, join, validate_component, Destination};
use crate::error::EmitError;

/// A destination rooted at a directory on disk.
///
/// Files are written as soon as [`Destination::write_file`] is called and
/// parent directories are created on demand. Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct OnDiskPath {
    root: PathBuf,
    path: String,
}

impl OnDiskPath {
    /// Creates a destination rooted at `root`.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            path: String::new(),
        }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_path(&self, extension: &str) -> PathBuf {
        let mut target = self.root.clone();
        for component in self.path.split('/') {
            target.push(component);
        }
        let mut name = target.into_os_string();
        name.push(extension);
        PathBuf::from(name)
    }
}

impl Destination for OnDiskPath {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn create_subpath(&self, name: &str) -> Result<Box<dyn Destination>, EmitError> {
        validate_component(name)?;
        Ok(Box::new(Self {
            root: self.root.clone(),
            path: join(&self.path, name),
        }))
    }

    fn write_file(&self, extension: &str, lines: &[String]) -> Result<(), EmitError> {
        if self.path.is_empty() {
            return Err(EmitError::InvalidName(extension.to_string()));
        }
        let target = self.file_path(extension);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| EmitError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&target, file_contents(lines)).map_err(|e| EmitError::Io {
            path: target.clone(),
            source: e,
        })?;
        tracing::debug!(file = %target.display(), "wrote file");
        Ok(())
    }
}
