//! In-memory destination tree.
//!
//! A build renders every file into an [`InMemoryPath`] first. Only when the
//! whole network has been generated without error is the tree flushed to
//! disk, so a failing build never leaves partial artifacts behind.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use kiln_common::ContentHash;

use crate::destination::{file_contents, join, validate_component, Destination};
use crate::error::EmitError;
use crate::manifest::BuildManifest;

type FileTree = Rc<RefCell<BTreeMap<String, Vec<String>>>>;

/// A destination that collects files in memory.
///
/// Clones and sub-paths share the same underlying file set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPath {
    path: String,
    files: FileTree,
}

impl InMemoryPath {
    /// Creates an empty root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Relative paths of every file written so far, sorted.
    pub fn files(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    /// The lines of the file at `path`, if it exists.
    pub fn lines(&self, path: &str) -> Option<Vec<String>> {
        self.files.borrow().get(path).cloned()
    }

    /// The contents of the file at `path` as one newline-terminated string.
    pub fn text(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).map(|lines| file_contents(lines))
    }

    /// Number of files written.
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    /// Returns true if no file has been written.
    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    /// Per-file content hashes keyed by relative path.
    pub fn hashes(&self) -> BTreeMap<String, ContentHash> {
        self.files
            .borrow()
            .iter()
            .map(|(path, lines)| (path.clone(), ContentHash::from_lines(lines)))
            .collect()
    }

    /// A single hash over all file names and contents.
    ///
    /// Two builds produce the same digest exactly when they produce the same
    /// files with byte-identical contents.
    pub fn digest(&self) -> ContentHash {
        let hashes = self.hashes();
        ContentHash::combine(hashes.iter().map(|(path, hash)| (path.as_str(), *hash)))
    }

    /// Builds the manifest describing the current file set.
    pub fn manifest(&self, kiln_version: &str) -> BuildManifest {
        let files = self.hashes();
        BuildManifest::new(kiln_version, self.digest(), files)
    }

    /// Writes every file below `dir`, followed by the build manifest.
    pub fn flush_to(&self, dir: &Path, kiln_version: &str) -> Result<BuildManifest, EmitError> {
        for (relative, lines) in self.files.borrow().iter() {
            let target = dir.join(relative);
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
        }
        let manifest = self.manifest(kiln_version);
        manifest.save(dir)?;
        tracing::info!(
            files = self.len(),
            digest = %manifest.digest,
            dir = %dir.display(),
            "flushed build"
        );
        Ok(manifest)
    }
}

impl Destination for InMemoryPath {
    fn path(&self) -> String {
        self.path.clone()
    }

    fn create_subpath(&self, name: &str) -> Result<Box<dyn Destination>, EmitError> {
        validate_component(name)?;
        Ok(Box::new(Self {
            path: join(&self.path, name),
            files: Rc::clone(&self.files),
        }))
    }

    fn write_file(&self, extension: &str, lines: &[String]) -> Result<(), EmitError> {
        if self.path.is_empty() {
            return Err(EmitError::InvalidName(extension.to_string()));
        }
        let key = format!("{}{extension}", self.path);
        let mut files = self.files.borrow_mut();
        if let Some(existing) = files.get(&key) {
            if existing.as_slice() != lines {
                return Err(EmitError::ConflictingWrite(key));
            }
            tracing::debug!(file = %key, "identical rewrite");
            return Ok(());
        }
        tracing::debug!(file = %key, lines = lines.len(), "wrote file");
        files.insert(key, lines.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn writes_under_subpath() {
        let root = InMemoryPath::new();
        let net = root.create_subpath("net").unwrap();
        net.write_file(".vhd", &lines(&["entity net is"])).unwrap();
        let fc1 = net.create_subpath("fc1").unwrap();
        fc1.write_file(".vhd", &lines(&["entity fc1 is"])).unwrap();

        assert_eq!(root.files(), vec!["net.vhd", "net/fc1.vhd"]);
        assert_eq!(root.text("net/fc1.vhd").unwrap(), "entity fc1 is\n");
        assert_eq!(fc1.path(), "net/fc1");
    }

    #[test]
    fn root_write_is_rejected() {
        let root = InMemoryPath::new();
        let err = root.write_file(".vhd", &lines(&["x"])).unwrap_err();
        assert!(matches!(err, EmitError::InvalidName(_)));
        assert!(root.is_empty());
    }

    #[test]
    fn invalid_subpath_name() {
        let root = InMemoryPath::new();
        assert!(root.create_subpath("a/b").is_err());
        assert!(root.create_subpath("").is_err());
    }

    #[test]
    fn identical_rewrite_is_allowed() {
        let root = InMemoryPath::new();
        let mac = root.create_subpath("fxp_mac").unwrap();
        mac.write_file(".vhd", &lines(&["a"])).unwrap();
        mac.write_file(".vhd", &lines(&["a"])).unwrap();
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn conflicting_rewrite_is_rejected() {
        let root = InMemoryPath::new();
        let rom = root.create_subpath("rom").unwrap();
        rom.write_file(".vhd", &lines(&["a"])).unwrap();
        let err = rom.write_file(".vhd", &lines(&["b"])).unwrap_err();
        assert!(matches!(err, EmitError::ConflictingWrite(ref p) if p == "rom.vhd"));
    }

    #[test]
    fn digest_tracks_contents() {
        let a = InMemoryPath::new();
        a.create_subpath("x").unwrap().write_file(".vhd", &lines(&["1"])).unwrap();
        let b = InMemoryPath::new();
        b.create_subpath("x").unwrap().write_file(".vhd", &lines(&["1"])).unwrap();
        let c = InMemoryPath::new();
        c.create_subpath("x").unwrap().write_file(".vhd", &lines(&["2"])).unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn digest_tracks_names() {
        let a = InMemoryPath::new();
        a.create_subpath("x").unwrap().write_file(".vhd", &lines(&["1"])).unwrap();
        let b = InMemoryPath::new();
        b.create_subpath("y").unwrap().write_file(".vhd", &lines(&["1"])).unwrap();
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn flush_writes_files_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let root = InMemoryPath::new();
        let net = root.create_subpath("net").unwrap();
        net.write_file(".vhd", &lines(&["top"])).unwrap();
        net.create_subpath("fc1")
            .unwrap()
            .write_file(".vhd", &lines(&["layer"]))
            .unwrap();

        let manifest = root.flush_to(dir.path(), "0.1.0").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("net/fc1.vhd")).unwrap(),
            "layer\n"
        );
        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.digest, root.digest());
        let loaded = BuildManifest::load(dir.path()).unwrap();
        assert_eq!(loaded.digest, manifest.digest);
    }

    #[test]
    fn clones_share_files() {
        let root = InMemoryPath::new();
        let copy = root.clone();
        root.create_subpath("a").unwrap().write_file(".txt", &[]).unwrap();
        assert_eq!(copy.files(), vec!["a.txt"]);
        assert_eq!(copy.text("a.txt").unwrap(), "");
    }
}
