//! Build manifest recording the content hash of every emitted file.
//!
//! The manifest is stored as `kiln-manifest.json` next to the generated
//! sources. Comparing it against the files on disk tells which outputs
//! changed since the last build.

use std::collections::BTreeMap;
use std::path::Path;

use kiln_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::EmitError;

/// Name of the manifest file within the output directory.
pub const MANIFEST_FILE: &str = "kiln-manifest.json";

/// Summary of one completed build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Kiln version that produced the build.
    pub kiln_version: String,

    /// Combined hash over all file names and contents.
    pub digest: ContentHash,

    /// Per-file content hashes, keyed by slash-separated relative path.
    pub files: BTreeMap<String, ContentHash>,
}

impl BuildManifest {
    /// Creates a manifest from precomputed hashes.
    pub fn new(kiln_version: &str, digest: ContentHash, files: BTreeMap<String, ContentHash>) -> Self {
        Self {
            kiln_version: kiln_version.to_string(),
            digest,
            files,
        }
    }

    /// Loads the manifest from `dir`, returning `None` if it is missing or
    /// unreadable.
    pub fn load(dir: &Path) -> Option<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the manifest into `dir`, creating the directory if needed.
    pub fn save(&self, dir: &Path) -> Result<(), EmitError> {
        std::fs::create_dir_all(dir).map_err(|e| EmitError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|e| EmitError::Serialization {
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| EmitError::Io { path, source: e })
    }

    /// Returns `true` if this manifest was produced by the given version.
    pub fn is_compatible(&self, current_version: &str) -> bool {
        self.kiln_version == current_version
    }

    /// Relative paths whose hash differs between `self` and `previous`,
    /// including files present in only one of the two.
    pub fn changed_since(&self, previous: &BuildManifest) -> Vec<String> {
        let mut changed: Vec<String> = self
            .files
            .iter()
            .filter(|(path, hash)| previous.files.get(*path) != Some(*hash))
            .map(|(path, _)| path.clone())
            .collect();
        changed.extend(
            previous
                .files
                .keys()
                .filter(|path| !self.files.contains_key(*path))
                .cloned(),
        );
        changed.sort();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(entries: &[(&str, &[u8])]) -> BuildManifest {
        let files: BTreeMap<String, ContentHash> = entries
            .iter()
            .map(|(p, c)| (p.to_string(), ContentHash::from_bytes(c)))
            .collect();
        let digest = ContentHash::combine(files.iter().map(|(p, h)| (p.as_str(), *h)));
        BuildManifest::new("0.1.0", digest, files)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let m = manifest(&[("net.vhd", b"net"), ("net/fc1.vhd", b"fc1")]);
        m.save(dir.path()).unwrap();
        let loaded = BuildManifest::load(dir.path()).unwrap();
        assert_eq!(loaded, m);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BuildManifest::load(dir.path()).is_none());
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "not valid json {{{").unwrap();
        assert!(BuildManifest::load(dir.path()).is_none());
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("build").join("out");
        manifest(&[]).save(&nested).unwrap();
        assert!(nested.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn compatibility() {
        let m = manifest(&[]);
        assert!(m.is_compatible("0.1.0"));
        assert!(!m.is_compatible("0.2.0"));
    }

    #[test]
    fn changed_since_reports_edits_additions_and_removals() {
        let old = manifest(&[("a.vhd", b"1"), ("b.vhd", b"2"), ("gone.vhd", b"3")]);
        let new = manifest(&[("a.vhd", b"1"), ("b.vhd", b"changed"), ("new.vhd", b"4")]);
        assert_eq!(new.changed_since(&old), vec!["b.vhd", "gone.vhd", "new.vhd"]);
        assert!(new.changed_since(&new).is_empty());
    }
}
