//! Directory scanner for locating dataset files

use crate::datasets::{DatasetCatalogue, InputFileSource};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Dataset files found under a data directory
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Directory that was scanned
    pub root: PathBuf,
    /// File name -> path of the shallowest match
    pub files: BTreeMap<String, PathBuf>,
}

impl ScanResult {
    /// Path of the file a dataset reads from, if it was found
    pub fn path_for(&self, source: &InputFileSource) -> Option<&Path> {
        self.files.get(&source.file).map(PathBuf::as_path)
    }

    /// Path for a dataset, falling back to `<root>/<file>` when the scan
    /// did not see it so that opening it reports a useful path
    pub fn resolve(&self, source: &InputFileSource) -> PathBuf {
        self.path_for(source)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.join(&source.file))
    }
}

/// Walk `root` recursively and record every file named by the catalogue.
/// When a name appears more than once the shallowest path wins.
pub fn scan_directory<P: AsRef<Path>>(root: P, catalogue: &DatasetCatalogue) -> Result<ScanResult> {
    let root = root.as_ref();

    let wanted: BTreeSet<&str> = std::iter::once(&catalogue.areas)
        .chain(catalogue.datasets.iter())
        .map(|d| d.file.as_str())
        .collect();

    let mut files: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !wanted.contains(name) {
            continue;
        }

        let depth = entry.depth();
        let shallower = files
            .get(name)
            .map_or(true, |(existing, _)| depth < *existing);
        if shallower {
            files.insert(name.to_string(), (depth, entry.path().to_path_buf()));
        }
    }

    debug!(root = %root.display(), found = files.len(), "scanned data directory");

    Ok(ScanResult {
        root: root.to_path_buf(),
        files: files.into_iter().map(|(name, (_, path))| (name, path)).collect(),
    })
}
