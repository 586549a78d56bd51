//! Opening dataset files as buffered streams

use crate::error::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// A dataset file on disk
#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
}

impl InputFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Open the file for reading. The handle closes when dropped.
    pub fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path).map_err(|e| Error::FileRead {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.csv");
        std::fs::write(&path, "code,eng,cym\n").unwrap();

        let mut contents = String::new();
        InputFile::new(&path)
            .open()
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "code,eng,cym\n");
    }

    #[test]
    fn test_open_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let err = InputFile::new(&path).open().unwrap_err();
        assert!(matches!(err, Error::FileRead { path: ref p, .. } if p == &path));
    }
}
