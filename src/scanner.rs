//! Discovery of `.pretty` report files in a data folder.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HitError, Result};

/// File name suffix of the report format
pub const PRETTY_SUFFIX: &str = ".pretty";

/// Files found in one data folder, sorted by path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrettyScan {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl PrettyScan {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// List the `*.pretty` regular files directly inside `dir`.
///
/// A missing directory is an error; a directory without matching files is
/// returned as an empty scan so the caller decides whether that is fatal.
pub fn scan_pretty_files<P: AsRef<Path>>(dir: P) -> Result<PrettyScan> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(HitError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_pretty_file(&path) {
            continue;
        }
        files.push(path);
    }

    // read_dir order is platform dependent
    files.sort();

    if files.is_empty() {
        log::warn!("No *.pretty files found in '{}'", dir.display());
    } else {
        log::info!("Found {} *.pretty files in '{}'", files.len(), dir.display());
    }

    Ok(PrettyScan {
        dir: dir.to_path_buf(),
        files,
    })
}

// Compared as raw bytes so names that are not valid UTF-8 are still found
fn is_pretty_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.as_encoded_bytes();
            !name.starts_with(b".") && name.ends_with(PRETTY_SUFFIX.as_bytes())
        })
        .unwrap_or(false)
}
