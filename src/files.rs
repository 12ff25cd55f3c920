//! File source and sink around the codec: which files a run covers, reading
//! them whole, and writing results without leaving partial files behind.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{HuffmanError, Result};

const IGNORED_NAMES: &[&str] = &[".DS_Store"];

fn missing_or_io(path: &Path, e: io::Error) -> HuffmanError {
    if e.kind() == io::ErrorKind::NotFound {
        HuffmanError::MissingInput { path: path.to_path_buf() }
    } else {
        HuffmanError::Io(e)
    }
}

/// Regular files named by `path`: the file itself, or with `recursive` every
/// file below a directory, in file-name order.
pub fn collect_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(path).map_err(|e| missing_or_io(path, e))?;
    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !recursive {
        return Err(HuffmanError::InvalidUsage(format!(
            "{} is a directory; pass -R to process it recursively",
            path.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let failed = e.path().unwrap_or(path).to_path_buf();
            match e.into_io_error() {
                Some(io) => missing_or_io(&failed, io),
                None => HuffmanError::InvalidUsage(format!("symlink loop at {}", failed.display())),
            }
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if IGNORED_NAMES.iter().any(|n| entry.file_name() == *n) {
            debug!(path = %entry.path().display(), "skipping");
            continue;
        }
        files.push(entry.into_path());
    }
    debug!(root = %path.display(), files = files.len(), "collected input files");
    Ok(files)
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| missing_or_io(path, e))
}

/// Creates or truncates `path` with `contents`. A failed write removes
/// whatever part of the file was created.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, contents) {
        remove_partial(path);
        return Err(HuffmanError::Io(e));
    }
    Ok(())
}

/// Best-effort removal of an output left by a failed step.
pub fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
    }
}

/// The file name of `path` minus `suffix`, compared byte for byte so names
/// that are not valid UTF-8 still match.
fn name_without_suffix<'p>(path: &'p Path, suffix: &str) -> Option<&'p OsStr> {
    let name = path.file_name()?;
    let stem = name.as_encoded_bytes().strip_suffix(suffix.as_bytes())?;
    // SAFETY: the cut sits right before `suffix`, which is valid UTF-8
    Some(unsafe { OsStr::from_encoded_bytes_unchecked(stem) })
}

pub fn has_suffix(path: &Path, suffix: &str) -> bool {
    name_without_suffix(path, suffix).is_some()
}

/// `file.txt` -> `file.txt.hcz`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// `file.txt.hcz` -> `file.txt`; `None` if the suffix is absent or is the
/// whole file name.
pub fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = name_without_suffix(path, suffix)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(stem))
}
