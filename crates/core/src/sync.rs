//! Output directory synchronization.
//!
//! Writes only modules whose content hash changed, removes generated files
//! that are no longer produced, and regenerates the directory's index.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::INDEX_NAME;
use crate::error::{Error, Result};

/// One module to place in the synchronized directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    /// Name of the symbol the module holds.
    pub symbol: String,
    /// File name without extension, already converted to the active naming convention.
    pub stem: String,
    pub content: String,
}

impl ModuleFile {
    pub fn new(symbol: impl Into<String>, stem: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            stem: stem.into(),
            content: content.into(),
        }
    }
}

/// What a synchronization pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    /// Stale files that could not be removed.
    pub failed_deletions: Vec<PathBuf>,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.written.extend(other.written);
        self.unchanged.extend(other.unchanged);
        self.deleted.extend(other.deleted);
        self.failed_deletions.extend(other.failed_deletions);
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_deletions.is_empty()
    }
}

/// SHA-256 of `content` with `\r\n` normalized to `\n`, hex encoded.
pub fn content_hash(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Write `content` to `path` unless the file already holds the same text.
///
/// Returns `true` when the file was written.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    match fs::read_to_string(path) {
        Ok(existing) if content_hash(&existing) == content_hash(content) => {
            debug!(path = %path.display(), "Unchanged");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(path = %path.display(), "Existing file is not UTF-8, overwriting");
        }
        Err(source) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    write_atomic(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote module");
    Ok(true)
}

/// Write through a temporary file in the same directory, then rename over `path`.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_err = |source: io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Removes one file from disk.
pub type RemoveFn = fn(&Path) -> io::Result<()>;

/// Keeps one directory in step with a set of generated modules.
#[derive(Debug, Clone)]
pub struct DirectorySynchronizer {
    dir: PathBuf,
    extension: String,
    /// Stems written by someone else that cleanup must leave alone.
    preserved: Vec<String>,
    remove: RemoveFn,
}

impl DirectorySynchronizer {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            preserved: Vec::new(),
            remove: remove_file,
        }
    }

    pub fn preserve(mut self, stem: impl Into<String>) -> Self {
        self.preserved.push(stem.into());
        self
    }

    /// Replace how stale files and the previous index are removed.
    pub fn with_remover(mut self, remove: RemoveFn) -> Self {
        self.remove = remove;
        self
    }

    fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.extension))
    }

    /// Write changed modules, delete stale ones, then rewrite the index.
    ///
    /// A failed write aborts the pass. A failed deletion is recorded in the
    /// report and the pass continues.
    pub fn sync(&self, files: &[ModuleFile]) -> Result<SyncReport> {
        self.check_collisions(files)?;
        fs::create_dir_all(&self.dir).map_err(|source| Error::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut report = SyncReport::default();
        for file in files {
            let path = self.path_for(&file.stem);
            if write_if_changed(&path, &file.content)? {
                report.written.push(path);
            } else {
                report.unchanged.push(path);
            }
        }

        // Listing is taken only after every write has landed.
        for path in self.stale_files(files) {
            match (self.remove)(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), "Removed stale module");
                    report.deleted.push(path);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove stale module");
                    report.failed_deletions.push(path);
                }
            }
        }

        self.write_index(files, &mut report)?;

        debug!(
            dir = %self.dir.display(),
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            deleted = report.deleted.len(),
            "Synchronized directory"
        );
        Ok(report)
    }

    /// Two stems that differ only in case would land on the same file on
    /// case-insensitive filesystems, so they count as a collision too.
    fn check_collisions(&self, files: &[ModuleFile]) -> Result<()> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        for stem in self.preserved.iter().map(String::as_str).chain([INDEX_NAME]) {
            owners.insert(stem.to_lowercase(), stem);
        }
        for file in files {
            if let Some(first) = owners.insert(file.stem.to_lowercase(), &file.symbol) {
                return Err(Error::NamingCollision {
                    file: self.path_for(&file.stem),
                    first: first.to_string(),
                    second: file.symbol.clone(),
                });
            }
        }
        Ok(())
    }

    fn stale_files(&self, files: &[ModuleFile]) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| {
                path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
            })
            .filter(|path| {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    return false;
                };
                stem != INDEX_NAME
                    && !self.preserved.iter().any(|p| p == stem)
                    && !files.iter().any(|f| f.stem == stem)
            })
            .collect()
    }

    fn write_index(&self, files: &[ModuleFile], report: &mut SyncReport) -> Result<()> {
        let path = self.path_for(INDEX_NAME);
        match (self.remove)(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove previous index");
                report.failed_deletions.push(path.clone());
            }
        }
        write_atomic(&path, &render_index(files))?;
        report.written.push(path);
        Ok(())
    }
}

fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

/// One `export * from './stem';` line per module, in the given order.
pub fn render_index(files: &[ModuleFile]) -> String {
    let mut out = String::new();
    for file in files {
        out.push_str(&format!("export * from './{}';\n", file.stem));
    }
    out
}
