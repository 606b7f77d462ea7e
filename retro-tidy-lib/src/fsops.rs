//! Filesystem effects behind a trait, so a dry run takes exactly the same
//! decisions as a real run without touching the disk.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// The filesystem operations used by the repair passes.
pub trait FileOps {
    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Every regular file under `root`, recursively, sorted.
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Create or replace a text file.
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()>;

    fn remove_file(&mut self, path: &Path) -> io::Result<()>;

    /// True when nothing is actually written.
    fn is_dry_run(&self) -> bool;
}

/// Performs every operation on the real filesystem.
#[derive(Debug, Default)]
pub struct RealFs;

impl FileOps for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        walk_files(root)
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Reads the real filesystem but only records writes, renames and deletes.
///
/// Later reads see the recorded changes, so a sequence of decisions made
/// against a `DryRunFs` matches the sequence a real run would make.
#[derive(Debug, Default)]
pub struct DryRunFs {
    created: HashSet<PathBuf>,
    removed: HashSet<PathBuf>,
}

impl DryRunFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn mark_created(&mut self, path: &Path) {
        self.removed.remove(path);
        self.created.insert(path.to_path_buf());
    }

    fn mark_removed(&mut self, path: &Path) {
        self.created.remove(path);
        self.removed.insert(path.to_path_buf());
    }
}

impl FileOps for DryRunFs {
    fn exists(&self, path: &Path) -> bool {
        if self.removed.contains(path) {
            return false;
        }
        self.created.contains(path) || path.exists()
    }

    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = walk_files(root)?
            .into_iter()
            .filter(|p| !self.removed.contains(p))
            .collect();
        files.extend(
            self.created
                .iter()
                .filter(|p| p.starts_with(root) && !p.exists())
                .cloned(),
        );
        files.sort();
        Ok(files)
    }

    fn write(&mut self, path: &Path, _contents: &str) -> io::Result<()> {
        self.mark_created(path);
        Ok(())
    }

    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        if !self.exists(from) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", from.display()),
            ));
        }
        self.mark_removed(from);
        self.mark_created(to);
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        if !self.exists(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        self.mark_removed(path);
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

fn walk_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Names of the regular files directly inside `dir`, sorted.
pub fn list_file_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .flatten()
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[path = "tests/fsops_tests.rs"]
mod tests;
