//! Cross-reference gamelist records and media files against the ROMs tree.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;

use retro_tidy_core::util::{file_stem_str, lowercase_extension, resolve_rel};
use retro_tidy_gamelist::{GameRecord, GamelistStore};

use crate::fsops::{FileOps, RealFs};

/// Records whose `path` does not exist under `rom_dir`, in document order.
///
/// Records without a `path` are ignored.
pub fn find_missing_records<'a>(store: &'a GamelistStore, rom_dir: &Path) -> Vec<&'a GameRecord> {
    find_missing_records_with(store, rom_dir, &RealFs)
}

/// [`find_missing_records`] against an arbitrary [`FileOps`] view.
pub fn find_missing_records_with<'a>(
    store: &'a GamelistStore,
    rom_dir: &Path,
    fs: &dyn FileOps,
) -> Vec<&'a GameRecord> {
    store
        .records()
        .filter(|rec| match rec.path() {
            Some(path) if !path.trim().is_empty() => !fs.exists(&resolve_rel(rom_dir, path)),
            _ => false,
        })
        .collect()
}

/// Stems of every file under `rom_dir`, recursively.
///
/// ES-DE treats a directory named `Foo.m3u` as a single game, so such
/// directory names are added whole.
pub fn rom_base_names(rom_dir: &Path) -> io::Result<HashSet<String>> {
    rom_base_names_with(rom_dir, &RealFs)
}

pub fn rom_base_names_with(rom_dir: &Path, fs: &dyn FileOps) -> io::Result<HashSet<String>> {
    let mut names = HashSet::new();
    for file in fs.list_files(rom_dir)? {
        if let Some(stem) = file_stem_str(&file) {
            names.insert(stem.to_string());
        }
        for dir in file
            .strip_prefix(rom_dir)
            .ok()
            .and_then(|rel| rel.parent())
            .into_iter()
            .flat_map(|parent| parent.components())
        {
            if let Some(name) = dir.as_os_str().to_str() {
                if name.to_lowercase().ends_with(".m3u") {
                    names.insert(name.to_string());
                }
            }
        }
    }
    Ok(names)
}

/// Result of scanning one system's media directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanScan {
    /// Media files with no ROM of the same base name, sorted.
    pub orphaned: Vec<PathBuf>,
    /// Number of media files that matched a ROM.
    pub kept: usize,
}

/// Media files under `media_dir` whose stem matches no file under `rom_dir`.
///
/// Only files whose lowercase extension is in `extensions` are considered.
/// Stems are compared case-sensitively.
pub fn find_orphaned_media(
    media_dir: &Path,
    rom_dir: &Path,
    extensions: &HashSet<String>,
) -> io::Result<Vec<PathBuf>> {
    let roms = rom_base_names(rom_dir)?;
    Ok(scan_media(media_dir, &roms, extensions, &RealFs)?.orphaned)
}

/// Classify every media file under `media_dir` against a base-name set.
pub fn scan_media(
    media_dir: &Path,
    rom_names: &HashSet<String>,
    extensions: &HashSet<String>,
    fs: &dyn FileOps,
) -> io::Result<OrphanScan> {
    let mut scan = OrphanScan::default();
    for file in fs.list_files(media_dir)? {
        let Some(ext) = lowercase_extension(&file) else {
            continue;
        };
        if !extensions.contains(&ext) {
            continue;
        }
        match file_stem_str(&file) {
            Some(stem) if rom_names.contains(stem) => scan.kept += 1,
            _ => {
                debug!("Orphaned media: {}", file.display());
                scan.orphaned.push(file);
            }
        }
    }
    scan.orphaned.sort();
    Ok(scan)
}

#[cfg(test)]
#[path = "tests/crossref_tests.rs"]
mod tests;
