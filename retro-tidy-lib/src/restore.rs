//! Undo a consolidation run from its backups.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use retro_tidy_core::detect_disc_sets;
use retro_tidy_gamelist::{backup_path, restore_backup};

use crate::TidyError;
use crate::fsops::list_file_names;
use crate::reconcile::discover_systems;
use crate::settings::Settings;

/// Options controlling a restore.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub dry_run: bool,
    /// Also delete the `.m3u` playlists the consolidator would generate.
    pub remove_playlists: bool,
    pub systems: Option<Vec<String>>,
}

/// What a restore did (or would do).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub dry_run: bool,
    /// Gamelists copied back from their `.bak`.
    pub restored: Vec<PathBuf>,
    /// Image folders replaced by their `.bak` copy.
    pub images_restored: Vec<PathBuf>,
    pub playlists_removed: Vec<PathBuf>,
    pub errors: Vec<String>,
}

/// Restore every system's `gamelist.xml.bak` and, when a `<image dir>.bak`
/// folder exists next to the image folder, the disc images too.
pub fn restore_backups(
    settings: &Settings,
    options: &RestoreOptions,
) -> Result<RestoreReport, TidyError> {
    if !settings.roms_root.is_dir() {
        return Err(TidyError::missing_root("ROMs", &settings.roms_root));
    }
    let mut report = RestoreReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    let extensions: HashSet<String> = settings.disc_extensions.iter().cloned().collect();

    for system in discover_systems(settings, options.systems.as_deref())? {
        let gamelist = settings.gamelist_path(&system);
        if backup_path(&gamelist).is_file() {
            if options.dry_run {
                report.restored.push(gamelist);
            } else {
                match restore_backup(&gamelist) {
                    Ok(_) => report.restored.push(gamelist),
                    Err(e) => report.errors.push(format!("{}: {e}", gamelist.display())),
                }
            }
        }

        let rom_dir = settings.rom_dir(&system);
        if !rom_dir.is_dir() {
            continue;
        }

        let images = rom_dir.join(&settings.image_dir);
        let images_backup = rom_dir.join(format!("{}.bak", settings.image_dir));
        if images_backup.is_dir() {
            if options.dry_run {
                report.images_restored.push(images);
            } else {
                match replace_dir(&images_backup, &images) {
                    Ok(()) => report.images_restored.push(images),
                    Err(e) => report.errors.push(
                        TidyError::file_op("restore", &images, e).to_string(),
                    ),
                }
            }
        }

        if options.remove_playlists {
            remove_generated_playlists(&rom_dir, &extensions, options.dry_run, &mut report);
        }
    }
    Ok(report)
}

/// Delete each `<Title>.m3u` that has a `<Title> (Disc 1)` sibling.
fn remove_generated_playlists(
    rom_dir: &Path,
    extensions: &HashSet<String>,
    dry_run: bool,
    report: &mut RestoreReport,
) {
    let files = match list_file_names(rom_dir) {
        Ok(files) => files,
        Err(e) => {
            report
                .errors
                .push(TidyError::file_op("list", rom_dir, e).to_string());
            return;
        }
    };
    let playlists: BTreeSet<String> = detect_disc_sets(&files, extensions)
        .iter()
        .map(|set| set.playlist_name())
        .collect();

    for name in playlists {
        let path = rom_dir.join(&name);
        if !path.is_file() {
            continue;
        }
        debug!("Removing playlist {}", path.display());
        if dry_run {
            report.playlists_removed.push(path);
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => report.playlists_removed.push(path),
            Err(e) => report
                .errors
                .push(TidyError::file_op("delete", &path, e).to_string()),
        }
    }
}

/// Replace `target` with a recursive copy of `source`.
fn replace_dir(source: &Path, target: &Path) -> io::Result<()> {
    if target.exists() {
        fs::remove_dir_all(target)?;
    }
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(io::Error::other)?;
        let dest = target.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/restore_tests.rs"]
mod tests;
