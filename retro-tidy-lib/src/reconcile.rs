//! The reconciliation driver: run the requested passes over every system
//! of a library and collect a [`RunReport`].

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;

use retro_tidy_gamelist::{GamelistStore, SaveOutcome, backup_path};

use crate::consolidate::Consolidator;
use crate::crossref::{find_missing_records_with, rom_base_names_with, scan_media};
use crate::fsops::{DryRunFs, FileOps, RealFs};
use crate::report::{RunReport, SkippedSystem, SystemReport};
use crate::settings::{Settings, subdirectory_names};
use crate::TidyError;

/// One kind of repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// Replace multi-disc entries with `.m3u` playlists.
    Consolidate,
    /// Remove gamelist entries whose ROM is missing.
    Prune,
    /// Delete media files that match no ROM.
    Orphans,
}

impl Pass {
    /// Every pass, in the order they run.
    pub const ALL: [Pass; 3] = [Pass::Consolidate, Pass::Prune, Pass::Orphans];
}

/// Options controlling a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Report what would change without touching anything.
    pub dry_run: bool,
    /// Copy each gamelist to `gamelist.xml.bak` before rewriting it.
    pub create_backup: bool,
    pub passes: Vec<Pass>,
    /// Only process these systems (by directory name).
    pub systems: Option<Vec<String>>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            create_backup: true,
            passes: Pass::ALL.to_vec(),
            systems: None,
        }
    }
}

impl ReconcileOptions {
    pub fn with_passes(passes: &[Pass]) -> Self {
        Self {
            passes: passes.to_vec(),
            ..Default::default()
        }
    }

    fn runs(&self, pass: Pass) -> bool {
        self.passes.contains(&pass)
    }
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum ReconcileProgress {
    /// Systems found across the library roots.
    Discovered { system_count: usize },
    /// Starting work on a system.
    System {
        name: String,
        index: usize,
        total: usize,
    },
    Done,
}

/// Run the requested passes over every system of the library.
///
/// Only a missing or unconfigured root is fatal; everything that goes wrong
/// inside a system is recorded in that system's report.
pub fn reconcile(
    settings: &Settings,
    options: &ReconcileOptions,
    progress: &dyn Fn(ReconcileProgress),
) -> Result<RunReport, TidyError> {
    check_roots(settings, options)?;
    let systems = discover_systems(settings, options.systems.as_deref())?;
    progress(ReconcileProgress::Discovered {
        system_count: systems.len(),
    });

    let mut fs: Box<dyn FileOps> = if options.dry_run {
        Box::new(DryRunFs::new())
    } else {
        Box::new(RealFs)
    };

    let mut report = RunReport {
        dry_run: options.dry_run,
        ..Default::default()
    };
    let total = systems.len();
    for (index, name) in systems.into_iter().enumerate() {
        progress(ReconcileProgress::System {
            name: name.clone(),
            index,
            total,
        });
        if !settings.rom_dir(&name).is_dir() {
            debug!("Skipping {name}: no ROM directory");
            report.skipped.push(SkippedSystem {
                name,
                reason: "no ROM directory".to_string(),
            });
            continue;
        }
        report
            .systems
            .push(reconcile_system(settings, options, fs.as_mut(), &name));
    }
    progress(ReconcileProgress::Done);
    Ok(report)
}

fn check_roots(settings: &Settings, options: &ReconcileOptions) -> Result<(), TidyError> {
    if !settings.roms_root.is_dir() {
        return Err(TidyError::missing_root("ROMs", &settings.roms_root));
    }
    if let Some(root) = &settings.gamelists_root {
        if !root.is_dir() {
            return Err(TidyError::missing_root("Gamelists", root));
        }
    }
    if options.runs(Pass::Orphans) {
        let root = settings
            .media_root
            .as_ref()
            .ok_or(TidyError::NotConfigured("media root"))?;
        if !root.is_dir() {
            return Err(TidyError::missing_root("Media", root));
        }
    }
    Ok(())
}

/// Sorted union of the system directories under every configured root,
/// restricted to `filter` when given.
pub fn discover_systems(
    settings: &Settings,
    filter: Option<&[String]>,
) -> Result<Vec<String>, TidyError> {
    let mut names = BTreeSet::new();
    let roots = [
        Some(&settings.roms_root),
        settings.gamelists_root.as_ref(),
        settings.media_root.as_ref(),
    ];
    for root in roots.into_iter().flatten() {
        if root.is_dir() {
            names.extend(subdirectory_names(root)?);
        }
    }
    Ok(names
        .into_iter()
        .filter(|name| filter.is_none_or(|wanted| wanted.iter().any(|w| w == name)))
        .collect())
}

fn reconcile_system(
    settings: &Settings,
    options: &ReconcileOptions,
    fs: &mut dyn FileOps,
    system: &str,
) -> SystemReport {
    let mut report = SystemReport::new(system);
    let rom_dir = settings.rom_dir(system);
    let gamelist = settings.gamelist_path(system);

    // A system without a gamelist still gets the filesystem passes.
    let (mut store, saveable) = if gamelist.is_file() {
        match GamelistStore::load(&gamelist) {
            Ok(store) => (Some(store), true),
            Err(e) if e.is_format_problem() => {
                warn!("{}: {e}", gamelist.display());
                report
                    .warnings
                    .push(format!("{}: {e}; gamelist left untouched", gamelist.display()));
                (None, false)
            }
            Err(e) => {
                report.errors.push(format!("{}: {e}", gamelist.display()));
                (None, false)
            }
        }
    } else {
        debug!("{system}: no gamelist at {}", gamelist.display());
        (Some(GamelistStore::empty()), false)
    };

    if let Some(store) = store.as_mut() {
        report.total_records = store.len();

        if options.runs(Pass::Consolidate) {
            let extensions: HashSet<String> = settings.disc_extensions.iter().cloned().collect();
            let mut consolidator = Consolidator::new(&rom_dir, &settings.image_dir, &mut *fs);
            match consolidator.run(store, &extensions) {
                Ok(titles) => report.consolidated = titles,
                Err(e) => report.errors.push(e.to_string()),
            }
        }

        if options.runs(Pass::Prune) {
            let missing: Vec<String> = find_missing_records_with(store, &rom_dir, &*fs)
                .into_iter()
                .filter_map(|rec| rec.path().map(str::to_string))
                .collect();
            for path in missing {
                debug!("{system}: removing entry for missing {path}");
                store.remove_by_path(&path);
                report.missing_records.push(path);
            }
        }
    }

    if options.runs(Pass::Orphans) {
        match settings.media_dir(system) {
            Some(media_dir) if media_dir.is_dir() => {
                remove_orphans(settings, fs, &rom_dir, &media_dir, &mut report);
            }
            Some(media_dir) => {
                debug!("{system}: no media folder at {}", media_dir.display());
                report.warnings.push(format!(
                    "{}: media folder not found; orphan scan skipped",
                    media_dir.display()
                ));
            }
            None => {}
        }
    }

    if let Some(store) = store.as_mut().filter(|s| saveable && s.is_modified()) {
        if options.dry_run {
            report.gamelist_updated = true;
            if options.create_backup && gamelist.exists() {
                report.backup = Some(backup_path(&gamelist));
            }
        } else {
            match store.save(&gamelist, options.create_backup) {
                Ok(SaveOutcome::Written { backup }) => {
                    report.gamelist_updated = true;
                    report.backup = backup;
                }
                Ok(SaveOutcome::Unchanged) => {}
                Err(e) => report.errors.push(format!("{}: {e}", gamelist.display())),
            }
        }
    }

    report
}

fn remove_orphans(
    settings: &Settings,
    fs: &mut dyn FileOps,
    rom_dir: &Path,
    media_dir: &Path,
    report: &mut SystemReport,
) {
    let extensions: HashSet<String> = settings.media_extensions.iter().cloned().collect();
    let scan = rom_base_names_with(rom_dir, &*fs)
        .and_then(|roms| scan_media(media_dir, &roms, &extensions, &*fs));
    let scan = match scan {
        Ok(scan) => scan,
        Err(e) => {
            report
                .errors
                .push(TidyError::file_op("scan", media_dir, e).to_string());
            return;
        }
    };

    report.media_kept = scan.kept;
    for file in scan.orphaned {
        match fs.remove_file(&file) {
            Ok(()) => report.orphaned_media.push(file),
            Err(e) => report
                .errors
                .push(TidyError::file_op("delete", &file, e).to_string()),
        }
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
