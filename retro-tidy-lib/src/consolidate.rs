//! Multi-disc consolidation: replace the per-disc entries of a game with a
//! single `.m3u` playlist entry.
//!
//! Each [`DiscSet`] is driven through a small state machine. Every step
//! checks whether its work is already done, so running the consolidator
//! again on a finished title changes nothing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use retro_tidy_core::util::{file_stem_str, join_rel, resolve_rel, split_rel, to_rel_ref};
use retro_tidy_core::{DiscSet, detect_disc_sets};
use retro_tidy_gamelist::GamelistStore;

use crate::TidyError;
use crate::fsops::{FileOps, list_file_names};

/// Progress of one title through consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleState {
    /// Nothing checked yet.
    NoPlaylist,
    /// The playlist file or its gamelist entry still has to be created.
    PlaylistMissingFile,
    /// Playlist file and entry exist; the entry's image may need renaming.
    PlaylistCreated,
    /// The image is canonical; the disc-1 entry may still be duplicated.
    MetadataUpdated,
    /// Only the discs numbered 2 and above are left to clean up.
    DuplicatesRemoved,
    Done,
}

/// A change made (or, in a dry run, planned) for a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConsolidationAction {
    WritePlaylist { path: PathBuf, discs: Vec<String> },
    RewriteRecordPath { from: String, to: String },
    RenameImage { from: PathBuf, to: PathBuf },
    /// The canonical image already existed; only the field changed.
    RepointImage { from: String, to: String },
    RemoveRecord { path: String },
    DeleteImage { path: PathBuf },
}

/// What happened to one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleReport {
    pub title: String,
    /// Gamelist reference of the playlist (`./<Title>.m3u`).
    pub playlist: String,
    /// Last state reached; anything but `Done` means the title was aborted.
    pub state: TitleState,
    pub actions: Vec<ConsolidationAction>,
    /// Disc images left in place because a remaining entry still uses them.
    pub kept_images: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl TitleReport {
    fn new(set: &DiscSet) -> Self {
        Self {
            title: set.title.clone(),
            playlist: set.playlist_ref(),
            state: TitleState::NoPlaylist,
            actions: Vec::new(),
            kept_images: Vec::new(),
            warnings: Vec::new(),
            error: None,
        }
    }
}

/// Applies consolidation to the disc sets of one system directory.
pub struct Consolidator<'a> {
    rom_dir: &'a Path,
    image_dir: &'a str,
    fs: &'a mut dyn FileOps,
}

impl<'a> Consolidator<'a> {
    /// `image_dir` is the folder, relative to `rom_dir`, holding per-disc images.
    pub fn new(rom_dir: &'a Path, image_dir: &'a str, fs: &'a mut dyn FileOps) -> Self {
        Self {
            rom_dir,
            image_dir,
            fs,
        }
    }

    /// Detect the disc sets in the ROM directory and consolidate each one.
    pub fn run(
        &mut self,
        store: &mut GamelistStore,
        extensions: &HashSet<String>,
    ) -> Result<Vec<TitleReport>, TidyError> {
        let files = list_file_names(self.rom_dir)
            .map_err(|e| TidyError::file_op("list", self.rom_dir, e))?;
        let sets = detect_disc_sets(&files, extensions);
        debug!(
            "{} multi-disc set(s) in {}",
            sets.len(),
            self.rom_dir.display()
        );
        Ok(sets
            .iter()
            .map(|set| self.consolidate(store, set))
            .collect())
    }

    /// Drive one title to `Done`, stopping at the first filesystem error.
    pub fn consolidate(&mut self, store: &mut GamelistStore, set: &DiscSet) -> TitleReport {
        let mut report = TitleReport::new(set);
        while report.state != TitleState::Done {
            match self.step(store, set, &mut report) {
                Ok(next) => report.state = next,
                Err(e) => {
                    warn!("{}: {e}", set.title);
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }
        report
    }

    fn step(
        &mut self,
        store: &mut GamelistStore,
        set: &DiscSet,
        report: &mut TitleReport,
    ) -> Result<TitleState, TidyError> {
        match report.state {
            TitleState::NoPlaylist => {
                let has_record = store.find_by_path(&set.playlist_ref()).is_some();
                if has_record && self.fs.exists(&self.playlist_path(set)) {
                    debug!("{}: playlist and entry already present", set.title);
                    Ok(TitleState::PlaylistCreated)
                } else {
                    Ok(TitleState::PlaylistMissingFile)
                }
            }
            TitleState::PlaylistMissingFile => {
                self.ensure_playlist(store, set, report)?;
                Ok(TitleState::PlaylistCreated)
            }
            TitleState::PlaylistCreated => {
                self.normalize_image(store, set, report)?;
                Ok(TitleState::MetadataUpdated)
            }
            TitleState::MetadataUpdated => {
                let first = set.first_disc_ref();
                while store.remove_by_path(&first).is_some() {
                    report
                        .actions
                        .push(ConsolidationAction::RemoveRecord { path: first.clone() });
                }
                Ok(TitleState::DuplicatesRemoved)
            }
            TitleState::DuplicatesRemoved => {
                self.remove_extra_discs(store, set, report)?;
                Ok(TitleState::Done)
            }
            TitleState::Done => Ok(TitleState::Done),
        }
    }

    fn playlist_path(&self, set: &DiscSet) -> PathBuf {
        self.rom_dir.join(set.playlist_name())
    }

    /// Write the playlist if it is missing, then point the disc-1 entry at it
    /// unless the playlist already has an entry of its own.
    fn ensure_playlist(
        &mut self,
        store: &mut GamelistStore,
        set: &DiscSet,
        report: &mut TitleReport,
    ) -> Result<(), TidyError> {
        let path = self.playlist_path(set);
        if !self.fs.exists(&path) {
            self.fs
                .write(&path, &set.playlist_contents())
                .map_err(|e| TidyError::file_op("write", &path, e))?;
            report.actions.push(ConsolidationAction::WritePlaylist {
                path,
                discs: set.discs.iter().map(|d| d.file_name.clone()).collect(),
            });
        }

        let playlist = set.playlist_ref();
        if store.find_by_path(&playlist).is_some() {
            return Ok(());
        }
        let first = set.first_disc_ref();
        match store.find_by_path_mut(&first) {
            Some(record) => {
                record.upsert("path", &playlist);
                report.actions.push(ConsolidationAction::RewriteRecordPath {
                    from: first,
                    to: playlist,
                });
            }
            None => report
                .warnings
                .push(format!("no gamelist entry for {first}")),
        }
        Ok(())
    }

    /// Rename the playlist entry's image to `<Title>.<ext>` in the same folder.
    fn normalize_image(
        &mut self,
        store: &mut GamelistStore,
        set: &DiscSet,
        report: &mut TitleReport,
    ) -> Result<(), TidyError> {
        let playlist = set.playlist_ref();
        let Some(record) = store.find_by_path_mut(&playlist) else {
            return Ok(());
        };
        let current = match record.image() {
            Some(image) if !image.trim().is_empty() => image.trim().to_string(),
            _ => return Ok(()),
        };

        let (dir, file_name) = split_rel(&current);
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        let canonical_name = format!("{}.{ext}", set.title);
        if file_name == canonical_name {
            return Ok(());
        }
        let canonical = join_rel(dir, &canonical_name);
        let from = resolve_rel(self.rom_dir, &current);
        let to = resolve_rel(self.rom_dir, &canonical);

        if self.fs.exists(&to) {
            record.upsert("image", &canonical);
            report.actions.push(ConsolidationAction::RepointImage {
                from: current,
                to: canonical,
            });
        } else if !self.fs.exists(&from) {
            report
                .warnings
                .push(format!("image {} does not exist", from.display()));
        } else {
            self.fs
                .rename(&from, &to)
                .map_err(|e| TidyError::file_op("rename", &from, e))?;
            record.upsert("image", &canonical);
            report
                .actions
                .push(ConsolidationAction::RenameImage { from, to });
        }
        Ok(())
    }

    /// Drop the entries of discs 2 and above and delete their images.
    ///
    /// An image still referenced by any remaining entry is never deleted.
    fn remove_extra_discs(
        &mut self,
        store: &mut GamelistStore,
        set: &DiscSet,
        report: &mut TitleReport,
    ) -> Result<(), TidyError> {
        let mut candidates = Vec::new();
        for disc in set.extra_discs() {
            let disc_ref = to_rel_ref(&disc.file_name);
            while let Some(record) = store.remove_by_path(&disc_ref) {
                if let Some(image) = record.image().filter(|i| !i.trim().is_empty()) {
                    candidates.push(resolve_rel(self.rom_dir, image.trim()));
                }
                report.actions.push(ConsolidationAction::RemoveRecord {
                    path: disc_ref.clone(),
                });
            }
            if let Some(stem) = file_stem_str(Path::new(&disc.file_name)) {
                candidates.push(self.rom_dir.join(self.image_dir).join(format!("{stem}.png")));
            }
        }

        let in_use: HashSet<PathBuf> = store
            .records()
            .flat_map(|rec| [rec.image(), rec.marquee(), rec.video()])
            .flatten()
            .map(str::trim)
            .filter(|media| !media.is_empty())
            .map(|media| resolve_rel(self.rom_dir, media))
            .collect();

        let mut seen = HashSet::new();
        for image in candidates {
            if !seen.insert(image.clone()) {
                continue;
            }
            if in_use.contains(&image) {
                debug!("Keeping {} (still referenced)", image.display());
                report.kept_images.push(image);
                continue;
            }
            if !self.fs.exists(&image) {
                continue;
            }
            self.fs
                .remove_file(&image)
                .map_err(|e| TidyError::file_op("delete", &image, e))?;
            report
                .actions
                .push(ConsolidationAction::DeleteImage { path: image });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/consolidate_tests.rs"]
mod tests;
