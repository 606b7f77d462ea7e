use std::path::PathBuf;

use serde::Serialize;

use crate::consolidate::TitleReport;

/// Why a system was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedSystem {
    pub name: String,
    pub reason: String,
}

/// What one run did (or, in a dry run, would do) to one system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemReport {
    pub system: String,
    /// Records in the gamelist before any change.
    pub total_records: usize,
    /// Paths of records removed because their ROM is missing.
    pub missing_records: Vec<String>,
    /// Media files deleted (or to be deleted) as orphans.
    pub orphaned_media: Vec<PathBuf>,
    /// Media files kept because a ROM matched.
    pub media_kept: usize,
    pub consolidated: Vec<TitleReport>,
    /// Whether the gamelist was (or would be) rewritten.
    pub gamelist_updated: bool,
    /// Backup written before the gamelist was rewritten.
    pub backup: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl SystemReport {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            ..Default::default()
        }
    }

    /// Whether anything was changed or flagged.
    pub fn has_changes(&self) -> bool {
        self.gamelist_updated
            || !self.missing_records.is_empty()
            || !self.orphaned_media.is_empty()
            || self.consolidated.iter().any(|t| !t.actions.is_empty())
    }

    pub fn has_problems(&self) -> bool {
        !self.warnings.is_empty()
            || !self.errors.is_empty()
            || self.consolidated.iter().any(|t| t.error.is_some())
    }
}

/// Outcome of a whole reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    pub systems: Vec<SystemReport>,
    pub skipped: Vec<SkippedSystem>,
}

impl RunReport {
    pub fn total_missing_records(&self) -> usize {
        self.systems.iter().map(|s| s.missing_records.len()).sum()
    }

    pub fn total_orphaned_media(&self) -> usize {
        self.systems.iter().map(|s| s.orphaned_media.len()).sum()
    }

    /// Titles for which the consolidator took at least one action.
    pub fn total_consolidated(&self) -> usize {
        self.systems
            .iter()
            .flat_map(|s| &s.consolidated)
            .filter(|t| !t.actions.is_empty())
            .count()
    }

    pub fn gamelists_updated(&self) -> usize {
        self.systems.iter().filter(|s| s.gamelist_updated).count()
    }

    /// Errors across every system, including per-title failures.
    pub fn total_errors(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.errors.len() + s.consolidated.iter().filter(|t| t.error.is_some()).count())
            .sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.systems
            .iter()
            .map(|s| s.warnings.len() + s.consolidated.iter().map(|t| t.warnings.len()).sum::<usize>())
            .sum()
    }
}
