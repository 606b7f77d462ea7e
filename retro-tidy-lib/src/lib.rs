//! Library maintenance for ES-DE style collections: prune gamelist entries
//! whose ROM is gone, delete orphaned media, and fold multi-disc games into
//! `.m3u` playlists.

pub mod consolidate;
pub mod crossref;
pub mod error;
pub mod fsops;
pub mod reconcile;
pub mod report;
pub mod restore;
pub mod settings;

pub use consolidate::{ConsolidationAction, Consolidator, TitleReport, TitleState};
pub use crossref::{OrphanScan, find_missing_records, find_orphaned_media, rom_base_names};
pub use error::TidyError;
pub use fsops::{DryRunFs, FileOps, RealFs};
pub use reconcile::{Pass, ReconcileOptions, ReconcileProgress, reconcile};
pub use report::{RunReport, SkippedSystem, SystemReport};
pub use restore::{RestoreOptions, RestoreReport, restore_backups};
pub use settings::{Overrides, Settings, SettingsFile, ValueSource};
