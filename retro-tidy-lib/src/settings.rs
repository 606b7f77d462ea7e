//! Library layout settings (ROMs, gamelists and media roots).
//!
//! Values come from, in priority order: command-line overrides, the shared
//! settings file `~/.config/retro-tidy/settings.toml`, built-in defaults.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use retro_tidy_gamelist::GAMELIST_FILE_NAME;

use crate::TidyError;

/// Media extensions checked by the orphan scan when none are configured.
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "mp4", "webp"];

/// Disc image extensions that can be gathered into an `.m3u` playlist.
/// Companion data files (`.bin`, `.img`) are deliberately absent.
pub const DEFAULT_DISC_EXTENSIONS: &[&str] = &["chd", "cue", "iso", "gdi", "cso", "pbp"];

/// Folder (relative to a system's ROM directory) holding per-disc images.
pub const DEFAULT_IMAGE_DIR: &str = "Imgs";

/// Canonical path to the settings file: `~/.config/retro-tidy/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("retro-tidy").join("settings.toml")
}

/// On-disk shape of `settings.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub library: LibrarySection,
    pub media: MediaSection,
    pub discs: DiscSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySection {
    pub roms_root: Option<PathBuf>,
    pub gamelists_root: Option<PathBuf>,
    pub media_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSection {
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscSection {
    pub extensions: Option<Vec<String>>,
    pub image_dir: Option<String>,
}

impl SettingsFile {
    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self, TidyError> {
        toml::from_str(text).map_err(|e| TidyError::settings(e.to_string()))
    }

    /// Load a settings file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, TidyError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TidyError::settings(format!(
                "could not read {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub roms_root: Option<PathBuf>,
    pub gamelists_root: Option<PathBuf>,
    pub media_root: Option<PathBuf>,
    pub media_extensions: Option<Vec<String>>,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    CommandLine,
    File,
    Default,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Root holding one directory per system.
    pub roms_root: PathBuf,
    /// Root holding `<system>/gamelist.xml`. When unset, each system's
    /// gamelist lives inside its ROM directory.
    pub gamelists_root: Option<PathBuf>,
    /// Root holding `<system>/<category>/...` media files.
    pub media_root: Option<PathBuf>,
    /// Lowercase media extensions, without the dot.
    pub media_extensions: Vec<String>,
    /// Lowercase disc image extensions, without the dot.
    pub disc_extensions: Vec<String>,
    pub image_dir: String,
    /// Source of each value, keyed by setting name.
    pub sources: BTreeMap<&'static str, ValueSource>,
}

impl Settings {
    /// Merge overrides, file values and defaults.
    ///
    /// Without any configured ROMs root the current directory is used.
    pub fn resolve(overrides: Overrides, file: SettingsFile) -> Self {
        let mut sources = BTreeMap::new();

        let roms_root = pick(
            &mut sources,
            "roms_root",
            overrides.roms_root,
            file.library.roms_root,
        )
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let gamelists_root = pick(
            &mut sources,
            "gamelists_root",
            overrides.gamelists_root,
            file.library.gamelists_root,
        );
        let media_root = pick(
            &mut sources,
            "media_root",
            overrides.media_root,
            file.library.media_root,
        );
        let media_extensions = pick(
            &mut sources,
            "media_extensions",
            overrides.media_extensions,
            file.media.extensions,
        )
        .map(|list| normalize_extensions(list.as_slice()))
        .unwrap_or_else(|| normalize_extensions(DEFAULT_MEDIA_EXTENSIONS));
        let disc_extensions = pick(&mut sources, "disc_extensions", None, file.discs.extensions)
            .map(|list| normalize_extensions(list.as_slice()))
            .unwrap_or_else(|| normalize_extensions(DEFAULT_DISC_EXTENSIONS));
        let image_dir = pick(&mut sources, "image_dir", None, file.discs.image_dir)
            .unwrap_or_else(|| DEFAULT_IMAGE_DIR.to_string());

        Self {
            roms_root,
            gamelists_root,
            media_root,
            media_extensions,
            disc_extensions,
            image_dir,
            sources,
        }
    }

    /// Resolve using the settings file at [`settings_path`].
    pub fn load(overrides: Overrides) -> Result<Self, TidyError> {
        Ok(Self::resolve(overrides, SettingsFile::load(&settings_path())?))
    }

    /// ROM directory for a system.
    pub fn rom_dir(&self, system: &str) -> PathBuf {
        self.roms_root.join(system)
    }

    /// Gamelist file for a system.
    pub fn gamelist_path(&self, system: &str) -> PathBuf {
        match &self.gamelists_root {
            Some(root) => root.join(system).join(GAMELIST_FILE_NAME),
            None => self.rom_dir(system).join(GAMELIST_FILE_NAME),
        }
    }

    /// Media directory for a system, if a media root is configured.
    pub fn media_dir(&self, system: &str) -> Option<PathBuf> {
        self.media_root.as_ref().map(|root| root.join(system))
    }

    pub fn source_of(&self, key: &str) -> ValueSource {
        self.sources.get(key).copied().unwrap_or(ValueSource::Default)
    }
}

fn pick<T>(
    sources: &mut BTreeMap<&'static str, ValueSource>,
    key: &'static str,
    cli: Option<T>,
    file: Option<T>,
) -> Option<T> {
    let (value, source) = match (cli, file) {
        (Some(v), _) => (Some(v), ValueSource::CommandLine),
        (None, Some(v)) => (Some(v), ValueSource::File),
        (None, None) => (None, ValueSource::Default),
    };
    sources.insert(key, source);
    value
}

/// Lowercase, strip leading dots, dedupe and sort: `[".PNG", "jpg"]` → `["jpg", "png"]`.
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    let set: BTreeSet<String> = extensions
        .iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();
    set.into_iter().collect()
}

/// Sorted names of the sub-directories of `root`.
pub fn subdirectory_names(root: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(root)?
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}

/// Save (or clear) one `[library]` root in the settings file.
///
/// Uses `toml::Value` for a surgical update so unrelated keys are preserved.
pub fn save_library_root(key: &str, path: Option<&Path>) -> io::Result<()> {
    save_library_root_at(&settings_path(), key, path)
}

pub(crate) fn save_library_root_at(settings: &Path, key: &str, path: Option<&Path>) -> io::Result<()> {
    let mut doc: toml::Value = match fs::read_to_string(settings) {
        Ok(contents) => contents.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid TOML: {e}", settings.display()),
            )
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let library = table
        .entry("library")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let lib_table = library
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[library] is not a table"))?;

    match path {
        Some(p) => {
            lib_table.insert(
                key.to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            lib_table.remove(key);
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    fs::write(&tmp, &serialized)?;
    fs::rename(&tmp, settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
