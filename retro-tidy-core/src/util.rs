//! Helpers for the `./`-relative references stored in gamelists.
//!
//! ES-DE writes every `path`, `image`, `marquee` and `video` value relative
//! to the system's ROM directory, prefixed with `./` and using forward
//! slashes regardless of platform.

use std::path::{Path, PathBuf};

/// Prefix a filename or relative path with `./`.
pub fn to_rel_ref(name: &str) -> String {
    format!("./{}", name.trim_start_matches("./"))
}

/// Strip surrounding whitespace and a single leading `./`.
pub fn strip_rel_prefix(reference: &str) -> &str {
    let trimmed = reference.trim();
    trimmed.strip_prefix("./").unwrap_or(trimmed)
}

/// Resolve a gamelist reference against the system's ROM directory.
///
/// Absolute references are returned unchanged.
pub fn resolve_rel(root: &Path, reference: &str) -> PathBuf {
    let rel = strip_rel_prefix(reference);
    if Path::new(rel).is_absolute() {
        return PathBuf::from(rel);
    }
    rel.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Split a reference into its directory part and filename.
///
/// `"./Imgs/Foo.png"` → `("./Imgs", "Foo.png")`, `"./Foo.png"` → `(".", "Foo.png")`.
pub fn split_rel(reference: &str) -> (&str, &str) {
    let trimmed = reference.trim();
    match trimmed.rsplit_once('/') {
        Some((dir, file)) => (if dir.is_empty() { "." } else { dir }, file),
        None => (".", trimmed),
    }
}

/// Join a reference directory (as returned by [`split_rel`]) with a filename.
pub fn join_rel(dir: &str, file_name: &str) -> String {
    if dir == "." || dir.is_empty() {
        to_rel_ref(file_name)
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), file_name)
    }
}

/// Filename without its final extension, as a `&str`.
pub fn file_stem_str(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Lowercased final extension.
pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
#[path = "tests/util_tests.rs"]
mod tests;
