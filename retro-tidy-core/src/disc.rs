//! Disc-related filename utilities.
//!
//! Functions for parsing "(Disc N)" tags from disc image filenames and
//! grouping the files of a system directory into multi-disc sets. Used by the
//! playlist consolidator and the backup restore command.

use std::collections::HashSet;

use serde::Serialize;

use crate::util::to_rel_ref;

const DISC_TAG: &str = " (Disc ";

/// A disc image filename split around its "(Disc N)" tag.
///
/// `"Final Fantasy VII (Disc 2) (Rev 1).chd"` parses to title
/// `"Final Fantasy VII"`, number `2`, extension `"chd"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscName<'a> {
    pub title: &'a str,
    pub number: u32,
    pub extension: &'a str,
}

/// Parse a `"<Title> (Disc N)<suffix>.<ext>"` filename.
///
/// Only single-digit disc numbers 1 through 9 are recognized. Returns `None`
/// for anything else, including names without an extension.
pub fn parse_disc_name(file_name: &str) -> Option<DiscName<'_>> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let start = stem.find(DISC_TAG)?;
    let title = &stem[..start];
    if title.is_empty() {
        return None;
    }
    let after = &stem[start + DISC_TAG.len()..];
    let close = after.find(')')?;
    let number = match after[..close].as_bytes() {
        [d @ b'1'..=b'9'] => u32::from(*d - b'0'),
        _ => return None,
    };
    Some(DiscName {
        title,
        number,
        extension,
    })
}

/// One disc image belonging to a [`DiscSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscFile {
    pub number: u32,
    pub file_name: String,
}

/// A multi-disc game detected from a directory listing.
///
/// Never persisted: sets are recomputed from the filesystem on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscSet {
    /// Base title, the text before " (Disc 1)".
    pub title: String,
    /// Extension shared by every disc in the set, as spelled on the first disc.
    pub extension: String,
    /// Filename of the disc-1 image this set was derived from.
    pub first_disc: String,
    /// All discs of the set (including the first), sorted by filename.
    pub discs: Vec<DiscFile>,
}

impl DiscSet {
    /// Filename of the playlist that replaces the individual discs.
    pub fn playlist_name(&self) -> String {
        format!("{}.m3u", self.title)
    }

    /// Gamelist reference for the playlist (`./<Title>.m3u`).
    pub fn playlist_ref(&self) -> String {
        to_rel_ref(&self.playlist_name())
    }

    /// Gamelist reference for the first disc.
    pub fn first_disc_ref(&self) -> String {
        to_rel_ref(&self.first_disc)
    }

    /// Discs numbered 2 and above, in playlist order.
    pub fn extra_discs(&self) -> impl Iterator<Item = &DiscFile> {
        self.discs.iter().filter(|d| d.number >= 2)
    }

    /// Playlist contents: one disc filename per line, newline-terminated.
    pub fn playlist_contents(&self) -> String {
        self.discs
            .iter()
            .map(|d| format!("{}\n", d.file_name))
            .collect()
    }
}

/// Group the filenames of one directory into multi-disc sets.
///
/// A set is produced for every `(Disc 1)` file whose extension is in
/// `extensions` (compared lowercase). Its members are every parsed disc with
/// the same title and extension. A lone disc 1 still yields a set, so a
/// playlist can be generated before the remaining discs are copied in.
pub fn detect_disc_sets<S: AsRef<str>>(
    file_names: &[S],
    extensions: &HashSet<String>,
) -> Vec<DiscSet> {
    let mut parsed: Vec<(&str, DiscName<'_>)> = file_names
        .iter()
        .map(|name| name.as_ref())
        .filter_map(|name| parse_disc_name(name).map(|d| (name, d)))
        .filter(|(_, d)| extensions.contains(&d.extension.to_lowercase()))
        .collect();
    parsed.sort_by(|a, b| a.0.cmp(b.0));

    parsed
        .iter()
        .filter(|(_, d)| d.number == 1)
        .map(|(first, first_name)| {
            let discs = parsed
                .iter()
                .filter(|(_, d)| {
                    d.title == first_name.title
                        && d.extension.eq_ignore_ascii_case(first_name.extension)
                })
                .map(|(name, d)| DiscFile {
                    number: d.number,
                    file_name: (*name).to_string(),
                })
                .collect();
            DiscSet {
                title: first_name.title.to_string(),
                extension: first_name.extension.to_string(),
                first_disc: (*first).to_string(),
                discs,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/disc_tests.rs"]
mod tests;
