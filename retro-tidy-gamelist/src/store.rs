//! In-memory gamelist with byte-preserving round trips.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::payload::{CLOSE_MARKER, OPEN_MARKER, extract_payload};
use crate::record::{Field, RecordItem};
use crate::{GameRecord, GamelistError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    /// Whitespace, comments, `<folder>` entries and any other sibling of the
    /// `<game>` records, kept verbatim.
    Raw(String),
    Game(GameRecord),
}

/// What [`GamelistStore::save`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing changed since the file was read; the file was not touched.
    Unchanged,
    /// The file was rewritten, after copying the previous contents to `backup`.
    Written { backup: Option<PathBuf> },
}

/// The records of one system's gamelist plus everything around them.
#[derive(Debug, Clone)]
pub struct GamelistStore {
    prefix: String,
    nodes: Vec<Node>,
    suffix: String,
    /// Serialized form as last read or written, used to detect changes.
    original: String,
}

impl GamelistStore {
    /// A store with no records, used for systems that have no gamelist yet.
    pub fn empty() -> Self {
        let text = format!("<?xml version=\"1.0\"?>\n{OPEN_MARKER}\n{CLOSE_MARKER}\n");
        Self {
            prefix: "<?xml version=\"1.0\"?>\n".to_string(),
            nodes: vec![Node::Raw("\n".to_string())],
            suffix: "\n".to_string(),
            original: text,
        }
    }

    /// Parse a gamelist from text.
    ///
    /// Only the `<gameList>` block is parsed as XML; text before and after it
    /// is kept as an opaque prefix and suffix.
    pub fn parse(text: &str) -> Result<Self, GamelistError> {
        let payload = extract_payload(text)?;
        let nodes = parse_nodes(payload.inner())?;
        Ok(Self {
            prefix: payload.prefix.to_string(),
            nodes,
            suffix: payload.suffix.to_string(),
            original: text.to_string(),
        })
    }

    /// Read and parse a gamelist file.
    pub fn load(path: &Path) -> Result<Self, GamelistError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// All records in document order.
    pub fn records(&self) -> impl Iterator<Item = &GameRecord> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Game(rec) => Some(rec),
            Node::Raw(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }

    /// First record whose `path` equals `path` exactly.
    pub fn find_by_path(&self, path: &str) -> Option<&GameRecord> {
        self.records().find(|rec| rec.path() == Some(path))
    }

    /// Index (among records) of the first record whose `path` equals `path`.
    pub fn position_by_path(&self, path: &str) -> Option<usize> {
        self.records().position(|rec| rec.path() == Some(path))
    }

    /// Mutable access to the first record whose `path` equals `path`.
    pub fn find_by_path_mut(&mut self, path: &str) -> Option<&mut GameRecord> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Game(rec) if rec.path() == Some(path) => Some(rec),
            _ => None,
        })
    }

    /// Remove the first record whose `path` equals `path`.
    ///
    /// The indentation in front of the record goes with it, so removing
    /// entries does not leave blank lines behind.
    pub fn remove_by_path(&mut self, path: &str) -> Option<GameRecord> {
        let index = self.nodes.iter().position(
            |node| matches!(node, Node::Game(rec) if rec.path() == Some(path)),
        )?;
        let record = match self.nodes.remove(index) {
            Node::Game(rec) => rec,
            Node::Raw(_) => return None,
        };
        if index > 0 && index < self.nodes.len() {
            if let Node::Raw(prev) = &mut self.nodes[index - 1] {
                let kept = prev.trim_end().len();
                prev.truncate(kept);
                if prev.is_empty() {
                    self.nodes.remove(index - 1);
                }
            }
        }
        Some(record)
    }

    /// Append a record before the closing marker.
    pub fn push(&mut self, record: GameRecord) {
        let at = match self.nodes.last() {
            Some(Node::Raw(ws)) if ws.trim().is_empty() => self.nodes.len() - 1,
            _ => self.nodes.len(),
        };
        self.nodes.insert(at, Node::Game(record));
        self.nodes.insert(at, Node::Raw("\n\t".to_string()));
    }

    /// Serialize the whole file: prefix, `<gameList>` block, suffix.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::with_capacity(self.original.len() + 64);
        out.push_str(&self.prefix);
        out.push_str(OPEN_MARKER);
        for node in &self.nodes {
            match node {
                Node::Raw(raw) => out.push_str(raw),
                Node::Game(rec) => rec.write_to(&mut out),
            }
        }
        out.push_str(CLOSE_MARKER);
        out.push_str(&self.suffix);
        out
    }

    /// Whether the serialized form differs from what was last read or written.
    pub fn is_modified(&self) -> bool {
        self.to_xml_string() != self.original
    }

    /// Write the store back to `path` if anything changed.
    ///
    /// The new text is parsed back before anything touches the disk. When
    /// `backup` is set the current file is copied to [`backup_path`] first.
    /// The write goes to a temporary sibling that is then renamed over `path`.
    pub fn save(&mut self, path: &Path, backup: bool) -> Result<SaveOutcome, GamelistError> {
        let xml = self.to_xml_string();
        if xml == self.original {
            return Ok(SaveOutcome::Unchanged);
        }
        GamelistStore::parse(&xml).map_err(|e| GamelistError::validation(e.to_string()))?;

        let backup_file = if backup && path.exists() {
            let bak = backup_path(path);
            fs::copy(path, &bak)?;
            Some(bak)
        } else {
            None
        };

        let tmp = sibling_with_suffix(path, "tmp");
        fs::write(&tmp, &xml)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        self.original = xml;
        Ok(SaveOutcome::Written {
            backup: backup_file,
        })
    }
}

/// Backup location for a gamelist: `gamelist.xml` → `gamelist.xml.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "bak")
}

/// Copy `<path>.bak` back over `path`. Returns `false` when there is no backup.
pub fn restore_backup(path: &Path) -> Result<bool, GamelistError> {
    let bak = backup_path(path);
    if !bak.is_file() {
        return Ok(false);
    }
    fs::copy(&bak, path)?;
    Ok(true)
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    path.with_extension(format!(
        "{}.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        suffix
    ))
}

/// A `<game>` element being read.
struct PendingRecord<'a> {
    start: usize,
    start_tag: &'a str,
    items: Vec<RecordItem>,
    cursor: usize,
    field: Option<PendingField>,
}

struct PendingField {
    tag: String,
    start: usize,
    value: String,
}

/// Parse the content between the markers into raw and record nodes.
///
/// Every byte of `inner` ends up in exactly one node, which is what makes
/// an unmodified store serialize back to identical text.
fn parse_nodes(inner: &str) -> Result<Vec<Node>, GamelistError> {
    let mut reader = Reader::from_str(inner);
    let mut nodes = Vec::new();
    let mut cursor = 0usize;
    let mut depth = 0usize;
    let mut record: Option<PendingRecord<'_>> = None;

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| GamelistError::parse(before, e.to_string()))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(ref e) => {
                if depth == 0 && e.name().as_ref() == b"game" {
                    push_raw(&mut nodes, &inner[cursor..before]);
                    record = Some(PendingRecord {
                        start: before,
                        start_tag: &inner[before..after],
                        items: Vec::new(),
                        cursor: after,
                        field: None,
                    });
                } else if depth == 1 {
                    if let Some(rec) = record.as_mut() {
                        push_item_raw(&mut rec.items, &inner[rec.cursor..before]);
                        rec.field = Some(PendingField {
                            tag: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                            start: before,
                            value: String::new(),
                        });
                    }
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| GamelistError::parse(before, "unexpected closing tag"))?;
                if depth == 0 {
                    if let Some(mut rec) = record.take() {
                        push_item_raw(&mut rec.items, &inner[rec.cursor..before]);
                        nodes.push(Node::Game(GameRecord::parsed(
                            rec.start_tag,
                            rec.items,
                            &inner[rec.start..after],
                        )));
                        cursor = after;
                    }
                } else if depth == 1 {
                    if let Some(rec) = record.as_mut() {
                        if let Some(field) = rec.field.take() {
                            rec.items.push(RecordItem::Field(Field::parsed(
                                field.tag,
                                field.value,
                                &inner[field.start..after],
                            )));
                            rec.cursor = after;
                        }
                    }
                }
            }
            Event::Empty(ref e) => {
                if depth == 0 && e.name().as_ref() == b"game" {
                    push_raw(&mut nodes, &inner[cursor..before]);
                    let text = &inner[before..after];
                    nodes.push(Node::Game(GameRecord::parsed(text, Vec::new(), text)));
                    cursor = after;
                } else if depth == 1 {
                    if let Some(rec) = record.as_mut() {
                        push_item_raw(&mut rec.items, &inner[rec.cursor..before]);
                        rec.items.push(RecordItem::Field(Field::parsed(
                            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                            String::new(),
                            &inner[before..after],
                        )));
                        rec.cursor = after;
                    }
                }
            }
            Event::Text(ref t) if depth == 2 => {
                if let Some(field) = record.as_mut().and_then(|r| r.field.as_mut()) {
                    let text = t
                        .unescape()
                        .map_err(|e| GamelistError::parse(before, e.to_string()))?;
                    field.value.push_str(&text);
                }
            }
            Event::CData(ref c) if depth == 2 => {
                if let Some(field) = record.as_mut().and_then(|r| r.field.as_mut()) {
                    let bytes: &[u8] = c;
                    field.value.push_str(&String::from_utf8_lossy(bytes));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(GamelistError::parse(inner.len(), "unclosed element"));
    }
    push_raw(&mut nodes, &inner[cursor..]);
    Ok(nodes)
}

fn push_raw(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Raw(text.to_string()));
    }
}

fn push_item_raw(items: &mut Vec<RecordItem>, text: &str) {
    if !text.is_empty() {
        items.push(RecordItem::Raw(text.to_string()));
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
