//! A single `<game>` entry and its child fields.

/// Indentation ES-DE uses for fields inside a `<game>` element.
const DEFAULT_FIELD_INDENT: &str = "\n\t\t";
/// Indentation ES-DE uses before `</game>`.
const DEFAULT_CLOSE_INDENT: &str = "\n\t";

/// One child element of a `<game>`, addressed by tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: String,
    value: String,
    /// Original element text, kept until the value is changed.
    raw: Option<String>,
}

impl Field {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
            raw: None,
        }
    }

    pub(crate) fn parsed(tag: String, value: String, raw: &str) -> Self {
        Self {
            tag,
            value,
            raw: Some(raw.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Unescaped text content.
    pub fn value(&self) -> &str {
        &self.value
    }

    fn write_to(&self, out: &mut String) {
        match &self.raw {
            Some(raw) => out.push_str(raw),
            None => write_tag(out, &self.tag, &self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordItem {
    /// Whitespace, comments and anything else between fields.
    Raw(String),
    Field(Field),
}

/// One `<game>` entry of a gamelist.
///
/// Fields other than the typed accessors are kept as-is, along with the
/// whitespace between them, so a record nobody touched serializes to
/// exactly the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Start tag including attributes, always in `<game ...>` form.
    open_tag: String,
    items: Vec<RecordItem>,
    /// Original element text; dropped on the first mutation.
    source: Option<String>,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRecord {
    /// An empty `<game>` with no fields.
    pub fn new() -> Self {
        Self {
            open_tag: "<game>".to_string(),
            items: Vec::new(),
            source: None,
        }
    }

    pub(crate) fn parsed(start_tag: &str, items: Vec<RecordItem>, source: &str) -> Self {
        let open_tag = if start_tag.ends_with("/>") {
            format!("{}>", start_tag[..start_tag.len() - 2].trim_end())
        } else {
            start_tag.to_string()
        };
        Self {
            open_tag,
            items,
            source: Some(source.to_string()),
        }
    }

    /// Value of the first field with this tag.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields().find(|f| f.tag == tag).map(|f| f.value.as_str())
    }

    pub fn path(&self) -> Option<&str> {
        self.get("path")
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn image(&self) -> Option<&str> {
        self.get("image")
    }

    pub fn marquee(&self) -> Option<&str> {
        self.get("marquee")
    }

    pub fn video(&self) -> Option<&str> {
        self.get("video")
    }

    /// All fields in document order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.items.iter().filter_map(|item| match item {
            RecordItem::Field(f) => Some(f),
            RecordItem::Raw(_) => None,
        })
    }

    /// Set a field, keeping its position if it exists or appending it after
    /// the last field otherwise. Returns `false` when the value was already set.
    pub fn upsert(&mut self, tag: &str, value: &str) -> bool {
        let existing = self.items.iter_mut().find_map(|item| match item {
            RecordItem::Field(f) if f.tag == tag => Some(f),
            _ => None,
        });
        if let Some(field) = existing {
            if field.value == value {
                return false;
            }
            field.value = value.to_string();
            field.raw = None;
            self.source = None;
            return true;
        }

        let indent = self.field_indent();
        let insert_at = match self.items.last() {
            Some(RecordItem::Raw(_)) => self.items.len() - 1,
            _ => {
                self.items
                    .push(RecordItem::Raw(DEFAULT_CLOSE_INDENT.to_string()));
                self.items.len() - 1
            }
        };
        self.items.insert(insert_at, RecordItem::Field(Field::new(tag, value)));
        self.items.insert(insert_at, RecordItem::Raw(indent));
        self.source = None;
        true
    }

    /// Whitespace found before the last field, or the ES-DE default.
    fn field_indent(&self) -> String {
        self.items
            .windows(2)
            .rev()
            .find_map(|pair| match pair {
                [RecordItem::Raw(ws), RecordItem::Field(_)] if ws.trim().is_empty() => {
                    Some(ws.clone())
                }
                _ => None,
            })
            .unwrap_or_else(|| DEFAULT_FIELD_INDENT.to_string())
    }

    /// Append the XML for this record to `out`.
    pub fn write_to(&self, out: &mut String) {
        if let Some(source) = &self.source {
            out.push_str(source);
            return;
        }
        out.push_str(&self.open_tag);
        for item in &self.items {
            match item {
                RecordItem::Raw(raw) => out.push_str(raw),
                RecordItem::Field(f) => f.write_to(out),
            }
        }
        out.push_str("</game>");
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

fn write_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push('<');
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push('>');
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
