//! Locating the `<gameList>` block inside an arbitrary enclosing file.

use crate::GamelistError;

pub const OPEN_MARKER: &str = "<gameList>";
pub const CLOSE_MARKER: &str = "</gameList>";

/// A gamelist file split into the opaque text around the `<gameList>` block
/// and the block itself (markers included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload<'a> {
    pub prefix: &'a str,
    pub payload: &'a str,
    pub suffix: &'a str,
}

impl<'a> Payload<'a> {
    /// Content between the markers.
    pub fn inner(&self) -> &'a str {
        &self.payload[OPEN_MARKER.len()..self.payload.len() - CLOSE_MARKER.len()]
    }
}

/// Split `text` at the first `<gameList>` and the first `</gameList>` after it.
pub fn extract_payload(text: &str) -> Result<Payload<'_>, GamelistError> {
    let start = text.find(OPEN_MARKER).ok_or(GamelistError::MissingMarkers)?;
    let close = text[start..]
        .find(CLOSE_MARKER)
        .ok_or(GamelistError::MissingMarkers)?
        + start;
    let end = close + CLOSE_MARKER.len();
    Ok(Payload {
        prefix: &text[..start],
        payload: &text[start..end],
        suffix: &text[end..],
    })
}

#[cfg(test)]
#[path = "tests/payload_tests.rs"]
mod tests;
