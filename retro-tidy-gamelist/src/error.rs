/// Errors that can occur while loading or saving a gamelist.
#[derive(Debug, thiserror::Error)]
pub enum GamelistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The `<gameList>` / `</gameList>` markers were not found.
    #[error("No <gameList> block found")]
    MissingMarkers,

    /// The payload between the markers is not well-formed.
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// A freshly serialized payload did not parse back.
    #[error("Serialized gamelist failed validation: {0}")]
    Validation(String),
}

impl GamelistError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors caused by the file contents rather than by I/O.
    pub fn is_format_problem(&self) -> bool {
        matches!(self, Self::MissingMarkers | Self::Parse { .. })
    }
}
