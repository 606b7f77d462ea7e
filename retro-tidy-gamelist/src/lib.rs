//! Reading and writing ES-DE `gamelist.xml` files.
//!
//! A gamelist may be a standalone file or a `<gameList>` block embedded in a
//! larger document. Only the block is parsed; everything around it, and
//! every record or field that is not changed, is written back verbatim.

pub mod error;
pub mod payload;
pub mod record;
pub mod store;

pub use error::GamelistError;
pub use payload::{Payload, extract_payload};
pub use record::{Field, GameRecord};
pub use store::{GamelistStore, SaveOutcome, backup_path, restore_backup};

/// Filename ES-DE uses for a system's gamelist.
pub const GAMELIST_FILE_NAME: &str = "gamelist.xml";
