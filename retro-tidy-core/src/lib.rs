//! Shared building blocks for retro-tidy: multi-disc filename parsing and the
//! `./`-relative path conventions used by ES-DE gamelists.

pub mod disc;
pub mod util;

pub use disc::{DiscFile, DiscSet, detect_disc_sets};
