//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "retro-tidy")]
#[command(
    about = "Reconcile ES-DE gamelists, media and multi-disc games with the ROMs on disk",
    long_about = None
)]
pub(crate) struct Cli {
    /// Root path containing one folder per system (defaults to settings, then current directory)
    #[arg(long, global = true)]
    pub roms: Option<PathBuf>,

    /// Root path containing <system>/gamelist.xml (defaults to inside each ROM folder)
    #[arg(long, global = true)]
    pub gamelists: Option<PathBuf>,

    /// Root path containing downloaded media (<system>/<category>/...)
    #[arg(long, global = true)]
    pub media: Option<PathBuf>,

    /// Only process these systems (e.g., psx,saturn)
    #[arg(long, global = true, value_delimiter = ',')]
    pub systems: Option<Vec<String>>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every command that can modify gamelists.
#[derive(Args, Clone, Copy)]
pub(crate) struct ApplyArgs {
    /// Apply the changes (default is to only report them)
    #[arg(long)]
    pub run: bool,

    /// Don't create gamelist.xml.bak before rewriting a gamelist
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Remove gamelist entries whose ROM file no longer exists
    Validate {
        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Delete media files that match no ROM by base name
    CleanMedia {
        /// Apply the changes (default is to only report them)
        #[arg(long)]
        run: bool,

        /// Media extensions to consider (e.g., png,jpg,mp4)
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },

    /// Fold multi-disc games into .m3u playlists
    M3u {
        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Run every pass: playlists, missing ROMs, orphaned media
    Reconcile {
        #[command(flatten)]
        apply: ApplyArgs,
    },

    /// Put gamelist.xml.bak (and Imgs.bak) back in place
    Restore {
        /// Apply the changes (default is to only report them)
        #[arg(long)]
        run: bool,

        /// Also delete the .m3u playlists generated for multi-disc games
        #[arg(long)]
        remove_playlists: bool,
    },

    /// Inspect or edit settings.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and where each value came from
    Show,

    /// Print the settings file path
    Path,

    /// Store a library root in the settings file (omit the path to clear it)
    Set {
        #[arg(value_enum)]
        root: RootKey,

        path: Option<PathBuf>,
    },
}

/// Library roots that can be stored in the settings file.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum RootKey {
    Roms,
    Gamelists,
    Media,
}

impl RootKey {
    pub fn settings_key(self) -> &'static str {
        match self {
            RootKey::Roms => "roms_root",
            RootKey::Gamelists => "gamelists_root",
            RootKey::Media => "media_root",
        }
    }
}
