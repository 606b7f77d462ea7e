pub(crate) mod config;
pub(crate) mod reconcile;
pub(crate) mod report;
pub(crate) mod restore;

use serde::Serialize;

use retro_tidy_lib::{Overrides, Settings};

use crate::CliError;
use crate::cli_types::Cli;

/// Global options shared by every command.
pub(crate) struct Context {
    pub overrides: Overrides,
    pub systems: Option<Vec<String>>,
    pub json: bool,
}

impl Context {
    pub(crate) fn from_cli(cli: &Cli) -> Self {
        Self {
            overrides: Overrides {
                roms_root: cli.roms.clone(),
                gamelists_root: cli.gamelists.clone(),
                media_root: cli.media.clone(),
                media_extensions: None,
            },
            systems: cli.systems.clone(),
            json: cli.json,
        }
    }

    /// Resolve settings from the command line, settings file and defaults.
    pub(crate) fn settings(&self) -> Result<Settings, CliError> {
        Ok(Settings::load(self.overrides.clone())?)
    }
}

/// Print a serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
