//! retro-tidy CLI
//!
//! Command-line interface for keeping ES-DE gamelists, media and
//! multi-disc games in step with the ROMs on disk.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_tidy_lib::Pass;

use crate::cli_types::{Cli, Commands, ConfigAction};
pub(crate) use crate::error::CliError;
pub(crate) use crate::logging::log_blank;

fn main() {
    let cli = Cli::parse();
    logging::init(logging::LogConfig::from_flags(cli.quiet, cli.verbose, cli.json));

    let ctx = commands::Context::from_cli(&cli);
    let result = match cli.command {
        Commands::Validate { apply } => {
            commands::reconcile::run_passes(&ctx, &[Pass::Prune], apply)
        }
        Commands::CleanMedia { run, extensions } => {
            commands::reconcile::run_clean_media(&ctx, run, extensions)
        }
        Commands::M3u { apply } => {
            commands::reconcile::run_passes(&ctx, &[Pass::Consolidate], apply)
        }
        Commands::Reconcile { apply } => {
            commands::reconcile::run_passes(&ctx, &Pass::ALL, apply)
        }
        Commands::Restore {
            run,
            remove_playlists,
        } => commands::restore::run_restore(&ctx, run, remove_playlists),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Set { root, path } => commands::config::run_config_set(root, path),
        },
    };

    if let Err(e) = result {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}
