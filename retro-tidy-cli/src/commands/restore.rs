use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_tidy_lib::{RestoreOptions, restore_backups};

use crate::CliError;
use crate::commands::{Context, print_json};

/// Run the restore command.
pub(crate) fn run_restore(ctx: &Context, run: bool, remove_playlists: bool) -> Result<(), CliError> {
    let settings = ctx.settings()?;
    let options = RestoreOptions {
        dry_run: !run,
        remove_playlists,
        systems: ctx.systems.clone(),
    };
    let report = restore_backups(&settings, &options)?;
    if ctx.json {
        return print_json(&report);
    }

    if report.dry_run {
        log::info!(
            "{}",
            "Dry run: no files will be modified".if_supports_color(Stdout, |t| t.dimmed()),
        );
        crate::log_blank();
    }

    for path in &report.restored {
        log::info!(
            "  {} {} {}",
            "\u{21BA}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
            "(from .bak)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for path in &report.images_restored {
        log::info!(
            "  {} {} {}",
            "\u{21BA}".if_supports_color(Stdout, |t| t.green()),
            path.display(),
            "(image folder from .bak)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for path in &report.playlists_removed {
        log::info!(
            "  {} {}",
            "\u{1F5D1}".if_supports_color(Stdout, |t| t.yellow()),
            path.display(),
        );
    }
    for error in &report.errors {
        log::warn!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            error,
        );
    }

    if report.restored.is_empty()
        && report.images_restored.is_empty()
        && report.playlists_removed.is_empty()
    {
        log::info!(
            "{}",
            "No backups found.".if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else if report.dry_run {
        crate::log_blank();
        log::info!(
            "{}",
            "Run again with --run to restore.".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
