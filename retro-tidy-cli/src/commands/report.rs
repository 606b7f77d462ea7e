use std::path::Path;

use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_tidy_lib::{ConsolidationAction, RunReport, SystemReport, TitleReport};

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("?")
        .to_string()
}

/// One-line description of a consolidation step.
pub(crate) fn describe_action(action: &ConsolidationAction) -> String {
    match action {
        ConsolidationAction::WritePlaylist { path, discs } => {
            format!("write {} ({} discs)", file_name(path), discs.len())
        }
        ConsolidationAction::RewriteRecordPath { from, to } => {
            format!("entry {from} \u{2192} {to}")
        }
        ConsolidationAction::RenameImage { from, to } => {
            format!("rename image {} \u{2192} {}", file_name(from), file_name(to))
        }
        ConsolidationAction::RepointImage { from, to } => {
            format!("image {from} \u{2192} {to}")
        }
        ConsolidationAction::RemoveRecord { path } => format!("remove entry {path}"),
        ConsolidationAction::DeleteImage { path } => format!("delete image {}", path.display()),
    }
}

/// Print a whole reconciliation report followed by a summary.
pub(crate) fn print_run_report(report: &RunReport) {
    for system in &report.systems {
        print_system_report(system, report.dry_run);
    }

    for skipped in &report.skipped {
        log::info!(
            "{} {}",
            skipped.name.if_supports_color(Stdout, |t| t.dimmed()),
            format!("(skipped: {})", skipped.reason).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if !report.skipped.is_empty() {
        crate::log_blank();
    }

    log::info!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    let verb = if report.dry_run { "to change" } else { "changed" };
    log::info!(
        "  {} {} multi-disc game(s) {verb}",
        "\u{266B}".if_supports_color(Stdout, |t| t.cyan()),
        report.total_consolidated(),
    );
    log::info!(
        "  {} {} entr(ies) for missing ROMs",
        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        report.total_missing_records(),
    );
    log::info!(
        "  {} {} orphaned media file(s)",
        "\u{1F5D1}".if_supports_color(Stdout, |t| t.yellow()),
        report.total_orphaned_media(),
    );
    log::info!(
        "  {} {} gamelist(s) {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.gamelists_updated(),
        if report.dry_run { "to rewrite" } else { "rewritten" },
    );
    let warnings = report.total_warnings();
    if warnings > 0 {
        log::warn!(
            "  {} {} warning(s)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            warnings,
        );
    }
    let errors = report.total_errors();
    if errors > 0 {
        log::warn!(
            "  {} {} error(s)",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            errors,
        );
    }
    if report.dry_run && report.systems.iter().any(SystemReport::has_changes) {
        crate::log_blank();
        log::info!(
            "{}",
            "Run again with --run to apply these changes.".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

fn print_system_report(system: &SystemReport, dry_run: bool) {
    if !system.has_changes() && !system.has_problems() {
        log::debug!("{}: nothing to do", system.system);
        return;
    }

    let header_level = if system.has_problems() {
        Level::Warn
    } else {
        Level::Info
    };
    log::log!(
        header_level,
        "{} {}",
        system.system.if_supports_color(Stdout, |t| t.bold()),
        format!("({} entries)", system.total_records).if_supports_color(Stdout, |t| t.dimmed()),
    );

    for title in &system.consolidated {
        print_title_report(title);
    }

    for path in &system.missing_records {
        log::info!(
            "  {} {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            path,
            "(ROM missing)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    for path in &system.orphaned_media {
        log::info!(
            "  {} {}",
            "\u{1F5D1}".if_supports_color(Stdout, |t| t.yellow()),
            path.display().if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if system.media_kept > 0 {
        log::debug!("  {} media file(s) kept", system.media_kept);
    }

    if system.gamelist_updated {
        let action = if dry_run { "would be rewritten" } else { "rewritten" };
        match &system.backup {
            Some(backup) => log::info!(
                "  {} gamelist {action} (backup: {})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                file_name(backup),
            ),
            None => log::info!(
                "  {} gamelist {action}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            ),
        }
    }

    for warning in &system.warnings {
        log::warn!(
            "  {} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            warning,
        );
    }
    for error in &system.errors {
        log::warn!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            error,
        );
    }
    crate::log_blank();
}

fn print_title_report(title: &TitleReport) {
    if title.actions.is_empty() && title.warnings.is_empty() && title.error.is_none() {
        return;
    }
    log::info!(
        "  {} {} {} {}",
        "\u{266B}".if_supports_color(Stdout, |t| t.cyan()),
        title.title.if_supports_color(Stdout, |t| t.bold()),
        "\u{2192}".if_supports_color(Stdout, |t| t.cyan()),
        title.playlist,
    );
    for action in &title.actions {
        log::info!(
            "      {}",
            describe_action(action).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    for image in &title.kept_images {
        log::info!(
            "      {} {}",
            "\u{1F6D1} not deleting image (still in use):"
                .if_supports_color(Stdout, |t| t.dimmed()),
            image.display(),
        );
    }
    for warning in &title.warnings {
        log::warn!(
            "      {} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            warning,
        );
    }
    if let Some(error) = &title.error {
        log::warn!(
            "      {} {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            error,
            format!("(stopped at {:?})", title.state).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}
