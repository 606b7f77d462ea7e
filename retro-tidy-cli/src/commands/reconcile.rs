use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_tidy_lib::{Pass, ReconcileOptions, ReconcileProgress, Settings, reconcile};

use crate::CliError;
use crate::cli_types::ApplyArgs;
use crate::commands::{Context, print_json, report};

/// Run `clean-media`: the orphan pass, optionally with its own extension list.
pub(crate) fn run_clean_media(
    ctx: &Context,
    run: bool,
    extensions: Option<Vec<String>>,
) -> Result<(), CliError> {
    let mut overrides = ctx.overrides.clone();
    overrides.media_extensions = extensions;
    let settings = Settings::load(overrides)?;
    if settings.media_extensions.is_empty() {
        return Err(CliError::config("--extensions needs at least one extension"));
    }
    let apply = ApplyArgs {
        run,
        no_backup: false,
    };
    run_with_settings(ctx, &settings, &[Pass::Orphans], apply)
}

/// Run one or more passes over the library and print the report.
pub(crate) fn run_passes(ctx: &Context, passes: &[Pass], apply: ApplyArgs) -> Result<(), CliError> {
    let settings = ctx.settings()?;
    run_with_settings(ctx, &settings, passes, apply)
}

fn run_with_settings(
    ctx: &Context,
    settings: &Settings,
    passes: &[Pass],
    apply: ApplyArgs,
) -> Result<(), CliError> {
    let options = ReconcileOptions {
        dry_run: !apply.run,
        create_backup: !apply.no_backup,
        passes: passes.to_vec(),
        systems: ctx.systems.clone(),
    };

    if !ctx.json {
        log::info!(
            "Scanning ROMs in: {}",
            settings
                .roms_root
                .display()
                .if_supports_color(Stdout, |t| t.cyan()),
        );
        let media = settings.media_root.as_ref();
        if let Some(media) = media.filter(|_| passes.contains(&Pass::Orphans)) {
            log::info!(
                "Media in: {}",
                media.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        if options.dry_run {
            log::info!(
                "{}",
                "Dry run: no files will be modified".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        if !options.create_backup {
            log::info!(
                "{}",
                "Backups disabled".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        crate::log_blank();
    }

    let progress = |p: ReconcileProgress| match p {
        ReconcileProgress::Discovered { system_count } => {
            log::debug!("{system_count} system folder(s) found");
        }
        ReconcileProgress::System { name, index, total } => {
            log::debug!("[{}/{}] {name}", index + 1, total);
        }
        ReconcileProgress::Done => {}
    };
    let run_report = reconcile(settings, &options, &progress)?;

    if ctx.json {
        return print_json(&run_report);
    }
    report::print_run_report(&run_report);
    Ok(())
}
