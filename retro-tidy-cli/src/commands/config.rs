use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_tidy_lib::ValueSource;
use retro_tidy_lib::settings::{load_settings_string, save_library_root, settings_path};

use crate::CliError;
use crate::cli_types::RootKey;
use crate::commands::{Context, print_json};

fn source_label(source: ValueSource) -> &'static str {
    match source {
        ValueSource::CommandLine => "(command line)",
        ValueSource::File => "(settings.toml)",
        ValueSource::Default => "(default)",
    }
}

/// Show resolved settings and their sources.
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let settings = ctx.settings()?;
    if ctx.json {
        return print_json(&settings);
    }

    let path = settings_path();
    log::info!(
        "{}",
        "retro-tidy Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let unset = || "(not set)".to_string();
    let fields: [(&str, &str, String); 6] = [
        (
            "roms_root",
            "ROMs",
            settings.roms_root.display().to_string(),
        ),
        (
            "gamelists_root",
            "Gamelists",
            settings
                .gamelists_root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(inside each ROM folder)".to_string()),
        ),
        (
            "media_root",
            "Media",
            settings
                .media_root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(unset),
        ),
        (
            "media_extensions",
            "Media extensions",
            settings.media_extensions.join(", "),
        ),
        (
            "disc_extensions",
            "Disc extensions",
            settings.disc_extensions.join(", "),
        ),
        ("image_dir", "Disc image folder", settings.image_dir.clone()),
    ];
    for (key, label, value) in &fields {
        log::info!(
            "  {:<18} {} {}",
            format!("{label}:"),
            value.if_supports_color(Stdout, |t| t.cyan()),
            source_label(settings.source_of(key)).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        log::debug!("settings.toml:\n{contents}");
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Store (or clear) a library root in settings.toml.
pub(crate) fn run_config_set(root: RootKey, path: Option<PathBuf>) -> Result<(), CliError> {
    let path = match path {
        Some(p) => {
            let absolute = std::path::absolute(&p)?;
            if !absolute.is_dir() {
                return Err(CliError::config(format!(
                    "{} is not a directory",
                    absolute.display()
                )));
            }
            Some(absolute)
        }
        None => None,
    };

    save_library_root(root.settings_key(), path.as_deref())?;
    match &path {
        Some(p) => log::info!(
            "  {} {} = {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            root.settings_key(),
            p.display().if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "  {} {} cleared",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            root.settings_key(),
        ),
    }
    log::info!(
        "  {}",
        settings_path()
            .display()
            .if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}
