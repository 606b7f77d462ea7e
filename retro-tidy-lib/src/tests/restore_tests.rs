use super::*;
use crate::settings::{Overrides, SettingsFile};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn settings_for(root: &Path) -> Settings {
    Settings::resolve(
        Overrides {
            roms_root: Some(root.join("roms")),
            ..Default::default()
        },
        SettingsFile::default(),
    )
}

fn consolidated_library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let psx = dir.path().join("roms/psx");
    write(&psx.join("gamelist.xml"), "<gameList>after</gameList>");
    write(&psx.join("gamelist.xml.bak"), "<gameList>before</gameList>");
    write(&psx.join("Foo (Disc 1).chd"), "");
    write(&psx.join("Foo (Disc 2).chd"), "");
    write(&psx.join("Foo.m3u"), "Foo (Disc 1).chd\nFoo (Disc 2).chd\n");
    write(&psx.join("Hand Made.m3u"), "a.cue\n");
    write(&psx.join("Imgs/Foo.png"), "renamed");
    write(&psx.join("Imgs.bak/Foo (Disc 1).png"), "one");
    write(&psx.join("Imgs.bak/Foo (Disc 2).png"), "two");
    dir
}

#[test]
fn restores_gamelist_images_and_playlists() {
    let dir = consolidated_library();
    let psx = dir.path().join("roms/psx");
    let options = RestoreOptions {
        remove_playlists: true,
        ..Default::default()
    };
    let report = restore_backups(&settings_for(dir.path()), &options).unwrap();

    assert_eq!(report.restored, vec![psx.join("gamelist.xml")]);
    assert_eq!(
        fs::read_to_string(psx.join("gamelist.xml")).unwrap(),
        "<gameList>before</gameList>"
    );
    assert_eq!(report.images_restored, vec![psx.join("Imgs")]);
    assert!(!psx.join("Imgs/Foo.png").exists());
    assert_eq!(fs::read_to_string(psx.join("Imgs/Foo (Disc 2).png")).unwrap(), "two");

    assert_eq!(report.playlists_removed, vec![psx.join("Foo.m3u")]);
    assert!(!psx.join("Foo.m3u").exists());
    assert!(psx.join("Hand Made.m3u").exists());
    assert!(report.errors.is_empty());
}

#[test]
fn playlists_stay_unless_asked() {
    let dir = consolidated_library();
    let report =
        restore_backups(&settings_for(dir.path()), &RestoreOptions::default()).unwrap();
    assert!(report.playlists_removed.is_empty());
    assert!(dir.path().join("roms/psx/Foo.m3u").exists());
}

#[test]
fn dry_run_only_reports() {
    let dir = consolidated_library();
    let psx = dir.path().join("roms/psx");
    let options = RestoreOptions {
        dry_run: true,
        remove_playlists: true,
        systems: None,
    };
    let report = restore_backups(&settings_for(dir.path()), &options).unwrap();
    assert_eq!(report.restored.len(), 1);
    assert_eq!(report.playlists_removed.len(), 1);
    assert_eq!(
        fs::read_to_string(psx.join("gamelist.xml")).unwrap(),
        "<gameList>after</gameList>"
    );
    assert!(psx.join("Foo.m3u").exists());
    assert!(psx.join("Imgs/Foo.png").exists());
}

#[test]
fn system_without_backup_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("roms/snes/gamelist.xml"), "<gameList/>");
    let report =
        restore_backups(&settings_for(dir.path()), &RestoreOptions::default()).unwrap();
    assert!(report.restored.is_empty());
    assert!(report.images_restored.is_empty());
}
