use std::fs;
use std::io;

use super::*;
use crate::fsops::{DryRunFs, RealFs};

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "x").unwrap();
}

fn chd() -> HashSet<String> {
    ["chd".to_string()].into_iter().collect()
}

fn run(dir: &Path, store: &mut GamelistStore, fs: &mut dyn FileOps) -> Vec<TitleReport> {
    Consolidator::new(dir, "Imgs", fs).run(store, &chd()).unwrap()
}

const TWO_DISC_GAMELIST: &str = "<?xml version=\"1.0\"?>
<gameList>
\t<game>
\t\t<path>./Foo (Disc 1).chd</path>
\t\t<name>Foo</name>
\t\t<image>./Imgs/Foo (Disc 1).png</image>
\t</game>
\t<game>
\t\t<path>./Foo (Disc 2).chd</path>
\t\t<name>Foo</name>
\t\t<image>./Imgs/Foo (Disc 2).png</image>
\t</game>
\t<game>
\t\t<path>./Bar.chd</path>
\t\t<name>Bar</name>
\t</game>
</gameList>
";

fn two_disc_library() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "Foo (Disc 1).chd",
        "Foo (Disc 2).chd",
        "Bar.chd",
        "Imgs/Foo (Disc 1).png",
        "Imgs/Foo (Disc 2).png",
    ] {
        touch(&dir.path().join(name));
    }
    dir
}

#[test]
fn discs_without_records_only_get_a_playlist() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("Foo (Disc 1).chd"));
    touch(&dir.path().join("Foo (Disc 2).chd"));
    let mut store = GamelistStore::empty();

    let titles = run(dir.path(), &mut store, &mut RealFs);

    assert_eq!(
        fs::read_to_string(dir.path().join("Foo.m3u")).unwrap(),
        "Foo (Disc 1).chd\nFoo (Disc 2).chd\n"
    );
    assert!(!store.is_modified());
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].state, TitleState::Done);
    assert!(matches!(
        titles[0].actions.as_slice(),
        [ConsolidationAction::WritePlaylist { .. }]
    ));
    assert_eq!(titles[0].warnings.len(), 1);
}

#[test]
fn disc_one_record_becomes_the_playlist_entry() {
    let dir = two_disc_library();
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert_eq!(titles[0].error, None);
    assert_eq!(titles[0].state, TitleState::Done);

    let entry = store.find_by_path("./Foo.m3u").unwrap();
    assert_eq!(entry.name(), Some("Foo"));
    assert_eq!(entry.image(), Some("./Imgs/Foo.png"));
    assert!(store.find_by_path("./Foo (Disc 1).chd").is_none());
    assert!(store.find_by_path("./Foo (Disc 2).chd").is_none());
    assert!(store.find_by_path("./Bar.chd").is_some());
    assert_eq!(store.len(), 2);

    assert!(dir.path().join("Imgs/Foo.png").exists());
    assert!(!dir.path().join("Imgs/Foo (Disc 1).png").exists());
    assert!(!dir.path().join("Imgs/Foo (Disc 2).png").exists());
    assert!(dir.path().join("Foo (Disc 2).chd").exists());
}

#[test]
fn rewritten_gamelist_keeps_layout() {
    let dir = two_disc_library();
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();
    run(dir.path(), &mut store, &mut RealFs);
    assert_eq!(
        store.to_xml_string(),
        "<?xml version=\"1.0\"?>
<gameList>
\t<game>
\t\t<path>./Foo.m3u</path>
\t\t<name>Foo</name>
\t\t<image>./Imgs/Foo.png</image>
\t</game>
\t<game>
\t\t<path>./Bar.chd</path>
\t\t<name>Bar</name>
\t</game>
</gameList>
"
    );
}

#[test]
fn second_run_changes_nothing() {
    let dir = two_disc_library();
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();
    run(dir.path(), &mut store, &mut RealFs);
    let after_first = store.to_xml_string();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert!(titles[0].actions.is_empty());
    assert_eq!(titles[0].state, TitleState::Done);
    assert_eq!(store.to_xml_string(), after_first);
}

#[test]
fn existing_playlist_entry_drops_disc_one_duplicate() {
    let dir = two_disc_library();
    fs::write(dir.path().join("Foo.m3u"), "Foo (Disc 1).chd\nFoo (Disc 2).chd\n").unwrap();
    touch(&dir.path().join("Imgs/Foo.png"));
    let xml = "<gameList>
\t<game><path>./Foo.m3u</path><image>./Imgs/Foo.png</image></game>
\t<game><path>./Foo (Disc 1).chd</path></game>
\t<game><path>./Foo (Disc 1).chd</path></game>
</gameList>";
    let mut store = GamelistStore::parse(xml).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert_eq!(
        titles[0]
            .actions
            .iter()
            .filter(|a| matches!(a, ConsolidationAction::RemoveRecord { .. }))
            .count(),
        2
    );
    assert!(
        !titles[0]
            .actions
            .iter()
            .any(|a| matches!(a, ConsolidationAction::WritePlaylist { .. }))
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn image_in_use_by_playlist_entry_is_kept() {
    let dir = two_disc_library();
    touch(&dir.path().join("Imgs/Foo.png"));
    let xml = "<gameList>
\t<game><path>./Foo (Disc 1).chd</path><image>./Imgs/Foo.png</image></game>
\t<game><path>./Foo (Disc 2).chd</path><image>./Imgs/Foo.png</image></game>
</gameList>";
    let mut store = GamelistStore::parse(xml).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert!(dir.path().join("Imgs/Foo.png").exists());
    assert_eq!(titles[0].kept_images, vec![dir.path().join("Imgs/Foo.png")]);
    // The conventional per-disc image is not in use and goes.
    assert!(!dir.path().join("Imgs/Foo (Disc 2).png").exists());
}

#[test]
fn image_shared_with_another_game_is_kept() {
    let dir = two_disc_library();
    touch(&dir.path().join("Imgs/Bar.png"));
    let xml = "<gameList>
\t<game><path>./Foo (Disc 1).chd</path></game>
\t<game><path>./Foo (Disc 2).chd</path><image>./Imgs/Bar.png</image></game>
\t<game><path>./Bar.chd</path><image>./Imgs/Bar.png</image></game>
</gameList>";
    let mut store = GamelistStore::parse(xml).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    let bar = dir.path().join("Imgs/Bar.png");
    assert!(bar.exists());
    assert_eq!(
        store.find_by_path("./Bar.chd").and_then(|r| r.image()),
        Some("./Imgs/Bar.png")
    );
    assert_eq!(titles[0].kept_images, vec![bar.clone()]);
    assert!(!titles[0]
        .actions
        .contains(&ConsolidationAction::DeleteImage { path: bar }));
    assert!(store.find_by_path("./Foo (Disc 2).chd").is_none());
    assert!(!dir.path().join("Imgs/Foo (Disc 2).png").exists());
}

#[test]
fn existing_canonical_image_is_repointed_not_overwritten() {
    let dir = two_disc_library();
    fs::write(dir.path().join("Imgs/Foo.png"), "canonical").unwrap();
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert!(
        titles[0]
            .actions
            .iter()
            .any(|a| matches!(a, ConsolidationAction::RepointImage { .. }))
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Imgs/Foo.png")).unwrap(),
        "canonical"
    );
    assert_eq!(
        store.find_by_path("./Foo.m3u").unwrap().image(),
        Some("./Imgs/Foo.png")
    );
}

#[test]
fn missing_source_image_is_a_warning() {
    let dir = two_disc_library();
    fs::remove_file(dir.path().join("Imgs/Foo (Disc 1).png")).unwrap();
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();

    let titles = run(dir.path(), &mut store, &mut RealFs);
    assert_eq!(titles[0].state, TitleState::Done);
    assert_eq!(titles[0].warnings.len(), 1);
    assert_eq!(
        store.find_by_path("./Foo.m3u").unwrap().image(),
        Some("./Imgs/Foo (Disc 1).png")
    );
}

#[test]
fn dry_run_plans_the_same_actions() {
    let dry_dir = two_disc_library();
    let real_dir = two_disc_library();
    let mut dry_store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();
    let mut real_store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();

    let planned = run(dry_dir.path(), &mut dry_store, &mut DryRunFs::new());
    let done = run(real_dir.path(), &mut real_store, &mut RealFs);

    let strip = |titles: Vec<TitleReport>, root: &Path| -> Vec<String> {
        titles
            .iter()
            .flat_map(|t| &t.actions)
            .map(|a| format!("{a:?}").replace(&root.display().to_string(), "<root>"))
            .collect()
    };
    assert_eq!(strip(planned, dry_dir.path()), strip(done, real_dir.path()));
    assert_eq!(dry_store.to_xml_string(), real_store.to_xml_string());
    assert!(!dry_dir.path().join("Foo.m3u").exists());
    assert!(dry_dir.path().join("Imgs/Foo (Disc 2).png").exists());
}

/// Real filesystem whose deletes always fail.
struct NoDeleteFs;

impl FileOps for NoDeleteFs {
    fn exists(&self, path: &Path) -> bool {
        RealFs.exists(path)
    }
    fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
        RealFs.list_files(root)
    }
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        RealFs.write(path, contents)
    }
    fn rename(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        RealFs.rename(from, to)
    }
    fn remove_file(&mut self, _path: &Path) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
    fn is_dry_run(&self) -> bool {
        false
    }
}

#[test]
fn failed_delete_aborts_only_that_title() {
    let dir = two_disc_library();
    touch(&dir.path().join("Zed (Disc 1).chd"));
    let mut store = GamelistStore::parse(TWO_DISC_GAMELIST).unwrap();

    let titles = run(dir.path(), &mut store, &mut NoDeleteFs);
    assert_eq!(titles.len(), 2);
    assert_eq!(titles[0].title, "Foo");
    assert!(titles[0].error.is_some());
    assert_eq!(titles[0].state, TitleState::DuplicatesRemoved);
    assert_eq!(titles[1].title, "Zed");
    assert_eq!(titles[1].state, TitleState::Done);
    assert!(dir.path().join("Zed.m3u").exists());
}
