use super::*;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, "x").unwrap();
}

#[test]
fn real_fs_lists_recursively_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("b.zip"));
    touch(&dir.path().join("sub/a.zip"));
    touch(&dir.path().join("a.zip"));
    let files = RealFs.list_files(dir.path()).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("a.zip"),
            dir.path().join("b.zip"),
            dir.path().join("sub/a.zip"),
        ]
    );
}

#[test]
fn dry_run_never_touches_disk() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    let m3u = dir.path().join("Foo.m3u");
    touch(&a);

    let mut fs = DryRunFs::new();
    fs.write(&m3u, "Foo (Disc 1).chd\n").unwrap();
    fs.rename(&a, &b).unwrap();

    assert!(fs.exists(&m3u));
    assert!(fs.exists(&b));
    assert!(!fs.exists(&a));
    assert!(a.exists());
    assert!(!b.exists());
    assert!(!m3u.exists());
}

#[test]
fn dry_run_listing_reflects_changes() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.png");
    let c = dir.path().join("c.png");
    touch(&a);
    touch(&c);

    let mut fs = DryRunFs::new();
    fs.remove_file(&c).unwrap();
    fs.write(&dir.path().join("b.png"), "").unwrap();
    assert_eq!(
        fs.list_files(dir.path()).unwrap(),
        vec![a, dir.path().join("b.png")]
    );
}

#[test]
fn dry_run_fails_like_real_fs() {
    let dir = tempfile::tempdir().unwrap();
    let ghost = dir.path().join("ghost.png");
    let mut fs = DryRunFs::new();
    assert_eq!(
        fs.remove_file(&ghost).unwrap_err().kind(),
        io::ErrorKind::NotFound
    );
    assert!(fs.rename(&ghost, &dir.path().join("x.png")).is_err());

    touch(&ghost);
    fs.remove_file(&ghost).unwrap();
    assert!(fs.remove_file(&ghost).is_err());
}

#[test]
fn test_list_file_names_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("Foo (Disc 1).chd"));
    touch(&dir.path().join("Imgs/Foo (Disc 1).png"));
    assert_eq!(list_file_names(dir.path()).unwrap(), vec!["Foo (Disc 1).chd"]);
}
