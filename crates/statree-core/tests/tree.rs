//! Directory registry and ownership tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use statree_core::{Directory, ErrorKind, FileOps};

#[test]
fn create_root() {
    let root = Directory::root();
    assert_eq!(root.name(), "");
    assert_eq!(root.full_path(), "/");
}

#[test]
fn add_dir() {
    let root = Directory::root();

    let info = root.add_dir("info").unwrap();
    assert_eq!(info.name(), "info");
    assert_eq!(info.full_path(), "/info");

    let app = info.add_dir("app").unwrap();
    assert_eq!(app.name(), "app");
    assert_eq!(app.full_path(), "/info/app");

    // Adding an existing live directory returns the previously created one.
    let info2 = root.add_dir("info").unwrap();
    assert!(Arc::ptr_eq(&info, &info2));
}

#[test]
fn add_dir_invalid() {
    let root = Directory::root();

    let err = root.add_dir("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidName);

    let err = root.add_dir("superCool!").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidName);

    let _version = root.add_file("version", FileOps::default()).unwrap();
    let err = root.add_dir("version").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameConflict);
}

#[test]
fn add_dir_removed() {
    let root = Directory::root();

    {
        let app = root.add_dir("app").unwrap();
        assert!(root.get_entry("app").is_some());
        assert!(root.get_entry("port").is_none());

        {
            let port = root.add_dir("port").unwrap();
            assert!(Arc::ptr_eq(
                &port,
                root.get_entry("port").unwrap().as_dir().unwrap()
            ));
        }

        // `port` went out of scope; its entry expired.
        assert!(root.get_entry("port").is_none());
        assert!(Arc::ptr_eq(
            &app,
            root.get_entry("app").unwrap().as_dir().unwrap()
        ));

        let port2 = root.add_dir("port").unwrap();
        assert!(root.get_entry("port").is_some());
        drop(port2);
    }

    assert!(root.get_entry("app").is_none());
    assert!(root.get_entry("port").is_none());

    let _app2 = root.add_dir("app").unwrap();
    let _port3 = root.add_dir("port").unwrap();
    assert!(root.get_entry("app").is_some());
    assert!(root.get_entry("port").is_some());
}

#[test]
fn add_file() {
    let root = Directory::root();

    let pid = root.add_file("pid", FileOps::default()).unwrap();
    assert_eq!(pid.name(), "pid");
    assert_eq!(pid.full_path(), "/pid");

    let cache = root.add_dir("cache").unwrap();
    let cache_info = cache.add_file("info", FileOps::default()).unwrap();
    assert_eq!(cache_info.full_path(), "/cache/info");
}

#[test]
fn add_file_invalid() {
    let root = Directory::root();

    let err = root.add_file("", FileOps::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidName);

    let err = root.add_file("superCool!", FileOps::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidName);

    let _info = root.add_file("info", FileOps::default()).unwrap();
    let err = root.add_file("info", FileOps::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameConflict);

    let _version = root.add_dir("version").unwrap();
    let err = root.add_file("version", FileOps::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NameConflict);
}

#[test]
fn name_conflict_clears_after_release() {
    let root = Directory::root();

    let stats = root.add_file("stats", FileOps::default()).unwrap();
    assert_eq!(
        root.add_dir("stats").unwrap_err().kind(),
        ErrorKind::NameConflict
    );

    drop(stats);
    // The expired entry is silently replaced.
    let stats_dir = root.add_dir("stats").unwrap();
    assert_eq!(stats_dir.full_path(), "/stats");
}

#[test]
fn add_dirs_creates_each_segment() {
    let root = Directory::root();

    let leaf = root.add_dirs("servers/server_0/net").unwrap();
    assert_eq!(leaf.full_path(), "/servers/server_0/net");

    // Empty segments are discarded.
    let same = root.add_dirs("//servers//server_0/net/").unwrap();
    assert!(Arc::ptr_eq(&leaf, &same));

    // An empty path resolves to the directory itself.
    let this = root.add_dirs("").unwrap();
    assert!(Arc::ptr_eq(&root, &this));

    let err = root.add_dirs("servers/bad name").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidName);
}

#[test]
fn list_entries_keeps_insertion_order() {
    let root = Directory::root();

    let _c = root.add_dir("charlie").unwrap();
    let alpha = root.add_dir("alpha").unwrap();
    let _b = root.add_file("bravo", FileOps::default()).unwrap();

    assert_eq!(root.list_entries(), ["charlie", "alpha", "bravo"]);

    drop(alpha);
    assert_eq!(root.list_entries(), ["charlie", "bravo"]);

    // Re-added entries go to the back of the order.
    let _alpha2 = root.add_dir("alpha").unwrap();
    assert_eq!(root.list_entries(), ["charlie", "bravo", "alpha"]);
}

#[test]
fn expired_children_disappear() {
    let root = Directory::root();
    let dir = root.add_dir("pool").unwrap();

    let child = dir.add_dir("worker").unwrap();
    assert!(dir.get_entry("worker").is_some());

    drop(child);
    assert!(dir.get_entry("worker").is_none());
    assert!(dir.list_entries().is_empty());
}

#[test]
fn children_keep_ancestors_alive() {
    let root = Directory::root();

    let leaf = root.add_dirs("a/b/c").unwrap();
    // Only the leaf is held strongly, yet the whole chain stays reachable
    // because each child holds a strong reference to its parent.
    assert!(root.get_entry("a").is_some());
    assert_eq!(leaf.full_path(), "/a/b/c");

    drop(leaf);
    assert!(root.get_entry("a").is_none());
}

#[test]
fn entry_kinds() {
    let root = Directory::root();

    let dir = root.add_dir("dir").unwrap();
    let file = root.add_file("file", FileOps::default()).unwrap();
    let link = root.add_symlink("link", &file).unwrap();

    let entry = root.get_entry("dir").unwrap();
    assert!(entry.is_dir());
    assert!(Arc::ptr_eq(&dir, entry.as_dir().unwrap()));

    let entry = root.get_entry("file").unwrap();
    assert!(entry.is_file());
    assert!(entry.as_dir().is_none());

    let entry = root.get_entry("link").unwrap();
    assert!(entry.is_symlink());
    assert_eq!(entry.full_path(), "/link");
    drop(link);
}
