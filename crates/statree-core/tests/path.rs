//! Path parsing and resolution tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use statree_core::path::{parse_path, resolve};
use statree_core::{Directory, FileOps};

#[test]
fn parse_discards_empty_segments() {
    assert_eq!(parse_path("a/b/c"), ["a", "b", "c"]);
    assert_eq!(parse_path("/a//b/"), ["a", "b"]);
    assert!(parse_path("").is_empty());
    assert!(parse_path("///").is_empty());
}

#[test]
fn resolve_root() {
    let root = Directory::root();
    let entry = resolve(&root, "/").unwrap();
    assert!(Arc::ptr_eq(&root, entry.as_dir().unwrap()));

    // No segments and not the literal root path: nothing to resolve.
    assert!(resolve(&root, "").is_none());
}

#[test]
fn resolve_nested_entries() {
    let root = Directory::root();
    let net = root.add_dirs("info/net").unwrap();
    let file = net.add_file("packets", FileOps::default()).unwrap();

    let entry = resolve(&root, "/info/net/packets").unwrap();
    assert!(entry.is_file());
    assert_eq!(entry.full_path(), "/info/net/packets");

    // Redundant slashes are tolerated.
    assert!(resolve(&root, "info//net/packets/").is_some());

    let entry = resolve(&root, "/info/net").unwrap();
    assert!(Arc::ptr_eq(&net, entry.as_dir().unwrap()));
    drop(file);
}

#[test]
fn resolve_misses() {
    let root = Directory::root();
    let info = root.add_dir("info").unwrap();
    let file = info.add_file("pid", FileOps::default()).unwrap();

    assert!(resolve(&root, "/nope").is_none());
    assert!(resolve(&root, "/info/nope").is_none());
    // Intermediate segment resolving to a file stops the walk.
    assert!(resolve(&root, "/info/pid/deeper").is_none());

    drop(file);
    // Expired entries resolve to nothing, not to an error.
    assert!(resolve(&root, "/info/pid").is_none());
}

#[test]
fn resolve_does_not_follow_symlinks() {
    let root = Directory::root();
    let data = root.add_dir("data").unwrap();
    let _file = data.add_file("current", FileOps::default()).unwrap();
    let _link = root.add_symlink("alias", &data).unwrap();

    // The symlink itself resolves...
    assert!(resolve(&root, "/alias").unwrap().is_symlink());
    // ...but paths through it do not.
    assert!(resolve(&root, "/alias/current").is_none());
}
