//! File callback and disable tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use statree_core::{Content, Directory, ErrorKind, FileOps, Scalar};

#[test]
fn file_without_ops() {
    let root = Directory::root();
    let file = root.add_file("inert", FileOps::default()).unwrap();

    assert!(!file.has_read());
    assert!(!file.has_clear());

    assert_eq!(file.read().unwrap_err().kind(), ErrorKind::Unsupported);
    assert_eq!(file.clear().unwrap_err().kind(), ErrorKind::Unsupported);
}

#[test]
fn read_reflects_application_state() {
    let root = Directory::root();
    let packets = Arc::new(AtomicU64::new(0));

    let read_counter = Arc::clone(&packets);
    let file = root
        .add_file(
            "packets",
            FileOps {
                read: Some(Box::new(move || {
                    Ok(Content::Scalar(Scalar::U64(
                        read_counter.load(Ordering::Relaxed),
                    )))
                })),
                clear: None,
            },
        )
        .unwrap();

    assert!(file.has_read());
    assert!(!file.has_clear());

    assert_eq!(file.read().unwrap(), Content::Scalar(Scalar::U64(0)));
    packets.store(42, Ordering::Relaxed);
    assert_eq!(file.read().unwrap(), Content::Scalar(Scalar::U64(42)));
}

#[test]
fn clear_resets_application_state() {
    let root = Directory::root();
    let packets = Arc::new(AtomicU64::new(1000));

    let clear_counter = Arc::clone(&packets);
    let file = root
        .add_file(
            "packets",
            FileOps {
                read: None,
                clear: Some(Box::new(move || {
                    clear_counter.store(0, Ordering::Relaxed);
                })),
            },
        )
        .unwrap();

    assert!(!file.has_read());
    assert!(file.has_clear());

    file.clear().unwrap();
    assert_eq!(packets.load(Ordering::Relaxed), 0);
}

#[test]
fn disable_is_permanent_and_idempotent() {
    let root = Directory::root();
    let file = root
        .add_file(
            "uptime",
            FileOps {
                read: Some(Box::new(|| Ok(Content::Scalar(Scalar::U64(7))))),
                clear: Some(Box::new(|| {})),
            },
        )
        .unwrap();

    assert!(file.has_read());
    assert!(file.has_clear());

    file.disable();
    assert!(!file.has_read());
    assert!(!file.has_clear());
    assert_eq!(file.read().unwrap_err().kind(), ErrorKind::Unsupported);
    assert_eq!(file.clear().unwrap_err().kind(), ErrorKind::Unsupported);

    file.disable();
    assert!(!file.has_read());
}

#[test]
fn error_kind_strings_are_stable() {
    let root = Directory::root();
    let file = root.add_file("f", FileOps::default()).unwrap();

    let err = file.read().unwrap_err();
    assert_eq!(err.kind().as_str(), "UNSUPPORTED");
    assert!(err.to_string().contains("/f"));
}
