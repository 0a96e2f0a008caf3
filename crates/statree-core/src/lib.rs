//! statree core: the in-memory telemetry tree.
//!
//! Applications publish live internal metrics as a hierarchical namespace of
//! directories, files, and symlinks. The tree owns none of its entries — a
//! parent holds only weak references to its children, so an entry vanishes
//! the moment its last strong holder (a [`Holder`], an application variable)
//! releases it. External observers walk the tree through the [`Directory`],
//! [`File`], and [`Symlink`] contracts and read typed [`Content`] values,
//! optionally aggregated across many files at once by pattern.
//!
//! This crate intentionally carries no transport or runtime dependencies so
//! it can be embedded anywhere; filesystem (FUSE) or HTTP presentation is an
//! adapter's job, as are process lifecycle and configuration loading.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `StatreeError`/`Result` so a telemetry
//! read can never take the host process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod agg;
pub mod content;
pub mod directory;
pub mod error;
pub mod file;
pub mod holder;
pub mod node;
pub mod path;
pub mod symlink;

pub use agg::{AggMethod, AggMethodType, AggOperation};
pub use content::{Array, Content, Dict, DictValue, Scalar, ScalarWithUnit};
pub use directory::Directory;
pub use error::{ErrorKind, Result, StatreeError};
pub use file::{ClearHandler, File, FileOps, ReadHandler};
pub use holder::Holder;
pub use node::{Entry, WeakEntry};
pub use symlink::Symlink;
