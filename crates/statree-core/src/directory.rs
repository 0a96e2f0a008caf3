//! Telemetry directory: a registry of weakly-held named children.
//!
//! A directory never owns its entries. It records a weak handle per name and
//! prunes expired handles lazily, so an entry vanishes from the tree the
//! moment its last strong holder releases it — no explicit delete call
//! exists. Within one directory, live entries keep their insertion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use crate::agg::{self, AggOperation};
use crate::error::{Result, StatreeError};
use crate::file::{File, FileOps};
use crate::node::{Entry, NodeBase, WeakEntry};
use crate::path;
use crate::symlink::Symlink;

/// Directory node.
///
/// Might be empty or contain one or more files, subdirectories, symlinks,
/// and aggregated files; each entry has a unique name among the currently
/// live entries.
pub struct Directory {
    base: NodeBase,
    // Handed to children as their strong parent link; an `&self` method
    // cannot otherwise produce the owning `Arc`.
    weak_self: Weak<Directory>,
    entries: Mutex<Vec<(String, WeakEntry)>>,
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("path", &self.full_path())
            .finish_non_exhaustive()
    }
}

impl Directory {
    /// Construct an empty root directory (empty name, path `/`).
    pub fn root() -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            base: NodeBase::root(),
            weak_self: weak_self.clone(),
            entries: Mutex::new(Vec::new()),
        })
    }

    fn new_child(parent: Arc<Directory>, name: &str) -> Result<Arc<Self>> {
        let base = NodeBase::new(Some(parent), name)?;
        Ok(Arc::new_cyclic(|weak_self| Self {
            base,
            weak_self: weak_self.clone(),
            entries: Mutex::new(Vec::new()),
        }))
    }

    /// Name of the directory (empty for the root).
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Full path from the root, including this directory's name.
    pub fn full_path(&self) -> String {
        self.base.full_path()
    }

    /// Add or get a subdirectory with the given `name`.
    ///
    /// If a live subdirectory with that name already exists, it is returned.
    /// A previously registered entry that has expired is silently replaced.
    /// Fails with `NameConflict` if the name resolves to a live non-directory
    /// entry.
    pub fn add_dir(&self, name: &str) -> Result<Arc<Directory>> {
        let parent = self.self_arc()?;
        let mut entries = self.lock_entries();

        if let Some(existing) = live_entry(&entries, name) {
            return match existing {
                Entry::Dir(dir) => Ok(dir),
                _ => Err(self.entry_already_exists(name)),
            };
        }

        let child = Directory::new_child(parent, name)?;
        register(&mut entries, name, WeakEntry::Dir(Arc::downgrade(&child)));
        Ok(child)
    }

    /// Add or get a chain of subdirectories described by a `/`-separated
    /// `path` (empty segments are discarded). Equivalent to one `add_dir`
    /// call per segment; returns the last directory in the chain.
    pub fn add_dirs(&self, path: &str) -> Result<Arc<Directory>> {
        let mut dir = self.self_arc()?;
        for segment in path::parse_path(path) {
            dir = dir.add_dir(segment)?;
        }
        Ok(dir)
    }

    /// Add a new file with the given `name` and `ops` I/O operations.
    ///
    /// Fails with `NameConflict` if the name is occupied by any live entry,
    /// file or otherwise. An expired entry is silently replaced.
    pub fn add_file(&self, name: &str, ops: FileOps) -> Result<Arc<File>> {
        let parent = self.self_arc()?;
        let mut entries = self.lock_entries();

        if live_entry(&entries, name).is_some() {
            return Err(self.entry_already_exists(name));
        }

        let file = File::new(parent, name, ops)?;
        register(&mut entries, name, WeakEntry::File(Arc::downgrade(&file)));
        Ok(file)
    }

    /// Add an aggregated file whose reads fan in over every file matching
    /// `pattern` below this directory.
    ///
    /// `pattern` is a `/`-separated sequence of regular expressions, one per
    /// path segment, matched in full against entry names at each level. The
    /// operation set and the pattern are validated here, at construction.
    pub fn add_agg_file(
        &self,
        name: &str,
        pattern: &str,
        operations: &[AggOperation],
    ) -> Result<Arc<File>> {
        let root = self.self_arc()?;
        self.add_agg_file_with_root(name, pattern, operations, &root)
    }

    /// Same as [`add_agg_file`](Self::add_agg_file), but matches `pattern`
    /// against the subtree below `pattern_root` instead of this directory.
    /// The root is held weakly; reads after it has been destroyed fail with
    /// `StaleReference`.
    pub fn add_agg_file_with_root(
        &self,
        name: &str,
        pattern: &str,
        operations: &[AggOperation],
        pattern_root: &Arc<Directory>,
    ) -> Result<Arc<File>> {
        let parent = self.self_arc()?;
        let mut entries = self.lock_entries();

        if live_entry(&entries, name).is_some() {
            return Err(self.entry_already_exists(name));
        }

        let ops = agg::build_aggregated_ops(pattern, operations, Arc::downgrade(pattern_root))?;
        let file = File::new(parent, name, ops)?;
        register(&mut entries, name, WeakEntry::File(Arc::downgrade(&file)));
        Ok(file)
    }

    /// Add a symlink pointing at `target`. The target is held weakly, so the
    /// symlink does not keep it alive.
    pub fn add_symlink(&self, name: &str, target: impl Into<Entry>) -> Result<Arc<Symlink>> {
        let parent = self.self_arc()?;
        let mut entries = self.lock_entries();

        if live_entry(&entries, name).is_some() {
            return Err(self.entry_already_exists(name));
        }

        let symlink = Symlink::new(parent, name, &target.into())?;
        register(
            &mut entries,
            name,
            WeakEntry::Symlink(Arc::downgrade(&symlink)),
        );
        Ok(symlink)
    }

    /// List the names of all live entries, in insertion order.
    ///
    /// Expired entries are pruned as a side effect.
    pub fn list_entries(&self) -> Vec<String> {
        let mut entries = self.lock_entries();

        entries.retain(|(name, weak)| {
            if weak.upgrade().is_some() {
                true
            } else {
                trace!(name = %name, "pruning expired entry");
                false
            }
        });

        entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Get the live entry registered under `name`.
    ///
    /// A reader walking the tree asynchronously must assume that a name
    /// obtained from [`list_entries`](Self::list_entries) may have expired by
    /// the time it is looked up; `None` signals the entry is gone and is not
    /// an error.
    pub fn get_entry(&self, name: &str) -> Option<Entry> {
        let entries = self.lock_entries();
        live_entry(&entries, name)
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<(String, WeakEntry)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn self_arc(&self) -> Result<Arc<Directory>> {
        self.weak_self.upgrade().ok_or_else(|| {
            StatreeError::Internal(format!(
                "Directory('{}'): self reference expired",
                self.full_path()
            ))
        })
    }

    fn entry_already_exists(&self, name: &str) -> StatreeError {
        StatreeError::NameConflict(format!(
            "Directory('{}'): unable to add entry '{}' as it already exists",
            self.full_path(),
            name
        ))
    }
}

fn live_entry(entries: &[(String, WeakEntry)], name: &str) -> Option<Entry> {
    entries
        .iter()
        .find(|(entry_name, _)| entry_name == name)
        .and_then(|(_, weak)| weak.upgrade())
}

// The caller has already established that no live entry occupies `name`; any
// remaining slot with that name is expired and is dropped so the new entry
// takes its place at the end of the insertion order.
fn register(entries: &mut Vec<(String, WeakEntry)>, name: &str, weak: WeakEntry) {
    if let Some(index) = entries.iter().position(|(entry_name, _)| entry_name == name) {
        trace!(name = %name, "replacing expired entry");
        entries.remove(index);
    }
    entries.push((name.to_string(), weak));
}
