//! Telemetry file: optional read/clear callbacks over [`Content`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::content::Content;
use crate::directory::Directory;
use crate::error::{Result, StatreeError};
use crate::node::NodeBase;

/// Produces the current content of a file.
pub type ReadHandler = Box<dyn Fn() -> Result<Content> + Send + Sync>;

/// Resets whatever application state backs a file.
pub type ClearHandler = Box<dyn Fn() + Send + Sync>;

/// File I/O operations. Both are optional; either, both, or neither may be
/// present.
#[derive(Default)]
pub struct FileOps {
    pub read: Option<ReadHandler>,
    pub clear: Option<ClearHandler>,
}

/// File entry.
///
/// Lets an asynchronous visitor obtain telemetry information from, or
/// interact with, an application component through the optional callbacks in
/// [`FileOps`].
///
/// The callbacks may reference arbitrary application state, and the file
/// offers no isolation beyond its own lock. If an object referenced by a
/// callback must be destroyed while some visitor might still hold a strong
/// reference to the file, call [`disable`](File::disable) first (usually via
/// [`Holder`](crate::holder::Holder)) so the callback can no longer run.
pub struct File {
    base: NodeBase,
    ops: Mutex<FileOps>,
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("path", &self.full_path())
            .finish_non_exhaustive()
    }
}

impl File {
    pub(crate) fn new(parent: Arc<Directory>, name: &str, ops: FileOps) -> Result<Arc<Self>> {
        let base = NodeBase::new(Some(parent), name)?;
        Ok(Arc::new(Self {
            base,
            ops: Mutex::new(ops),
        }))
    }

    /// Name of the file.
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Full path from the root, including the file name.
    pub fn full_path(&self) -> String {
        self.base.full_path()
    }

    /// Test whether the file supports the read operation.
    pub fn has_read(&self) -> bool {
        self.lock_ops().read.is_some()
    }

    /// Test whether the file supports the clear operation.
    pub fn has_clear(&self) -> bool {
        self.lock_ops().clear.is_some()
    }

    /// Execute the read operation.
    ///
    /// The callback runs under this file's lock, so a concurrent
    /// [`disable`](File::disable) resolves to either a full execution or a
    /// clean `Unsupported` failure — never a torn invocation.
    pub fn read(&self) -> Result<Content> {
        let ops = self.lock_ops();
        match &ops.read {
            Some(read) => read(),
            None => Err(StatreeError::Unsupported(format!(
                "File::read('{}')",
                self.full_path()
            ))),
        }
    }

    /// Execute the clear operation.
    pub fn clear(&self) -> Result<()> {
        let ops = self.lock_ops();
        match &ops.clear {
            Some(clear) => {
                clear();
                Ok(())
            }
            None => Err(StatreeError::Unsupported(format!(
                "File::clear('{}')",
                self.full_path()
            ))),
        }
    }

    /// Disable all I/O operations. Idempotent; subsequent `read`/`clear`
    /// calls fail with `Unsupported`.
    pub fn disable(&self) {
        *self.lock_ops() = FileOps::default();
        debug!(path = %self.full_path(), "file disabled");
    }

    fn lock_ops(&self) -> MutexGuard<'_, FileOps> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
