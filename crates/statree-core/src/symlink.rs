//! Symbolic link: a node that weakly references another node.

use std::sync::Arc;

use crate::directory::Directory;
use crate::error::Result;
use crate::node::{Entry, NodeBase, WeakEntry};

/// Symlink entry.
///
/// Points at another node (directory, file, or symlink) without keeping it
/// alive. How the link is presented to observers — e.g. as a relative
/// filesystem path — is the adapter's business.
pub struct Symlink {
    base: NodeBase,
    target: WeakEntry,
}

impl std::fmt::Debug for Symlink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Symlink")
            .field("path", &self.full_path())
            .finish_non_exhaustive()
    }
}

impl Symlink {
    pub(crate) fn new(parent: Arc<Directory>, name: &str, target: &Entry) -> Result<Arc<Self>> {
        let base = NodeBase::new(Some(parent), name)?;
        Ok(Arc::new(Self {
            base,
            target: target.downgrade(),
        }))
    }

    /// Name of the symlink.
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Full path from the root, including the symlink name.
    pub fn full_path(&self) -> String {
        self.base.full_path()
    }

    /// Resolve the target node, or `None` if it has been destroyed.
    pub fn target(&self) -> Option<Entry> {
        self.target.upgrade()
    }
}
