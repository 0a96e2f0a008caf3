//! Holder of telemetry nodes.

use crate::node::Entry;

/// External strong-ownership container for tree nodes.
///
/// The tree itself never owns its entries, so application components use a
/// holder to keep the nodes they created alive. On destruction (or via an
/// explicit [`disable_files`](Holder::disable_files) call) the callbacks of
/// all held files are disabled collectively — the hook to use when objects
/// referenced by those callbacks are about to be destroyed while a concurrent
/// reader might still hold a strong reference to a file.
///
/// A holder is meant to be built once during component setup and read-only
/// afterwards; [`add`](Holder::add) takes `&mut self` and is not safe to call
/// concurrently.
#[derive(Default)]
pub struct Holder {
    entries: Vec<Entry>,
}

impl Holder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strong reference to a node.
    pub fn add(&mut self, node: impl Into<Entry>) {
        self.entries.push(node.into());
    }

    /// Disable the callbacks of all held files. Non-file nodes are
    /// unaffected.
    pub fn disable_files(&self) {
        for entry in &self.entries {
            if let Entry::File(file) = entry {
                file.disable();
            }
        }
    }
}

impl Drop for Holder {
    // Files might outlive the holder if someone else holds their reference;
    // their callbacks must not.
    fn drop(&mut self) {
        self.disable_files();
    }
}
