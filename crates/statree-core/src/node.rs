//! Common identity and ownership base of all tree nodes.
//!
//! Ownership is inverted with respect to a conventional tree: a child holds a
//! *strong* reference to its parent (no ancestor can be destroyed while a
//! descendant is reachable), while a parent directory holds only *weak*
//! back-references to its children. A node's lifetime is therefore governed
//! entirely by whoever else holds a strong reference to it — typically a
//! [`Holder`](crate::holder::Holder) or an application variable — never by
//! the tree itself.

use std::sync::{Arc, Weak};

use crate::directory::Directory;
use crate::error::{Result, StatreeError};
use crate::file::File;
use crate::symlink::Symlink;

fn is_valid_character(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '-' || character == '_'
}

/// Name, parent linkage, and path derivation shared by every node type.
pub(crate) struct NodeBase {
    name: String,
    parent: Option<Arc<Directory>>,
}

impl std::fmt::Debug for NodeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeBase")
            .field("path", &self.full_path())
            .finish_non_exhaustive()
    }
}

impl NodeBase {
    /// Base of the root directory: empty name, no parent.
    pub(crate) fn root() -> Self {
        Self {
            name: String::new(),
            parent: None,
        }
    }

    /// Base of a non-root node. The name can contain only digits, letters,
    /// and a few special characters (`-`, `_`); validation happens here,
    /// once, at construction.
    pub(crate) fn new(parent: Option<Arc<Directory>>, name: &str) -> Result<Self> {
        if parent.is_none() {
            return Err(StatreeError::MissingParent(format!(
                "node '{name}' cannot be constructed without a parent"
            )));
        }

        if name.is_empty() {
            return Err(StatreeError::InvalidName(
                "empty name is not allowed".to_string(),
            ));
        }

        if let Some(character) = name.chars().find(|c| !is_valid_character(*c)) {
            return Err(StatreeError::InvalidName(format!(
                "prohibited character '{character}' in name '{name}'"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            parent,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Full path from the root to this node, segments joined with `/`.
    /// The root's path is `/`.
    pub(crate) fn full_path(&self) -> String {
        let Some(parent) = &self.parent else {
            return if self.name.is_empty() {
                "/".to_string()
            } else {
                self.name.clone()
            };
        };

        let mut path = parent.full_path();
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(&self.name);
        path
    }
}

/// Strong handle to a live tree node.
#[derive(Clone)]
pub enum Entry {
    Dir(Arc<Directory>),
    File(Arc<File>),
    Symlink(Arc<Symlink>),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::Dir(node) => node.name(),
            Entry::File(node) => node.name(),
            Entry::Symlink(node) => node.name(),
        }
    }

    pub fn full_path(&self) -> String {
        match self {
            Entry::Dir(node) => node.full_path(),
            Entry::File(node) => node.full_path(),
            Entry::Symlink(node) => node.full_path(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Dir(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Entry::Symlink(_))
    }

    pub fn as_dir(&self) -> Option<&Arc<Directory>> {
        match self {
            Entry::Dir(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<File>> {
        match self {
            Entry::File(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_symlink(&self) -> Option<&Arc<Symlink>> {
        match self {
            Entry::Symlink(node) => Some(node),
            _ => None,
        }
    }

    pub fn downgrade(&self) -> WeakEntry {
        match self {
            Entry::Dir(node) => WeakEntry::Dir(Arc::downgrade(node)),
            Entry::File(node) => WeakEntry::File(Arc::downgrade(node)),
            Entry::Symlink(node) => WeakEntry::Symlink(Arc::downgrade(node)),
        }
    }
}

impl From<Arc<Directory>> for Entry {
    fn from(node: Arc<Directory>) -> Self {
        Entry::Dir(node)
    }
}

impl From<Arc<File>> for Entry {
    fn from(node: Arc<File>) -> Self {
        Entry::File(node)
    }
}

impl From<Arc<Symlink>> for Entry {
    fn from(node: Arc<Symlink>) -> Self {
        Entry::Symlink(node)
    }
}

impl From<&Arc<Directory>> for Entry {
    fn from(node: &Arc<Directory>) -> Self {
        Entry::Dir(Arc::clone(node))
    }
}

impl From<&Arc<File>> for Entry {
    fn from(node: &Arc<File>) -> Self {
        Entry::File(Arc::clone(node))
    }
}

impl From<&Arc<Symlink>> for Entry {
    fn from(node: &Arc<Symlink>) -> Self {
        Entry::Symlink(Arc::clone(node))
    }
}

/// Non-owning handle to a tree node; must be upgraded before use.
#[derive(Clone)]
pub enum WeakEntry {
    Dir(Weak<Directory>),
    File(Weak<File>),
    Symlink(Weak<Symlink>),
}

impl WeakEntry {
    /// Resolve the handle, or `None` if the node has been destroyed.
    pub fn upgrade(&self) -> Option<Entry> {
        match self {
            WeakEntry::Dir(node) => node.upgrade().map(Entry::Dir),
            WeakEntry::File(node) => node.upgrade().map(Entry::File),
            WeakEntry::Symlink(node) => node.upgrade().map(Entry::Symlink),
        }
    }
}
