//! Top-level facade crate for statree.
//!
//! Re-exports the core so applications and adapter crates can depend on a
//! single crate.

pub mod core {
    pub use statree_core::*;
}
