//! Aggregated file: pattern-based fan-in over a subtree.
//!
//! An aggregated file is an ordinary [`File`] whose read handler owns the
//! compiled pattern, the configured methods, and a weak reference to the
//! directory the pattern is matched against. Every read re-scans the tree
//! and re-reads every match; nothing is cached.

use std::sync::{Arc, Weak};

use regex::Regex;
use tracing::debug;

use crate::content::{Content, Scalar};
use crate::directory::Directory;
use crate::error::{Result, StatreeError};
use crate::file::{File, FileOps};
use crate::node::Entry;
use crate::path::parse_path;

use super::{validate_operations, AggMethod, AggOperation};

/// Validate `operations`, compile `pattern`, and build the read-only
/// [`FileOps`] implementing the aggregated read.
pub(crate) fn build_aggregated_ops(
    pattern: &str,
    operations: &[AggOperation],
    pattern_root: Weak<Directory>,
) -> Result<FileOps> {
    validate_operations(operations)?;

    let methods: Vec<AggMethod> = operations.iter().map(AggMethod::new).collect();
    let segments = compile_pattern(pattern)?;
    let pattern = pattern.to_string();

    let read = move || read_aggregated(&pattern, &segments, &methods, &pattern_root);
    Ok(FileOps {
        read: Some(Box::new(read)),
        clear: None,
    })
}

// One anchored regex per path segment: a segment must match an entry name in
// full, not as a substring.
fn compile_pattern(pattern: &str) -> Result<Vec<Regex>> {
    parse_path(pattern)
        .iter()
        .map(|segment| {
            Regex::new(&format!("^(?:{segment})$")).map_err(|e| {
                StatreeError::InvalidConfiguration(format!(
                    "invalid pattern segment '{segment}': {e}"
                ))
            })
        })
        .collect()
}

fn read_aggregated(
    pattern: &str,
    segments: &[Regex],
    methods: &[AggMethod],
    pattern_root: &Weak<Directory>,
) -> Result<Content> {
    let root = pattern_root.upgrade().ok_or_else(|| {
        StatreeError::StaleReference(
            "pattern root directory no longer exists".to_string(),
        )
    })?;

    let files = collect_matches(&root, segments);
    debug!(pattern, matches = files.len(), "aggregated read");

    let mut contents = Vec::with_capacity(files.len());
    for file in &files {
        if !file.has_read() {
            return Err(StatreeError::MissingRead(format!(
                "matched file '{}'",
                file.full_path()
            )));
        }
        contents.push(file.read()?);
    }

    let mut merged = Content::Scalar(Scalar::Absent);
    for method in methods {
        let result = method.aggregate(&contents)?;
        merge_content(&mut merged, result);
    }

    Ok(merged)
}

// Breadth-first walk: every non-final segment widens the candidate set to
// all matching live subdirectories, the final segment selects files. The
// scan locks each directory individually, so a concurrent mutation may be
// observed partially — there is no snapshot isolation.
fn collect_matches(root: &Arc<Directory>, segments: &[Regex]) -> Vec<Arc<File>> {
    let Some((file_segment, dir_segments)) = segments.split_last() else {
        return Vec::new();
    };

    let mut dirs = vec![Arc::clone(root)];
    for regex in dir_segments {
        let mut next = Vec::new();
        for dir in &dirs {
            for name in dir.list_entries() {
                if !regex.is_match(&name) {
                    continue;
                }
                if let Some(Entry::Dir(sub)) = dir.get_entry(&name) {
                    next.push(sub);
                }
            }
        }
        dirs = next;
    }

    let mut files = Vec::new();
    for dir in &dirs {
        for name in dir.list_entries() {
            if !file_segment.is_match(&name) {
                continue;
            }
            if let Some(Entry::File(file)) = dir.get_entry(&name) {
                files.push(file);
            }
        }
    }

    files
}

// Dictionary results union their keys (a later operation wins on
// duplicates); any other combination replaces the accumulator outright.
fn merge_content(accumulator: &mut Content, next: Content) {
    match (accumulator, next) {
        (Content::Dict(accumulated), Content::Dict(next)) => accumulated.extend(next),
        (accumulator, next) => *accumulator = next,
    }
}
