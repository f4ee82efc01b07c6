//! Path codec
//!
//! Converts between dotted-key flat maps and nested trees in both directions.
//!
//! When two writes disagree about whether a segment is a leaf or a branch
//! (`"a.b"` and `"a.b.c"` in the same batch), the deeper write wins no matter
//! which comes first: a leaf in the way of a branch is replaced, and a leaf
//! written onto an existing branch is dropped. Writes to the same full path
//! are last-wins.

use indexmap::map::Entry;

use crate::field_errors::{ErrorMap, ErrorNode, ErrorTree};
use crate::path::{FieldPath, PATH_SEPARATOR};
use crate::value::{FormValue, ValueTree};

/// Assign `value` at `path` inside `target`, creating intermediate maps
pub fn build_nested(target: &mut ValueTree, path: &FieldPath, value: FormValue) {
    let (parents, last) = path.split_last();

    let mut node = target;
    for segment in parents {
        let slot = node
            .0
            .entry(segment.clone())
            .or_insert_with(|| FormValue::Map(ValueTree::new()));
        if !slot.is_map() {
            tracing::trace!(path = %path, segment = %segment, "replacing leaf value with branch");
            *slot = FormValue::Map(ValueTree::new());
        }
        node = match slot {
            FormValue::Map(tree) => tree,
            _ => unreachable!("slot was just made a map"),
        };
    }

    match node.0.entry(last.to_string()) {
        Entry::Occupied(mut existing) => {
            if existing.get().is_map() && !value.is_map() {
                tracing::trace!(path = %path, "dropping leaf write onto existing branch");
            } else {
                existing.insert(value);
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
    }
}

/// Expand FormData-style `(name, value)` pairs into a [`ValueTree`].
///
/// Dotted names are nested; plain names are assigned directly.
pub fn expand_entries<I>(entries: I) -> ValueTree
where
    I: IntoIterator<Item = (FieldPath, FormValue)>,
{
    let mut tree = ValueTree::new();
    for (path, value) in entries {
        build_nested(&mut tree, &path, value);
    }
    tree
}

/// Nest a flat [`ErrorMap`] into an [`ErrorTree`]
pub fn unflatten(flat: &ErrorMap) -> ErrorTree {
    let mut tree = ErrorTree::new();
    for (key, message) in flat.iter() {
        insert_error(&mut tree, key, message);
    }
    tree
}

fn insert_error(tree: &mut ErrorTree, key: &str, message: &str) {
    let segments: Vec<&str> = key.split(PATH_SEPARATOR).collect();
    let (last, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut node = tree;
    for segment in parents {
        let slot = node
            .0
            .entry((*segment).to_string())
            .or_insert_with(|| ErrorNode::Nested(ErrorTree::new()));
        if let ErrorNode::Message(_) = slot {
            tracing::trace!(key, segment, "replacing leaf error with branch");
            *slot = ErrorNode::Nested(ErrorTree::new());
        }
        node = match slot {
            ErrorNode::Nested(nested) => nested,
            ErrorNode::Message(_) => unreachable!("slot was just made a branch"),
        };
    }

    match node.0.entry((*last).to_string()) {
        Entry::Occupied(mut existing) => {
            if let ErrorNode::Nested(_) = existing.get() {
                tracing::trace!(key, "dropping leaf error onto existing branch");
            } else {
                existing.insert(ErrorNode::Message(message.to_string()));
            }
        }
        Entry::Vacant(slot) => {
            slot.insert(ErrorNode::Message(message.to_string()));
        }
    }
}

/// Collapse an [`ErrorTree`] back into dotted keys
pub fn flatten(tree: &ErrorTree) -> ErrorMap {
    let mut flat = ErrorMap::new();
    flatten_into(&mut flat, tree, "");
    flat
}

fn flatten_into(flat: &mut ErrorMap, tree: &ErrorTree, prefix: &str) {
    for (key, node) in tree.iter() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{PATH_SEPARATOR}{key}")
        };
        match node {
            ErrorNode::Message(message) => flat.insert(path, message.clone()),
            ErrorNode::Nested(nested) => flatten_into(flat, nested, &path),
        }
    }
}
