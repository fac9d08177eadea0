//! Flattening the heterogeneous node tree into the menu sequence.
//!
//! The side menu needs one ordered list to index into, but menu items hang
//! off the tree through several different relations (an operation's menu
//! children are its parameters and its responses, a response's are the
//! fields of whichever media type schema it carries). A single depth-first
//! pass recurses through a fixed relation priority list and keeps only the
//! menu-eligible kinds, preserving source order exactly: no sorting, no
//! deduplication.

use crate::document::DocumentTree;
use crate::node::{ChildRelation, MenuKind};

/// Child relations the menu traversal recurses through, in priority order.
pub const MENU_RELATIONS: [ChildRelation; 9] = [
    ChildRelation::Items,
    ChildRelation::Parameters,
    ChildRelation::Content,
    ChildRelation::RequestBody,
    ChildRelation::MediaTypes,
    ChildRelation::Schema,
    ChildRelation::Variants,
    ChildRelation::Fields,
    ChildRelation::Responses,
];

/// Node kinds kept in the flattened menu sequence.
pub const MENU_KINDS: [MenuKind; 5] = [
    MenuKind::Operation,
    MenuKind::Field,
    MenuKind::Group,
    MenuKind::Tag,
    MenuKind::Section,
];

#[must_use]
/// Flatten the tree into the ordered menu sequence of arena handles.
///
/// Depth-first pre-order over every root: a node is appended when its menu
/// kind is in `kept`, then each relation in `relations` is recursed in
/// order. The output order is a pure function of the input order.
pub fn flatten(
    tree: &DocumentTree,
    relations: &[ChildRelation],
    kept: &[MenuKind],
) -> Vec<usize> {
    let mut out = Vec::new();
    for &root in tree.roots() {
        visit(tree, root, relations, kept, &mut out);
    }
    out
}

fn visit(
    tree: &DocumentTree,
    idx: usize,
    relations: &[ChildRelation],
    kept: &[MenuKind],
    out: &mut Vec<usize>,
) {
    let node = tree.node(idx);
    if node.menu_kind().is_some_and(|kind| kept.contains(&kind)) {
        out.push(idx);
    }
    for &relation in relations {
        for &child in node.related(relation) {
            visit(tree, child, relations, kept, out);
        }
    }
}

/// Record each flattened node's position in the sequence on the node itself.
pub fn assign_absolute_indices(tree: &mut DocumentTree, flat: &[usize]) {
    for (position, &idx) in flat.iter().enumerate() {
        tree.node_mut(idx).absolute_idx = Some(position);
    }
}

#[cfg(test)]
#[path = "tests/flatten.rs"]
mod tests;
