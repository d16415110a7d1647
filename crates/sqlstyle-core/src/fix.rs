//! Applies rule edits to a syntax tree.
//!
//! The input tree is never modified. A new tree is built in which every
//! ancestor of an edited node is rebuilt, so its text is again the
//! concatenation of its children. Subtrees without edits are shared with
//! the input tree and keep their identity.

use crate::rule::{Edit, EditKind};
use crate::tree::{NodeId, SyntaxNode};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors that can occur while applying edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixError {
    /// An edit targets a node that is not part of the tree.
    #[error("{kind} edit targets `{raw}` which is not in the tree")]
    TargetNotFound {
        /// Kind of the offending edit.
        kind: EditKind,
        /// Text of the missing target.
        raw: String,
    },

    /// Two edits both replace or delete the same node.
    #[error("conflicting edits for `{raw}`")]
    ConflictingEdits {
        /// Text of the contested target.
        raw: String,
    },

    /// The root was deleted or replaced by something other than one node.
    #[error("the root node can only be replaced by exactly one node")]
    InvalidRootEdit,
}

#[derive(Default)]
struct TargetEdits<'e> {
    inserts: Vec<&'e Edit>,
    swap: Option<&'e Edit>,
}

/// Applies `edits` to the tree rooted at `root` and returns the new root.
///
/// # Errors
///
/// Returns an error if an edit targets a node outside the tree, if two
/// edits replace or delete the same node, or if the root would be removed.
pub fn apply_edits(root: &SyntaxNode, edits: &[Edit]) -> Result<SyntaxNode, FixError> {
    if edits.is_empty() {
        return Ok(root.clone());
    }

    let mut by_target: HashMap<NodeId, TargetEdits<'_>> = HashMap::new();
    for edit in edits {
        let entry = by_target.entry(edit.target.id()).or_default();
        match edit.kind {
            EditKind::Insert => entry.inserts.push(edit),
            EditKind::Replace | EditKind::Delete => {
                if entry.swap.is_some() {
                    return Err(FixError::ConflictingEdits {
                        raw: edit.target.raw().to_string(),
                    });
                }
                entry.swap = Some(edit);
            }
        }
    }

    let mut applied = HashSet::new();
    let mut rebuilt = rebuild(root, &by_target, &mut applied);

    if let Some(edit) = edits.iter().find(|e| !applied.contains(&e.target.id())) {
        return Err(FixError::TargetNotFound {
            kind: edit.kind,
            raw: edit.target.raw().to_string(),
        });
    }

    if rebuilt.len() != 1 {
        return Err(FixError::InvalidRootEdit);
    }
    rebuilt.pop().ok_or(FixError::InvalidRootEdit)
}

/// Returns the nodes that take the place of `node` in its parent.
fn rebuild(
    node: &SyntaxNode,
    by_target: &HashMap<NodeId, TargetEdits<'_>>,
    applied: &mut HashSet<NodeId>,
) -> Vec<SyntaxNode> {
    let mut out = Vec::new();

    let edits = by_target.get(&node.id());
    if let Some(edits) = edits {
        applied.insert(node.id());
        for insert in &edits.inserts {
            out.extend(insert.replacement.iter().cloned());
        }
        if let Some(swap) = edits.swap {
            out.extend(swap.replacement.iter().cloned());
            return out;
        }
    }

    if node.is_leaf() {
        out.push(node.clone());
        return out;
    }

    let mut changed = false;
    let mut children = Vec::with_capacity(node.children().len());
    for child in node.children() {
        let replaced = rebuild(child, by_target, applied);
        changed |= replaced.len() != 1 || !replaced[0].is(child);
        children.extend(replaced);
    }

    if changed {
        out.push(SyntaxNode::branch(node.kind(), children, node.position()));
    } else {
        out.push(node.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tree::{NodeKind, PositionMarker};

    fn find(root: &SyntaxNode, raw: &str) -> SyntaxNode {
        let mut found = None;
        root.walk(|node, _| {
            if found.is_none() && node.is_leaf() && node.raw() == raw {
                found = Some(node.clone());
            }
        });
        found.unwrap()
    }

    #[test]
    fn replace_rebuilds_ancestors() {
        let root = parse("SELECT a FROM t").unwrap();
        let target = find(&root, "a");
        let pos = target.position();
        let fixed = apply_edits(
            &root,
            &[Edit::replace(
                target,
                vec![SyntaxNode::leaf(NodeKind::Identifier, "b", pos)],
            )],
        )
        .unwrap();
        assert_eq!(fixed.raw(), "SELECT b FROM t");
        assert_eq!(root.raw(), "SELECT a FROM t");
    }

    #[test]
    fn insert_and_delete() {
        let root = parse("SELECT  a").unwrap();
        let ws = find(&root, "  ");
        let a = find(&root, "a");
        let pos = a.position();
        let fixed = apply_edits(
            &root,
            &[
                Edit::delete(ws),
                Edit::insert_before(a, vec![SyntaxNode::whitespace(" ", pos)]),
            ],
        )
        .unwrap();
        assert_eq!(fixed.raw(), "SELECT a");
    }

    #[test]
    fn untouched_subtrees_keep_identity() {
        let root = parse("SELECT 1; SELECT 2;").unwrap();
        let first = root.children()[0].clone();
        let two = find(&root, "2");
        let pos = two.position();
        let fixed = apply_edits(
            &root,
            &[Edit::replace(two, vec![SyntaxNode::leaf(NodeKind::Literal, "3", pos)])],
        )
        .unwrap();
        assert!(fixed.children()[0].is(&first));
        assert_eq!(fixed.raw(), "SELECT 1; SELECT 3;");
        let leaves: String = fixed.leaves().map(SyntaxNode::raw).collect();
        assert_eq!(leaves, fixed.raw());
    }

    #[test]
    fn equal_content_from_another_tree_is_not_found() {
        let root = parse("SELECT a").unwrap();
        let other = parse("SELECT a").unwrap();
        let stranger = find(&other, "a");
        let err = apply_edits(&root, &[Edit::delete(stranger)]).unwrap_err();
        assert!(matches!(err, FixError::TargetNotFound { kind: EditKind::Delete, .. }));
    }

    #[test]
    fn conflicting_edits_are_rejected() {
        let root = parse("SELECT a").unwrap();
        let a = find(&root, "a");
        let err = apply_edits(&root, &[Edit::delete(a.clone()), Edit::delete(a)]).unwrap_err();
        assert!(matches!(err, FixError::ConflictingEdits { .. }));
    }

    #[test]
    fn deleting_root_is_rejected() {
        let root = parse("SELECT a").unwrap();
        let err = apply_edits(&root, &[Edit::delete(root.clone())]).unwrap_err();
        assert_eq!(err, FixError::InvalidRootEdit);
    }

    #[test]
    fn no_edits_returns_same_tree() {
        let root = SyntaxNode::keyword("UNION", PositionMarker::start());
        assert!(apply_edits(&root, &[]).unwrap().is(&root));
    }
}
