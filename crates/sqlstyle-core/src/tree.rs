//! Lossless syntax tree for parsed SQL.
//!
//! Every node carries the exact source text it was parsed from. Branch
//! nodes derive their text from their children, so concatenating the
//! leaves of any subtree always reproduces that subtree's text.
//!
//! Nodes are immutable, reference counted handles. Equality and hashing are
//! by identity: two nodes with the same kind and text at different places
//! in the tree are different nodes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a parsed file.
    File,
    /// A single statement, including its terminating semicolon.
    Statement,
    /// `UNION`, `INTERSECT`, `EXCEPT` or `MINUS` with an optional qualifier.
    SetOperator,
    /// A reserved or recognised SQL keyword.
    Keyword,
    /// Any other bare or quoted identifier.
    Identifier,
    /// String or numeric literal.
    Literal,
    /// Punctuation and operators.
    Symbol,
    /// Spaces and tabs.
    Whitespace,
    /// A line break.
    Newline,
    /// Line or block comment.
    Comment,
}

impl NodeKind {
    /// Returns true for kinds that carry no meaning for the statement.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "file",
            Self::Statement => "statement",
            Self::SetOperator => "set_operator",
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Literal => "literal",
            Self::Symbol => "symbol",
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Source location of a node.
///
/// Used to report violations and to stamp nodes synthesized by fixes.
/// It plays no part in node equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionMarker {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
}

impl PositionMarker {
    /// Creates a new position marker.
    #[must_use]
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Position of the first byte of a source.
    #[must_use]
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Returns the position just past `text` when it starts here.
    #[must_use]
    pub fn advance(self, text: &str) -> Self {
        let mut next = self;
        next.offset += text.len();
        for ch in text.chars() {
            if ch == '\n' {
                next.line += 1;
                next.column = 1;
            } else {
                next.column += 1;
            }
        }
        next
    }
}

/// Opaque identity of a node, stable for the lifetime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    raw: String,
    position: PositionMarker,
    children: Vec<SyntaxNode>,
}

/// A node in the syntax tree.
///
/// Cloning a `SyntaxNode` clones the handle, not the node: the clone has
/// the same identity.
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

impl SyntaxNode {
    /// Creates a leaf node with the given text.
    #[must_use]
    pub fn leaf(kind: NodeKind, raw: impl Into<String>, position: PositionMarker) -> Self {
        Self(Arc::new(NodeData {
            kind,
            raw: raw.into(),
            position,
            children: Vec::new(),
        }))
    }

    /// Creates a branch node from its children.
    ///
    /// The node's text is the concatenation of the children's text. Its
    /// position is taken from the first child, or `fallback` when there
    /// are no children.
    #[must_use]
    pub fn branch(kind: NodeKind, children: Vec<SyntaxNode>, fallback: PositionMarker) -> Self {
        let raw: String = children.iter().map(SyntaxNode::raw).collect();
        let position = children.first().map_or(fallback, SyntaxNode::position);
        Self(Arc::new(NodeData {
            kind,
            raw,
            position,
            children,
        }))
    }

    /// Synthesizes a keyword leaf.
    #[must_use]
    pub fn keyword(raw: impl Into<String>, position: PositionMarker) -> Self {
        Self::leaf(NodeKind::Keyword, raw, position)
    }

    /// Synthesizes a whitespace leaf.
    #[must_use]
    pub fn whitespace(raw: impl Into<String>, position: PositionMarker) -> Self {
        Self::leaf(NodeKind::Whitespace, raw, position)
    }

    /// Synthesizes a newline leaf.
    #[must_use]
    pub fn newline(position: PositionMarker) -> Self {
        Self::leaf(NodeKind::Newline, "\n", position)
    }

    /// Synthesizes a symbol leaf.
    #[must_use]
    pub fn symbol(raw: impl Into<String>, position: PositionMarker) -> Self {
        Self::leaf(NodeKind::Symbol, raw, position)
    }

    /// Returns the kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    /// Returns the exact source text of this node.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0.raw
    }

    /// Returns the source text in upper case.
    #[must_use]
    pub fn raw_upper(&self) -> String {
        self.0.raw.to_uppercase()
    }

    /// Returns the position of the first character of this node.
    #[must_use]
    pub fn position(&self) -> PositionMarker {
        self.0.position
    }

    /// Returns the children of this node, in source order.
    #[must_use]
    pub fn children(&self) -> &[SyntaxNode] {
        &self.0.children
    }

    /// Returns the first child, if any.
    #[must_use]
    pub fn first_child(&self) -> Option<&SyntaxNode> {
        self.0.children.first()
    }

    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// Returns the identity of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.0) as usize)
    }

    /// Returns true if `other` is this very node.
    #[must_use]
    pub fn is(&self, other: &SyntaxNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true if `other` is this node or one of its descendants.
    #[must_use]
    pub fn contains(&self, other: &SyntaxNode) -> bool {
        self.is(other) || self.children().iter().any(|c| c.contains(other))
    }

    /// Iterates over all leaves of this subtree, in source order.
    pub fn leaves(&self) -> impl Iterator<Item = &SyntaxNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                if node.is_leaf() {
                    return Some(node);
                }
                stack.extend(node.children().iter().rev());
            }
            None
        })
    }

    /// Visits every node of this subtree in pre-order, depth first.
    ///
    /// The callback receives the node and the stack of its ancestors,
    /// from this node (the walk root) down to the node's parent.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&SyntaxNode, &[SyntaxNode]),
    {
        let mut ancestors = Vec::new();
        self.walk_inner(&mut ancestors, &mut visit);
    }

    fn walk_inner<F>(&self, ancestors: &mut Vec<SyntaxNode>, visit: &mut F)
    where
        F: FnMut(&SyntaxNode, &[SyntaxNode]),
    {
        visit(self, ancestors);
        if self.is_leaf() {
            return;
        }
        ancestors.push(self.clone());
        for child in self.children() {
            child.walk_inner(ancestors, visit);
        }
        ancestors.pop();
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "{}({:?})", self.kind(), self.raw())
        } else {
            f.debug_tuple(&self.kind().to_string())
                .field(&self.children())
                .finish()
        }
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
