// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Vela.
//!
//! Nodes live in an arena ([`Ast`]) and refer to each other through
//! [`NodeId`] handles. Each node carries:
//!
//! - a **parent** back-reference (non-owning, used for context lookups —
//!   never traversed for destruction, so there are no ownership cycles);
//! - a **span** covering the node and all of its children;
//! - named child slots inside its [`NodeKind`] variant, each owned
//!   exclusively by the node.
//!
//! The node catalog is a closed enum: both emitters match over it
//! exhaustively, so adding a construct without a rendering rule for every
//! target fails to compile rather than misrendering at runtime.
//!
//! # Construction invariants
//!
//! Nodes are created during parsing and read-only afterwards. The parser
//! allocates a node with a provisional span, attaches children via
//! [`Ast::adopt`] (which re-parents the child and widens the parent
//! span), and finalizes the span with [`Ast::finish_span`].

use ecow::EcoString;

use crate::source_analysis::{Span, TokenKind};

/// A handle to a node in an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a literal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// An integer literal: `42`.
    Integer,
    /// A real literal: `3.14`.
    Real,
    /// A string literal: `"text"`.
    String,
    /// A character literal: `'a'`.
    Character,
    /// The `true` keyword.
    True,
    /// The `false` keyword.
    False,
    /// The `null` keyword.
    Null,
}

/// The concrete syntactic construct a node represents, with its child
/// slots.
///
/// Child slots hold [`NodeId`]s into the same arena; the node owns them
/// exclusively (the arena owns the storage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A whole compilation unit: a sequence of top-level statements.
    Module {
        /// Top-level statements in source order.
        body: Vec<NodeId>,
    },

    /// A statement block forming a scope (class body).
    Block {
        /// Statements in source order.
        body: Vec<NodeId>,
    },

    /// A simple name: variable, definition name, or similar.
    Name {
        /// The identifier text.
        text: EcoString,
    },

    /// A type name used in base lists and enum item type lists.
    TypeName {
        /// The type's identifier text.
        text: EcoString,
    },

    /// A literal value, keeping the raw source text.
    Literal {
        /// Which literal form this is.
        kind: LiteralKind,
        /// Raw source text, including delimiters for strings/characters.
        text: EcoString,
    },

    /// A definition modifier keyword (`public`, `static`, ...).
    Modifier {
        /// The modifier keyword kind.
        keyword: TokenKind,
    },

    /// A prefix unary expression.
    Unary {
        /// The operator or keyword token kind (`-`, `not`, ...).
        op: TokenKind,
        /// The operand expression.
        operand: NodeId,
    },

    /// An infix binary expression.
    Binary {
        /// The operator or keyword token kind.
        op: TokenKind,
        /// Left operand.
        lhs: NodeId,
        /// Right operand.
        rhs: NodeId,
    },

    /// An `await` expression: `await expr`.
    Await {
        /// The awaited expression.
        value: NodeId,
    },

    /// A `return` statement with optional value.
    Return {
        /// The returned expression, if any.
        value: Option<NodeId>,
    },

    /// The empty statement `pass`.
    Pass,

    /// An enumeration definition:
    /// `enum name ['(' bases ')'] (items | 'pass')`.
    EnumDef {
        /// Leading modifiers, in source order.
        modifiers: Vec<NodeId>,
        /// The enum's name ([`NodeKind::Name`]).
        name: NodeId,
        /// Base type list ([`NodeKind::TypeName`] nodes).
        bases: Vec<NodeId>,
        /// Items ([`NodeKind::EnumItem`] nodes), filled by deferred body
        /// parsing.
        items: Vec<NodeId>,
    },

    /// One item of an enumeration:
    /// `name ['(' types ')'] ['=' constant]`.
    EnumItem {
        /// The item's name ([`NodeKind::Name`]).
        name: NodeId,
        /// Associated type list ([`NodeKind::TypeName`] nodes).
        types: Vec<NodeId>,
        /// Constant value, if any ([`NodeKind::Literal`] when valid).
        value: Option<NodeId>,
    },

    /// A class definition: `class name ['(' bases ')'] body`.
    ClassDef {
        /// Leading modifiers, in source order.
        modifiers: Vec<NodeId>,
        /// The class's name ([`NodeKind::Name`]).
        name: NodeId,
        /// Base type list ([`NodeKind::TypeName`] nodes).
        bases: Vec<NodeId>,
        /// The class body ([`NodeKind::Block`]), filled by deferred body
        /// parsing; `None` for `pass` bodies.
        body: Option<NodeId>,
    },

    /// A placeholder for unparseable source, preserving span bookkeeping.
    Error {
        /// A description of what went wrong.
        message: EcoString,
    },
}

/// One arena slot: a node's kind, parent link, and span.
#[derive(Debug, Clone)]
pub struct Node {
    /// The construct and its child slots.
    pub kind: NodeKind,
    /// Back-reference to the enclosing node; `None` for the root.
    pub parent: Option<NodeId>,
    /// Source range covering this node and all its children.
    pub span: Span,
}

/// The node arena for one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node and returns its handle.
    #[must_use]
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        // Arenas beyond u32 nodes are not supported.
        #[allow(clippy::cast_possible_truncation)]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: None,
            span,
        });
        id
    }

    /// Returns the node for a handle.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Returns the span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Returns the number of allocated nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes have been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutable access to a node's kind, for filling child slots during
    /// construction.
    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// Marks `child` as owned by `parent` and widens the parent's span to
    /// contain the child's.
    pub(crate) fn adopt(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        let child_span = self.nodes[child.index()].span;
        let node = &mut self.nodes[parent.index()];
        node.span = node.span.merge(child_span);
    }

    /// Finalizes a node's span, widening it to `span`.
    pub(crate) fn finish_span(&mut self, id: NodeId, span: Span) {
        let node = &mut self.nodes[id.index()];
        node.span = node.span.merge(span);
    }

    /// Widens every span in the subtree to contain its children.
    ///
    /// Deferred body parsing attaches children after their ancestors'
    /// spans were first computed; this pass restores the containment
    /// invariant once parsing is complete.
    pub(crate) fn finalize_spans(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.finalize_spans(child);
            let child_span = self.span(child);
            let node = &mut self.nodes[id.index()];
            node.span = node.span.merge(child_span);
        }
    }

    /// Returns the direct children of a node, in grammar order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Module { body } | NodeKind::Block { body } => body.clone(),
            NodeKind::Name { .. }
            | NodeKind::TypeName { .. }
            | NodeKind::Literal { .. }
            | NodeKind::Modifier { .. }
            | NodeKind::Pass
            | NodeKind::Error { .. } => Vec::new(),
            NodeKind::Unary { operand, .. } => vec![*operand],
            NodeKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            NodeKind::Await { value } => vec![*value],
            NodeKind::Return { value } => value.iter().copied().collect(),
            NodeKind::EnumDef {
                modifiers,
                name,
                bases,
                items,
            } => {
                let mut children = modifiers.clone();
                children.push(*name);
                children.extend(bases.iter().copied());
                children.extend(items.iter().copied());
                children
            }
            NodeKind::EnumItem { name, types, value } => {
                let mut children = vec![*name];
                children.extend(types.iter().copied());
                children.extend(value.iter().copied());
                children
            }
            NodeKind::ClassDef {
                modifiers,
                name,
                bases,
                body,
            } => {
                let mut children = modifiers.clone();
                children.push(*name);
                children.extend(bases.iter().copied());
                children.extend(body.iter().copied());
                children
            }
        }
    }

    /// Compares two subtrees for structural equality, ignoring spans.
    ///
    /// This backs the own-syntax round-trip property: re-parsing emitted
    /// source must reproduce the tree's structure, but positions will
    /// differ.
    #[must_use]
    pub fn structurally_eq(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let (ka, kb) = (self.kind(a), other.kind(b));
        let shallow_eq = match (ka, kb) {
            (NodeKind::Module { .. }, NodeKind::Module { .. })
            | (NodeKind::Block { .. }, NodeKind::Block { .. })
            | (NodeKind::Pass, NodeKind::Pass)
            | (NodeKind::Await { .. }, NodeKind::Await { .. })
            | (NodeKind::Error { .. }, NodeKind::Error { .. }) => true,
            (NodeKind::Name { text: ta }, NodeKind::Name { text: tb })
            | (NodeKind::TypeName { text: ta }, NodeKind::TypeName { text: tb }) => ta == tb,
            (
                NodeKind::Literal { kind: la, text: ta },
                NodeKind::Literal { kind: lb, text: tb },
            ) => la == lb && ta == tb,
            (NodeKind::Modifier { keyword: ma }, NodeKind::Modifier { keyword: mb }) => ma == mb,
            (NodeKind::Unary { op: oa, .. }, NodeKind::Unary { op: ob, .. })
            | (NodeKind::Binary { op: oa, .. }, NodeKind::Binary { op: ob, .. }) => oa == ob,
            (NodeKind::Return { value: va }, NodeKind::Return { value: vb }) => {
                va.is_some() == vb.is_some()
            }
            (NodeKind::EnumDef { .. }, NodeKind::EnumDef { .. })
            | (NodeKind::EnumItem { .. }, NodeKind::EnumItem { .. }) => true,
            (
                NodeKind::ClassDef { body: ba, .. },
                NodeKind::ClassDef { body: bb, .. },
            ) => ba.is_some() == bb.is_some(),
            _ => false,
        };
        if !shallow_eq {
            return false;
        }
        let ca = self.children(a);
        let cb = other.children(b);
        ca.len() == cb.len()
            && ca
                .iter()
                .zip(cb.iter())
                .all(|(&x, &y)| self.structurally_eq(x, other, y))
    }

    /// Checks the span-containment invariant over the subtree at `id`:
    /// every node's span contains the spans of all its children.
    #[must_use]
    pub fn spans_contain_children(&self, id: NodeId) -> bool {
        let span = self.span(id);
        self.children(id).iter().all(|&child| {
            span.contains(self.span(child)) && self.spans_contain_children(child)
        })
    }
}
