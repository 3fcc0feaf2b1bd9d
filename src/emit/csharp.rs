// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Emission of C#-flavoured syntax.
//!
//! Vela constructs map onto their closest C# counterparts: keyword
//! operators become symbolic (`and` to `&&`), statements gain semicolons,
//! `pass` becomes the empty statement, and definitions without an access
//! modifier are emitted `public`.
//!
//! Constructs with no legal C# counterpart are reported to the
//! diagnostics sink and the emitter degrades to the closest legal
//! rendering:
//!
//! - an enum with more than one base keeps only the first;
//! - an enum item with a type list is emitted by name and value only.

use crate::ast::{Ast, NodeId, NodeKind};
use crate::diagnostics::Diagnostics;
use crate::emit::CodeWriter;
use crate::source_analysis::{binary_binding_power, TokenKind};

/// Renders the subtree at `root` as C#, reporting legality problems.
pub(super) fn emit(ast: &Ast, root: NodeId, diagnostics: &mut Diagnostics) -> String {
    let mut emitter = Emitter {
        ast,
        diagnostics,
        w: CodeWriter::new(),
    };
    match ast.kind(root) {
        NodeKind::Module { body } => {
            for &statement in body {
                emitter.statement(statement);
            }
        }
        _ => emitter.statement(root),
    }
    emitter.w.finish()
}

struct Emitter<'a> {
    ast: &'a Ast,
    diagnostics: &'a mut Diagnostics,
    w: CodeWriter,
}

/// The C# spelling of a binary operator.
fn binary_op_text(op: TokenKind) -> Option<&'static str> {
    match op {
        TokenKind::KeywordAnd => Some("&&"),
        TokenKind::KeywordOr => Some("||"),
        _ => op.fixed_text(),
    }
}

impl Emitter<'_> {
    fn statement(&mut self, id: NodeId) {
        match self.ast.kind(id) {
            NodeKind::EnumDef { .. } => self.enum_def(id),
            NodeKind::ClassDef { .. } => self.class_def(id),
            NodeKind::Return { value } => {
                self.w.write("return");
                if let Some(value) = *value {
                    self.w.write(" ");
                    self.expression(value, 0);
                }
                self.w.write(";");
                self.w.newline();
            }
            NodeKind::Pass => {
                self.w.write(";");
                self.w.newline();
            }
            NodeKind::Error { .. } => {}
            _ => {
                self.expression(id, 0);
                self.w.write(";");
                self.w.newline();
            }
        }
    }

    fn expression(&mut self, id: NodeId, min_bp: u8) {
        match self.ast.kind(id) {
            NodeKind::Name { text } | NodeKind::TypeName { text } => self.w.write(text),
            NodeKind::Literal { text, .. } => self.w.write(text),
            NodeKind::Unary { op, operand } => {
                let (text, power) = if *op == TokenKind::KeywordNot {
                    ("!", 18)
                } else {
                    (op.fixed_text().unwrap_or(""), 55)
                };
                let parens = power < min_bp;
                if parens {
                    self.w.write("(");
                }
                self.w.write(text);
                self.expression(*operand, power);
                if parens {
                    self.w.write(")");
                }
            }
            NodeKind::Binary { op, lhs, rhs } => {
                let Some(bp) = binary_binding_power(*op) else {
                    self.expression(*lhs, 0);
                    self.expression(*rhs, 0);
                    return;
                };
                let parens = bp.left < min_bp;
                if parens {
                    self.w.write("(");
                }
                let lhs_bp = if bp.left > bp.right {
                    bp.left + 1
                } else {
                    bp.left
                };
                self.expression(*lhs, lhs_bp);
                self.w.write(" ");
                if let Some(text) = binary_op_text(*op) {
                    self.w.write(text);
                }
                self.w.write(" ");
                self.expression(*rhs, bp.right);
                if parens {
                    self.w.write(")");
                }
            }
            NodeKind::Await { value } => {
                let parens = min_bp > 0;
                if parens {
                    self.w.write("(");
                }
                self.w.write("await ");
                self.expression(*value, 0);
                if parens {
                    self.w.write(")");
                }
            }
            NodeKind::Error { .. } => {}
            _ => self.statement(id),
        }
    }

    /// Writes the modifier list, synthesizing `public` when no access
    /// modifier was written in source.
    fn modifiers(&mut self, modifiers: &[NodeId]) {
        let has_access = modifiers.iter().any(|&m| {
            matches!(
                self.ast.kind(m),
                NodeKind::Modifier { keyword } if keyword.is_access_modifier()
            )
        });
        if !has_access {
            self.w.write("public ");
        }
        for &modifier in modifiers {
            if let NodeKind::Modifier { keyword } = self.ast.kind(modifier) {
                if let Some(text) = keyword.fixed_text() {
                    self.w.write(text);
                    self.w.write(" ");
                }
            }
        }
    }

    fn base_list(&mut self, bases: &[NodeId], keep: usize) {
        if bases.is_empty() {
            return;
        }
        self.w.write(" : ");
        for (index, &base) in bases.iter().take(keep).enumerate() {
            if index > 0 {
                self.w.write(", ");
            }
            self.expression(base, 0);
        }
    }

    fn enum_def(&mut self, id: NodeId) {
        let NodeKind::EnumDef {
            modifiers,
            name,
            bases,
            items,
        } = self.ast.kind(id)
        else {
            return;
        };
        if bases.len() > 1 {
            self.diagnostics.error(
                "a C# enum cannot have more than one base type",
                self.ast.span(bases[1]),
            );
        }
        self.modifiers(modifiers);
        self.w.write("enum ");
        self.expression(*name, 0);
        // Extra bases are dropped after the diagnostic above.
        self.base_list(bases, 1);
        self.w.newline();
        self.w.write("{");
        self.w.newline();
        self.w.indent();
        for (index, &item) in items.iter().enumerate() {
            self.enum_item(item);
            if index + 1 < items.len() {
                self.w.write(",");
            }
            self.w.newline();
        }
        self.w.outdent();
        self.w.write("}");
        self.w.newline();
    }

    fn enum_item(&mut self, id: NodeId) {
        let NodeKind::EnumItem { name, types, value } = self.ast.kind(id) else {
            return;
        };
        if !types.is_empty() {
            self.diagnostics.error(
                "a C# enum item cannot carry a type list",
                self.ast.span(types[0]),
            );
        }
        self.expression(*name, 0);
        if let Some(value) = *value {
            self.w.write(" = ");
            self.expression(value, 0);
        }
    }

    fn class_def(&mut self, id: NodeId) {
        let NodeKind::ClassDef {
            modifiers,
            name,
            bases,
            body,
        } = self.ast.kind(id)
        else {
            return;
        };
        self.modifiers(modifiers);
        self.w.write("class ");
        self.expression(*name, 0);
        self.base_list(bases, bases.len());
        self.w.newline();
        self.w.write("{");
        self.w.newline();
        self.w.indent();
        if let Some(body) = *body {
            if let NodeKind::Block { body: statements } = self.ast.kind(body) {
                for &statement in statements {
                    self.statement(statement);
                }
            }
        }
        self.w.outdent();
        self.w.write("}");
        self.w.newline();
    }
}
