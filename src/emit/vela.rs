// Copyright 2026 The Vela Authors
// SPDX-License-Identifier: Apache-2.0

//! Emission of Vela's own syntax.
//!
//! The renderer is structurally lossless: parsing its output produces a
//! tree that is structurally equal to the input (spans, comments, and
//! original formatting are not preserved). Grouping parentheses carry no
//! AST node, so they are re-derived here by comparing each child's
//! binding power against the context it is rendered in.

use crate::ast::{Ast, NodeId, NodeKind};
use crate::emit::CodeWriter;
use crate::source_analysis::{binary_binding_power, TokenKind};

/// Renders the subtree at `root` in Vela syntax.
pub(super) fn emit(ast: &Ast, root: NodeId) -> String {
    let mut w = CodeWriter::new();
    match ast.kind(root) {
        NodeKind::Module { body } => {
            for &statement in body {
                statement_into(&mut w, ast, statement);
                w.newline();
            }
        }
        _ => statement_into(&mut w, ast, root),
    }
    w.finish()
}

/// Renders one statement (no trailing newline).
fn statement_into(w: &mut CodeWriter, ast: &Ast, id: NodeId) {
    match ast.kind(id) {
        NodeKind::EnumDef { .. } => enum_into(w, ast, id),
        NodeKind::ClassDef { .. } => class_into(w, ast, id),
        NodeKind::Return { value } => {
            w.write("return");
            if let Some(value) = value {
                w.write(" ");
                expression_into(w, ast, *value, 0);
            }
        }
        NodeKind::Pass => w.write("pass"),
        // Placeholders for unparseable source have no rendering.
        NodeKind::Error { .. } => {}
        _ => expression_into(w, ast, id, 0),
    }
}

/// The binding power a prefix operator's result participates with.
///
/// `not` sits below comparisons; symbol prefixes bind tighter than any
/// binary operator.
fn unary_power(op: TokenKind) -> u8 {
    if op == TokenKind::KeywordNot {
        18
    } else {
        55
    }
}

/// Renders an expression in a context requiring binding power `min_bp`,
/// inserting grouping parentheses where the expression binds looser.
fn expression_into(w: &mut CodeWriter, ast: &Ast, id: NodeId, min_bp: u8) {
    match ast.kind(id) {
        NodeKind::Name { text } | NodeKind::TypeName { text } => w.write(text),
        NodeKind::Literal { text, .. } => w.write(text),
        NodeKind::Unary { op, operand } => {
            let power = unary_power(*op);
            let parens = power < min_bp;
            if parens {
                w.write("(");
            }
            match op.fixed_text() {
                Some(text) if *op == TokenKind::KeywordNot => {
                    w.write(text);
                    w.write(" ");
                }
                Some(text) => w.write(text),
                None => {}
            }
            expression_into(w, ast, *operand, power);
            if parens {
                w.write(")");
            }
        }
        NodeKind::Binary { op, lhs, rhs } => {
            let Some(bp) = binary_binding_power(*op) else {
                // Unreachable for parser-built trees; render flat.
                expression_into(w, ast, *lhs, 0);
                expression_into(w, ast, *rhs, 0);
                return;
            };
            let parens = bp.left < min_bp;
            if parens {
                w.write("(");
            }
            // A right-associative child in left position must keep its
            // parentheses, so the left context is raised past its own
            // binding power.
            let lhs_bp = if bp.left > bp.right {
                bp.left + 1
            } else {
                bp.left
            };
            expression_into(w, ast, *lhs, lhs_bp);
            w.write(" ");
            if let Some(text) = op.fixed_text() {
                w.write(text);
            }
            w.write(" ");
            expression_into(w, ast, *rhs, bp.right);
            if parens {
                w.write(")");
            }
        }
        NodeKind::Await { value } => {
            // `await` swallows a whole expression, so in any operand
            // position it needs grouping to survive a round trip.
            let parens = min_bp > 0;
            if parens {
                w.write("(");
            }
            w.write("await ");
            expression_into(w, ast, *value, 0);
            if parens {
                w.write(")");
            }
        }
        NodeKind::Error { .. } => {}
        _ => statement_into(w, ast, id),
    }
}

fn modifiers_into(w: &mut CodeWriter, ast: &Ast, modifiers: &[NodeId]) {
    for &modifier in modifiers {
        if let NodeKind::Modifier { keyword } = ast.kind(modifier) {
            if let Some(text) = keyword.fixed_text() {
                w.write(text);
                w.write(" ");
            }
        }
    }
}

fn type_list_into(w: &mut CodeWriter, ast: &Ast, types: &[NodeId]) {
    if types.is_empty() {
        return;
    }
    w.write("(");
    for (index, &ty) in types.iter().enumerate() {
        if index > 0 {
            w.write(", ");
        }
        expression_into(w, ast, ty, 0);
    }
    w.write(")");
}

/// Renders an enum definition on a single line with a braced item list,
/// or with `pass` when it has no items.
fn enum_into(w: &mut CodeWriter, ast: &Ast, id: NodeId) {
    let NodeKind::EnumDef {
        modifiers,
        name,
        bases,
        items,
    } = ast.kind(id)
    else {
        return;
    };
    modifiers_into(w, ast, modifiers);
    w.write("enum ");
    expression_into(w, ast, *name, 0);
    type_list_into(w, ast, bases);
    if items.is_empty() {
        w.write(" pass");
        return;
    }
    w.write(" { ");
    for (index, &item) in items.iter().enumerate() {
        if index > 0 {
            w.write(", ");
        }
        enum_item_into(w, ast, item);
    }
    w.write(" }");
}

fn enum_item_into(w: &mut CodeWriter, ast: &Ast, id: NodeId) {
    let NodeKind::EnumItem { name, types, value } = ast.kind(id) else {
        return;
    };
    expression_into(w, ast, *name, 0);
    type_list_into(w, ast, types);
    if let Some(value) = value {
        w.write(" = ");
        expression_into(w, ast, *value, 0);
    }
}

/// Renders a class definition with a braced, indented body, or with
/// `pass` when it has none.
fn class_into(w: &mut CodeWriter, ast: &Ast, id: NodeId) {
    let NodeKind::ClassDef {
        modifiers,
        name,
        bases,
        body,
    } = ast.kind(id)
    else {
        return;
    };
    modifiers_into(w, ast, modifiers);
    w.write("class ");
    expression_into(w, ast, *name, 0);
    type_list_into(w, ast, bases);
    let Some(body) = body else {
        w.write(" pass");
        return;
    };
    w.write(" {");
    w.newline();
    w.indent();
    if let NodeKind::Block { body: statements } = ast.kind(*body) {
        for &statement in statements {
            statement_into(w, ast, statement);
            w.newline();
        }
    }
    w.outdent();
    w.write("}");
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, NodeId};
    use crate::diagnostics::Diagnostics;
    use crate::emit::{emit, Target};
    use crate::source_analysis::{parse, tokenize, SourceBuffer};

    fn parse_clean(source: &str) -> (Ast, NodeId) {
        let buffer = SourceBuffer::from_source(source);
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(&buffer, &mut diagnostics);
        let (ast, root) = parse(tokens, &mut diagnostics);
        assert!(diagnostics.is_empty(), "{source:?}: {diagnostics:?}");
        (ast, root)
    }

    fn render(source: &str) -> String {
        let (ast, root) = parse_clean(source);
        let mut diagnostics = Diagnostics::new();
        let out = emit(&ast, root, Target::Vela, &mut diagnostics);
        assert!(diagnostics.is_empty());
        out
    }

    #[test]
    fn await_round_trips_verbatim() {
        assert_eq!(render("await x"), "await x");
    }

    #[test]
    fn precedence_needs_no_parens() {
        assert_eq!(render("a + b * c"), "a + b * c");
    }

    #[test]
    fn grouping_parens_are_rederived() {
        assert_eq!(render("(a + b) * c"), "(a + b) * c");
    }

    #[test]
    fn redundant_parens_are_dropped() {
        assert_eq!(render("(((a))) + (b * c)"), "a + b * c");
    }

    #[test]
    fn grouped_await_keeps_parens() {
        assert_eq!(render("(await x) + y"), "(await x) + y");
        assert_eq!(render("await x + y"), "await x + y");
    }

    #[test]
    fn not_parenthesization() {
        assert_eq!(render("not a == b"), "not a == b");
        assert_eq!(render("(not a) == b"), "(not a) == b");
    }

    #[test]
    fn left_associative_grouping_on_the_right() {
        assert_eq!(render("a - (b - c)"), "a - (b - c)");
        assert_eq!(render("(a - b) - c"), "a - b - c");
    }

    #[test]
    fn right_associative_grouping_on_the_left() {
        assert_eq!(render("(a = b) = c"), "(a = b) = c");
        assert_eq!(render("a = b = c"), "a = b = c");
    }

    #[test]
    fn enum_renders_on_one_line() {
        assert_eq!(
            render("enum Color\n    Red\n    Green\n    Blue"),
            "enum Color { Red, Green, Blue }"
        );
    }

    #[test]
    fn enum_with_bases_values_and_modifiers() {
        assert_eq!(
            render("public enum Dir(int) { North = 1, South = 2 }"),
            "public enum Dir(int) { North = 1, South = 2 }"
        );
    }

    #[test]
    fn empty_enum_renders_pass() {
        assert_eq!(render("enum Empty pass"), "enum Empty pass");
    }

    #[test]
    fn class_renders_braced_body() {
        assert_eq!(
            render("class Point(Object)\n    x = 1\n    y = 2"),
            "class Point(Object) {\n    x = 1\n    y = 2\n}"
        );
    }

    #[test]
    fn round_trip_is_structurally_equal() {
        let sources = [
            "await x + 1",
            "(a + b) * c - -d",
            "enum Color { Red, Green = 2 }",
            "public static enum Flags(int) { A = 1, B = 2 }",
            "class Outer\n    enum Inner { A }\n    x = not y and z",
            "return (a = b) = c",
        ];
        for source in sources {
            let (ast, root) = parse_clean(source);
            let mut sink = Diagnostics::new();
            let rendered = emit(&ast, root, Target::Vela, &mut sink);
            let (reparsed, reparsed_root) = parse_clean(&rendered);
            assert!(
                ast.structurally_eq(root, &reparsed, reparsed_root),
                "round trip changed structure for {source:?}; rendered: {rendered:?}"
            );
        }
    }
}
