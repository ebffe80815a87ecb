//! Render a [`CompilationUnit`] as C# source text.
//!
//! Output is a pure function of the tree: same tree, same bytes.

use r4mvc_core::config::{GENERATOR_NAME, GENERATOR_VERSION};
use r4mvc_core::declaration::{Attribute, CompilationUnit, DeclarationNode, Expr, NodeKind};

const INDENT: &str = "    ";
/// Missing XML comments, CLS compliance and member hiding.
const SUPPRESSED_WARNINGS: &str = "1591, 3008, 3009, 0108";

struct Writer {
    out: String,
}

impl Writer {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

/// Escape a string for a regular (non-verbatim) C# literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn expr(value: &Expr) -> String {
    match value {
        Expr::String(s) => escape_literal(s),
        Expr::New(ty) => format!("new {ty}()"),
        Expr::Ident(name) => name.clone(),
    }
}

fn attribute(attr: &Attribute) -> String {
    if attr.arguments.is_empty() {
        attr.name.clone()
    } else {
        let args: Vec<String> = attr.arguments.iter().map(expr).collect();
        format!("{}({})", attr.name, args.join(", "))
    }
}

fn modifiers(node: &DeclarationNode) -> String {
    node.modifiers()
        .iter()
        .map(|m| format!("{} ", m.keyword()))
        .collect()
}

fn write_member(w: &mut Writer, node: &DeclarationNode, depth: usize) {
    if !node.attributes().is_empty() {
        let attrs: Vec<String> = node.attributes().iter().map(attribute).collect();
        w.line(depth, &format!("[{}]", attrs.join(", ")));
    }
    let ty = node.type_name().unwrap_or("object");
    match node.kind() {
        NodeKind::Namespace => write_namespace(w, node, depth),
        NodeKind::Class => {
            w.line(depth, &format!("{}class {}", modifiers(node), node.name()));
            write_body(w, node.children(), depth);
        }
        NodeKind::Field => {
            let init = node.value().map(|v| format!(" = {}", expr(v))).unwrap_or_default();
            w.line(depth, &format!("{}{} {}{};", modifiers(node), ty, node.name(), init));
        }
        NodeKind::Property => {
            let getter = node.value().map(expr).unwrap_or_else(|| "default".to_string());
            w.line(
                depth,
                &format!(
                    "{}{} {} {{ get {{ return {}; }} }}",
                    modifiers(node),
                    ty,
                    node.name(),
                    getter
                ),
            );
        }
    }
}

/// Members of a class or namespace body. Classes are set apart by blank lines.
fn write_members(w: &mut Writer, members: &[DeclarationNode], depth: usize) {
    let mut previous: Option<NodeKind> = None;
    for member in members {
        let spaced = matches!(member.kind(), NodeKind::Class | NodeKind::Namespace)
            || matches!(previous, Some(NodeKind::Class | NodeKind::Namespace));
        if previous.is_some() && spaced {
            w.blank();
        }
        write_member(w, member, depth);
        previous = Some(member.kind());
    }
}

fn write_body(w: &mut Writer, members: &[DeclarationNode], depth: usize) {
    w.line(depth, "{");
    write_members(w, members, depth + 1);
    w.line(depth, "}");
}

fn write_namespace(w: &mut Writer, node: &DeclarationNode, depth: usize) {
    if node.name().is_empty() {
        write_members(w, node.children(), depth);
    } else {
        w.line(depth, &format!("namespace {}", node.name()));
        write_body(w, node.children(), depth);
    }
}

/// Render the whole unit: header, usings, then each namespace in order.
pub fn render(unit: &CompilationUnit) -> String {
    let mut w = Writer { out: String::new() };
    w.line(0, "// <auto-generated />");
    w.line(
        0,
        &format!("// This file was generated by {GENERATOR_NAME} {GENERATOR_VERSION}. Changes will be lost on regeneration."),
    );
    w.blank();
    w.line(0, &format!("#pragma warning disable {SUPPRESSED_WARNINGS}"));
    w.blank();
    for using in unit.usings() {
        w.line(0, &format!("using {using};"));
    }
    if !unit.usings().is_empty() {
        w.blank();
    }
    write_members(&mut w, unit.members(), 0);
    w.blank();
    w.line(0, &format!("#pragma warning restore {SUPPRESSED_WARNINGS}"));
    w.out
}
