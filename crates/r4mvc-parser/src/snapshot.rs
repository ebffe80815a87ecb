//! Read-only symbol view of a parsed C# project.
//!
//! Each declared type exposes its name, namespace, modifiers, attributes,
//! base-type list and member methods. Syntax errors are kept as diagnostics;
//! they never stop the snapshot from being built.

use crate::project::SourceFile;
use crate::treesitter::{node_text, parse_file};
use r4mvc_core::GenerationError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Record,
    Enum,
}

impl TypeKind {
    fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "class_declaration" => Some(Self::Class),
            "struct_declaration" | "record_struct_declaration" => Some(Self::Struct),
            "interface_declaration" => Some(Self::Interface),
            "record_declaration" => Some(Self::Record),
            "enum_declaration" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// A type declaration. Partial types appear once per declaring part.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSymbol {
    pub name: String,
    pub namespace: Option<String>,
    pub kind: TypeKind,
    /// Enclosing type for nested declarations.
    pub containing_type: Option<String>,
    pub modifiers: Vec<String>,
    /// Attribute names without namespace or `Attribute` suffix.
    pub attributes: Vec<String>,
    /// Base types by simple name, generic arguments and qualifiers dropped.
    pub base_types: Vec<String>,
    pub generic_arity: usize,
    pub methods: Vec<MethodSymbol>,
    pub file: PathBuf,
    pub line: usize,
}

impl TypeSymbol {
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(ns) = &self.namespace {
            parts.push(ns);
        }
        if let Some(outer) = &self.containing_type {
            parts.push(outer);
        }
        parts.push(&self.name);
        parts.join(".")
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

/// A method declared directly on a type.
#[derive(Debug, Clone, Serialize)]
pub struct MethodSymbol {
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<String>,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: Option<String>,
    pub is_generic: bool,
    pub line: usize,
}

impl MethodSymbol {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterSymbol {
    pub name: String,
    pub type_name: String,
}

/// A syntax problem found while parsing.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub line: usize,
    pub message: String,
}

/// Everything extracted from one source file.
#[derive(Debug, Default)]
struct FileSymbols {
    types: Vec<TypeSymbol>,
    diagnostics: Vec<Diagnostic>,
}

/// The parsed project: all declared types in source order plus diagnostics.
#[derive(Debug, Default, Serialize)]
pub struct ProgramSnapshot {
    types: Vec<TypeSymbol>,
    diagnostics: Vec<Diagnostic>,
}

impl ProgramSnapshot {
    /// Parse all sources. Files are parsed in parallel and merged in input order.
    pub fn from_sources(sources: &[SourceFile]) -> Result<Self, GenerationError> {
        let per_file: Vec<FileSymbols> = sources
            .par_iter()
            .map(|s| extract_file(&s.path, &s.text))
            .collect::<Result<_, _>>()?;

        let mut snapshot = Self::default();
        for file in per_file {
            snapshot.types.extend(file.types);
            snapshot.diagnostics.extend(file.diagnostics);
        }
        Ok(snapshot)
    }

    /// Snapshot of a single in-memory source. Mostly useful in tests.
    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self, GenerationError> {
        Self::from_sources(&[SourceFile::new(path, source)])
    }

    pub fn types(&self) -> &[TypeSymbol] {
        &self.types
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve a simple type name, preferring a declaration in `from_namespace`.
    pub fn resolve(&self, name: &str, from_namespace: Option<&str>) -> Option<&TypeSymbol> {
        let mut candidates = self.types.iter().filter(|t| t.name == name);
        let first = candidates.next()?;
        if first.namespace.as_deref() == from_namespace {
            return Some(first);
        }
        candidates
            .find(|t| t.namespace.as_deref() == from_namespace)
            .or(Some(first))
    }

    /// Whether any type in the base chain of `ty` has one of `names`.
    ///
    /// Bases declared in the project are followed transitively; bases from
    /// referenced assemblies end the chain but still count by name.
    pub fn inherits_from(&self, ty: &TypeSymbol, names: &[&str]) -> bool {
        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(ty.qualified_name());
        let mut pending: Vec<(&str, Option<&str>)> = ty
            .base_types
            .iter()
            .map(|b| (b.as_str(), ty.namespace.as_deref()))
            .collect();

        while let Some((base, namespace)) = pending.pop() {
            if names.contains(&base) {
                return true;
            }
            if let Some(resolved) = self.resolve(base, namespace)
                && visited.insert(resolved.qualified_name())
            {
                pending.extend(
                    resolved
                        .base_types
                        .iter()
                        .map(|b| (b.as_str(), resolved.namespace.as_deref())),
                );
            }
        }
        false
    }
}

fn extract_file(path: &Path, source: &str) -> Result<FileSymbols, GenerationError> {
    let tree = parse_file(path, source)?;
    let root = tree.root_node();
    let mut symbols = FileSymbols::default();
    let ctx = Context { path, source };
    collect_types(&ctx, &root, None, None, &mut symbols.types);
    if root.has_error() {
        collect_diagnostics(path, &root, &mut symbols.diagnostics);
    }
    if !symbols.diagnostics.is_empty() {
        tracing::debug!(
            "{}: {} syntax error(s)",
            path.display(),
            symbols.diagnostics.len()
        );
    }
    Ok(symbols)
}

struct Context<'a> {
    path: &'a Path,
    source: &'a str,
}

fn join_namespace(outer: Option<&str>, inner: &str) -> String {
    match outer {
        Some(outer) if !outer.is_empty() => format!("{outer}.{inner}"),
        _ => inner.to_string(),
    }
}

fn collect_types(
    ctx: &Context,
    node: &tree_sitter::Node,
    namespace: Option<&str>,
    containing_type: Option<&str>,
    out: &mut Vec<TypeSymbol>,
) {
    // A file-scoped namespace applies to every following sibling
    let mut scope: Option<String> = namespace.map(String::from);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let kind = child.kind();
        match kind {
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                let Some(name_node) = child.child_by_field_name("name") else {
                    continue;
                };
                let ns = join_namespace(namespace, node_text(&name_node, ctx.source).trim());
                collect_types(ctx, &child, Some(&ns), None, out);
                if kind == "file_scoped_namespace_declaration" {
                    scope = Some(ns);
                }
            }
            _ => {
                if let Some(type_kind) = TypeKind::from_node_kind(kind) {
                    extract_type(ctx, &child, type_kind, scope.as_deref(), containing_type, out);
                } else if kind == "declaration_list" || kind == "ERROR" {
                    collect_types(ctx, &child, scope.as_deref(), containing_type, out);
                }
            }
        }
    }
}

fn extract_type(
    ctx: &Context,
    node: &tree_sitter::Node,
    kind: TypeKind,
    namespace: Option<&str>,
    containing_type: Option<&str>,
    out: &mut Vec<TypeSymbol>,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(&name_node, ctx.source).to_string();

    let mut symbol = TypeSymbol {
        name: name.clone(),
        namespace: namespace.map(String::from),
        kind,
        containing_type: containing_type.map(String::from),
        modifiers: modifiers(ctx, node),
        attributes: attributes(ctx, node),
        base_types: Vec::new(),
        generic_arity: 0,
        methods: Vec::new(),
        file: ctx.path.to_path_buf(),
        line: node.start_position().row + 1,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "base_list" => symbol.base_types = base_types(ctx, &child),
            "type_parameter_list" => {
                let mut tc = child.walk();
                symbol.generic_arity = child
                    .named_children(&mut tc)
                    .filter(|c| c.kind() == "type_parameter")
                    .count();
            }
            _ => {}
        }
    }

    // Nested types are pushed after their container to keep source order stable
    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            if member.kind() == "method_declaration" {
                if let Some(method) = extract_method(ctx, &member) {
                    symbol.methods.push(method);
                }
            } else if let Some(nested_kind) = TypeKind::from_node_kind(member.kind()) {
                extract_type(ctx, &member, nested_kind, namespace, Some(name.as_str()), &mut nested);
            }
        }
    }

    out.push(symbol);
    out.extend(nested);
}

fn extract_method(ctx: &Context, node: &tree_sitter::Node) -> Option<MethodSymbol> {
    let name_node = node.child_by_field_name("name")?;
    let return_type = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
        .map(|n| node_text(&n, ctx.source).to_string());

    let mut parameters = Vec::new();
    let mut is_generic = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "type_parameter_list" => is_generic = true,
            "parameter_list" => parameters = extract_parameters(ctx, &child),
            _ => {}
        }
    }

    // `@default` declares a method named `default`
    let name = node_text(&name_node, ctx.source);
    Some(MethodSymbol {
        name: name.strip_prefix('@').unwrap_or(name).to_string(),
        modifiers: modifiers(ctx, node),
        attributes: attributes(ctx, node),
        parameters,
        return_type,
        is_generic,
        line: node.start_position().row + 1,
    })
}

fn extract_parameters(ctx: &Context, list: &tree_sitter::Node) -> Vec<ParameterSymbol> {
    let mut params = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        if param.kind() != "parameter" {
            continue;
        }
        let Some(name_node) = param.child_by_field_name("name") else {
            continue;
        };
        let type_name = param
            .child_by_field_name("type")
            .map(|n| node_text(&n, ctx.source).to_string())
            .unwrap_or_default();
        params.push(ParameterSymbol {
            name: node_text(&name_node, ctx.source).to_string(),
            type_name,
        });
    }
    params
}

/// Keyword modifiers (`public`, `static`, `partial`, ...) of a declaration.
fn modifiers(ctx: &Context, node: &tree_sitter::Node) -> Vec<String> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .map(|c| node_text(&c, ctx.source).trim().to_string())
        .collect()
}

/// Attribute names on a declaration, normalized: `[Microsoft.AspNetCore.Mvc.NonActionAttribute]` → `NonAction`.
fn attributes(ctx: &Context, node: &tree_sitter::Node) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for list in node.children(&mut cursor) {
        if list.kind() != "attribute_list" {
            continue;
        }
        let mut lc = list.walk();
        for attr in list.named_children(&mut lc) {
            if attr.kind() != "attribute" {
                continue;
            }
            let name_node = attr.child_by_field_name("name").or_else(|| attr.named_child(0));
            if let Some(name_node) = name_node {
                let raw = simple_type_name(node_text(&name_node, ctx.source));
                let name = raw.strip_suffix("Attribute").filter(|n| !n.is_empty()).unwrap_or(&raw);
                names.push(name.to_string());
            }
        }
    }
    names
}

fn base_types(ctx: &Context, list: &tree_sitter::Node) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = list.walk();
    for child in list.named_children(&mut cursor) {
        // Record primary-constructor arguments: `record R(int X) : Base(X)`
        if child.kind() == "argument_list" {
            continue;
        }
        let name = simple_type_name(node_text(&child, ctx.source));
        if !name.is_empty() {
            bases.push(name);
        }
    }
    bases
}

/// `global::Microsoft.AspNetCore.Mvc.Controller<T>` → `Controller`.
pub(crate) fn simple_type_name(text: &str) -> String {
    let without_generics = text.split(['<', '(']).next().unwrap_or("").trim();
    let without_alias = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);
    without_alias
        .rsplit('.')
        .next()
        .unwrap_or(without_alias)
        .trim()
        .to_string()
}

fn collect_diagnostics(path: &Path, node: &tree_sitter::Node, out: &mut Vec<Diagnostic>) {
    if node.is_error() || node.is_missing() {
        let message = if node.is_missing() {
            format!("missing `{}`", node.kind())
        } else {
            "syntax error".to_string()
        };
        out.push(Diagnostic {
            file: path.to_path_buf(),
            line: node.start_position().row + 1,
            message,
        });
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            collect_diagnostics(path, &child, out);
        }
    }
}
