//! Immutable declaration tree produced by synthesis and consumed by rendering.
//!
//! Nodes are built bottom-up with consuming `with_*` calls and never mutated
//! once handed to a parent. There is no `&mut` access after construction.

use serde::Serialize;

/// Kind of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Namespace,
    Class,
    Field,
    /// Read-only property whose getter returns `value`.
    Property,
}

/// Declaration modifiers, rendered in the order they were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Static,
    ReadOnly,
    Const,
    Partial,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Static => "static",
            Self::ReadOnly => "readonly",
            Self::Const => "const",
            Self::Partial => "partial",
        }
    }
}

/// Initializer or getter expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expr {
    /// A string literal. Stored unescaped.
    String(String),
    /// `new T()` for the given type.
    New(String),
    /// A bare reference to another member.
    Ident(String),
}

/// An attribute applied to a declaration: `[GeneratedCode("R4Mvc", "0.1.0")]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Expr>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: Expr) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// A node of the synthesized declaration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationNode {
    kind: NodeKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    modifiers: Vec<Modifier>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Expr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<DeclarationNode>,
}

impl DeclarationNode {
    fn empty(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_name: None,
            modifiers: Vec::new(),
            attributes: Vec::new(),
            value: None,
            children: Vec::new(),
        }
    }

    /// A namespace block. An empty name stands for the global namespace.
    pub fn namespace(name: impl Into<String>) -> Self {
        Self::empty(NodeKind::Namespace, name)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::empty(NodeKind::Class, name)
    }

    pub fn field(name: impl Into<String>, type_name: impl Into<String>, value: Expr) -> Self {
        Self {
            type_name: Some(type_name.into()),
            value: Some(value),
            ..Self::empty(NodeKind::Field, name)
        }
    }

    /// A string field initialized with a literal.
    pub fn string_field(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::field(name, "string", Expr::String(value.into()))
    }

    pub fn property(name: impl Into<String>, type_name: impl Into<String>, getter: Expr) -> Self {
        Self {
            type_name: Some(type_name.into()),
            value: Some(getter),
            ..Self::empty(NodeKind::Property, name)
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        for modifier in modifiers {
            if !self.modifiers.contains(&modifier) {
                self.modifiers.push(modifier);
            }
        }
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: DeclarationNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = DeclarationNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn value(&self) -> Option<&Expr> {
        self.value.as_ref()
    }

    /// The literal of a string-initialized field.
    pub fn string_value(&self) -> Option<&str> {
        match &self.value {
            Some(Expr::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DeclarationNode] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&DeclarationNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children of one kind, in order.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &DeclarationNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Depth-first walk over this node and every descendant.
    pub fn walk(&self) -> Vec<&DeclarationNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

/// The complete output artifact: `using` directives plus top-level namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnit {
    usings: Vec<String>,
    members: Vec<DeclarationNode>,
}

impl CompilationUnit {
    pub fn new(usings: Vec<String>, members: Vec<DeclarationNode>) -> Self {
        Self { usings, members }
    }

    pub fn usings(&self) -> &[String] {
        &self.usings
    }

    pub fn members(&self) -> &[DeclarationNode] {
        &self.members
    }

    pub fn namespace(&self, name: &str) -> Option<&DeclarationNode> {
        self.members
            .iter()
            .find(|m| m.kind == NodeKind::Namespace && m.name == name)
    }

    /// First class with this name declared directly inside any namespace.
    pub fn class(&self, name: &str) -> Option<&DeclarationNode> {
        self.members
            .iter()
            .flat_map(|ns| ns.children_of(NodeKind::Class))
            .find(|c| c.name == name)
    }

    /// Every class in the unit, nested ones included.
    pub fn all_classes(&self) -> Vec<&DeclarationNode> {
        self.members
            .iter()
            .flat_map(|m| m.walk())
            .filter(|n| n.kind == NodeKind::Class)
            .collect()
    }
}
