//! Tree-sitter integration for C# parsing.

use r4mvc_core::GenerationError;
use std::path::Path;

/// The C# grammar.
pub fn csharp_language() -> tree_sitter::Language {
    tree_sitter_c_sharp::LANGUAGE.into()
}

/// Parse a C# source file and return the tree-sitter tree.
///
/// Syntax errors still produce a tree; only a parser that cannot run at all
/// is reported as malformed input.
pub fn parse_file(path: &Path, source: &str) -> Result<tree_sitter::Tree, GenerationError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&csharp_language())
        .map_err(|e| GenerationError::malformed(path, format!("failed to set C# grammar: {e}")))?;
    parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| GenerationError::malformed(path, "tree-sitter returned no tree"))
}

/// Source text covered by a node.
pub(crate) fn node_text<'a>(node: &tree_sitter::Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}
