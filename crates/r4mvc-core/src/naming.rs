//! Naming rules shared by analysis, locators and synthesis.

/// Reserved C# keywords. Identifiers colliding with one get an `@` prefix.
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Remove exactly one trailing occurrence of `suffix` from `name`.
///
/// A name that is nothing but the suffix is returned unchanged so the result
/// is never empty.
pub fn strip_suffix<'a>(name: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() || name.len() <= suffix.len() {
        return name;
    }
    name.strip_suffix(suffix).unwrap_or(name)
}

/// Rewrite Windows separators to forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Case-insensitive comparison used for view-to-controller matching.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

pub fn is_keyword(name: &str) -> bool {
    CSHARP_KEYWORDS.contains(&name)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Whether `name` can be used verbatim as a C# identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => {
            chars.all(is_ident_continue) && !is_keyword(name)
        }
        _ => false,
    }
}

/// Whether `name` is empty or a dotted sequence of identifiers.
pub fn is_namespace(name: &str) -> bool {
    name.is_empty() || name.split('.').all(is_identifier)
}

/// Turn an arbitrary name (a file name, a view name) into a C# identifier.
///
/// `site.css` becomes `site_css`, `404` becomes `_404`, `class` becomes `@class`.
pub fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if is_ident_continue(c) { c } else { '_' })
        .collect();
    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_numeric()) {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) {
        ident.insert(0, '@');
    }
    ident
}
