//! Identifier helpers for TypeScript output.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::naming::FileCase;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
        "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "let",
        "static", "implements", "interface", "package", "private", "protected", "public",
        "await", "async",
    ]
    .into_iter()
    .collect()
});

/// Check if a name needs quoting when used as a property key.
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape backslashes and double quotes for a double-quoted string literal.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a plain identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// `obj.prop` or `obj["prop-name"]`.
pub fn member_access(obj: &str, prop: &str) -> String {
    if needs_bracket_notation(prop) {
        format!("{obj}[\"{}\"]", escape_js_string(prop))
    } else {
        format!("{obj}.{prop}")
    }
}

/// Turn an arbitrary name into a camelCase TypeScript identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '$' { c } else { ' ' })
        .collect();
    let mut ident = FileCase::CamelCase.convert(cleaned.trim());
    ident.retain(|c| !c.is_whitespace());
    if ident.is_empty() {
        return "_empty".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) || TS_RESERVED_WORDS.contains(ident.as_str())
    {
        ident.insert(0, '_');
    }
    ident
}

/// Turn an arbitrary value into a PascalCase enum member name.
pub fn enum_member_name(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let mut ident = FileCase::PascalCase.convert(cleaned.trim());
    ident.retain(|c| !c.is_whitespace());
    if ident.is_empty() {
        return "_empty".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
