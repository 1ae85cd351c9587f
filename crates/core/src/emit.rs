//! Final file content: banner, import header and body.
//!
//! Output is plain text with `\n` line endings and exactly one trailing
//! newline, so identical inputs always hash identically.

use crate::symbol::Symbol;

/// Housekeeping banner placed at the top of every generated module.
pub const BANNER: &str = "//----------------------\n\
// <auto-generated>\n\
//     Generated by nsplit. Changes to this file will be lost on regeneration.\n\
// </auto-generated>\n\
//----------------------\n\
\n\
/* tslint:disable */\n\
/* eslint-disable */\n\
// ReSharper disable InconsistentNaming\n";

/// Content of the file holding `symbol`.
pub fn emit_symbol(symbol: &Symbol, header: &str) -> String {
    emit_module(header, &symbol.source_text)
}

pub fn emit_module(header: &str, body: &str) -> String {
    let mut content = String::with_capacity(BANNER.len() + header.len() + body.len() + 2);
    content.push_str(BANNER);
    content.push('\n');
    content.push_str(header);
    content.push_str(body);
    normalize(&content)
}

/// Content of the shared utilities module.
///
/// Top-level `function` declarations become exported and runs of blank
/// lines collapse to one.
pub fn emit_utilities(body: &str) -> String {
    let exported = export_bare_functions(&normalize(body));
    emit_module("", &collapse_blank_lines(&exported))
}

fn export_bare_functions(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for line in text.lines() {
        if line.starts_with("function ") || line.starts_with("async function ") {
            out.push_str("export ");
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        if blank {
            out.push('\n');
        } else {
            out.push_str(line);
            out.push('\n');
        }
        previous_blank = blank;
    }
    out
}

/// `\r\n` becomes `\n`, trailing whitespace is trimmed to a single newline.
pub fn normalize(text: &str) -> String {
    let mut normalized = text.replace("\r\n", "\n");
    let trimmed = normalized.trim_end().len();
    normalized.truncate(trimmed);
    normalized.push('\n');
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind;

    #[test]
    fn test_emit_symbol_layout() {
        let symbol = Symbol::new("Bar", SymbolKind::Dto, "export class Bar {\r\n}\r\n\r\n");
        let content = emit_symbol(&symbol, "import { Baz } from './Baz';\n\n");

        assert!(content.starts_with(BANNER));
        assert!(content.ends_with("import { Baz } from './Baz';\n\nexport class Bar {\n}\n"));
        assert!(!content.contains('\r'));
    }

    #[test]
    fn test_emit_without_header() {
        let content = emit_module("", "export enum Status {\n}\n");
        assert_eq!(content, format!("{BANNER}\nexport enum Status {{\n}}\n"));
    }

    #[test]
    fn test_emit_utilities_exports_functions() {
        let body = "export class SwaggerException {\n}\n\n\n\nfunction throwException(): any {\n    function inner() {}\n}\n\n\n\nasync function load() {\n}\n";
        let content = emit_utilities(body);
        let body = content.strip_prefix(BANNER).unwrap();

        assert_eq!(
            body,
            "\nexport class SwaggerException {\n}\n\nexport function throwException(): any {\n    function inner() {}\n}\n\nexport async function load() {\n}\n"
        );
    }

    #[test]
    fn test_emit_is_stable() {
        let symbol = Symbol::new("A", SymbolKind::Enum, "export enum A {}\n");
        assert_eq!(emit_symbol(&symbol, ""), emit_symbol(&symbol, ""));
    }
}
