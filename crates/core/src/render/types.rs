//! TypeScript type expressions and their textual form.
//!
//! The renderer maps schemas to `TsType` first, then emits the text that
//! appears in signatures and collects the names the text depends on.

use crate::symbol::TypeReference;

/// Trait for emitting TypeScript source from a type node.
pub trait Emit {
    fn emit(&self) -> String;
}

/// TypeScript type representation.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Primitive(TsPrimitive),
    /// A generated or utility type: `PersonDto`, `FileResponse`.
    Named(String),
    Literal(TsLiteral),
    Array(Box<TsType>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
    /// `{ [key: string]: T; }`
    Dictionary(Box<TsType>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Date,
    Any,
    Void,
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Int(i64),
    Number(f64),
    Bool(bool),
    Null,
}

impl TsType {
    pub fn any() -> Self {
        Self::Primitive(TsPrimitive::Any)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `T | null`, without nesting a second `null`.
    pub fn nullable(self) -> Self {
        match self {
            Self::Primitive(TsPrimitive::Any | TsPrimitive::Null) => self,
            Self::Union(mut types) => {
                if !types.contains(&Self::Primitive(TsPrimitive::Null)) {
                    types.push(Self::Primitive(TsPrimitive::Null));
                }
                Self::Union(types)
            }
            other => Self::Union(vec![other, Self::Primitive(TsPrimitive::Null)]),
        }
    }

    /// `T | undefined`, used for optional members.
    pub fn optional(self) -> Self {
        match self {
            Self::Primitive(TsPrimitive::Any | TsPrimitive::Undefined) => self,
            Self::Union(mut types) => {
                types.push(Self::Primitive(TsPrimitive::Undefined));
                Self::Union(types)
            }
            other => Self::Union(vec![other, Self::Primitive(TsPrimitive::Undefined)]),
        }
    }

    pub fn is_date(&self) -> bool {
        match self {
            Self::Primitive(TsPrimitive::Date) => true,
            Self::Union(types) => types.iter().any(Self::is_date),
            _ => false,
        }
    }

    /// Append every type expression this type depends on: the full text
    /// first, then nested array items, dictionary values and named leaves.
    pub fn collect_references(&self, references: &mut Vec<TypeReference>) {
        if matches!(self, Self::Primitive(_) | Self::Literal(_)) {
            return;
        }
        references.push(TypeReference::new(self.emit()));
        match self {
            Self::Array(inner) | Self::Dictionary(inner) => inner.collect_references(references),
            Self::Union(types) | Self::Intersection(types) => {
                for ty in types {
                    ty.collect_references(references);
                }
            }
            Self::Named(_) | Self::Primitive(_) | Self::Literal(_) => {}
        }
    }
}

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "Date",
            Self::Any => "any",
            Self::Void => "void",
            Self::Null => "null",
            Self::Undefined => "undefined",
        }
        .to_string()
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            Self::String(s) => format!("\"{}\"", super::utils::escape_js_string(s)),
            Self::Int(i) => i.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            Self::Primitive(p) => p.emit(),
            Self::Named(name) => name.clone(),
            Self::Literal(lit) => lit.emit(),
            Self::Array(inner) => {
                if matches!(**inner, Self::Union(_) | Self::Intersection(_)) {
                    format!("({})[]", inner.emit())
                } else {
                    format!("{}[]", inner.emit())
                }
            }
            Self::Union(types) => types.iter().map(Emit::emit).collect::<Vec<_>>().join(" | "),
            Self::Intersection(types) => types
                .iter()
                .map(|t| {
                    if matches!(t, Self::Union(_)) {
                        format!("({})", t.emit())
                    } else {
                        t.emit()
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            Self::Dictionary(value) => format!("{{ [key: string]: {}; }}", value.emit()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_emit() {
        let ty = TsType::Array(Box::new(TsType::named("Item").nullable()));
        assert_eq!(ty.emit(), "(Item | null)[]");
        assert_eq!(
            TsType::Dictionary(Box::new(TsType::any())).emit(),
            "{ [key: string]: any; }"
        );
        assert_eq!(TsType::named("A").optional().emit(), "A | undefined");
        assert_eq!(TsType::any().optional().emit(), "any");
    }

    #[test]
    fn test_collect_references() {
        let ty = TsType::Dictionary(Box::new(TsType::Array(Box::new(TsType::named("Tag")))));
        let mut refs = Vec::new();
        ty.collect_references(&mut refs);
        let raw: Vec<_> = refs.iter().map(|r| r.raw.as_str()).collect();
        assert_eq!(raw, vec!["{ [key: string]: Tag[]; }", "Tag[]", "Tag"]);

        let mut refs = Vec::new();
        TsType::Primitive(TsPrimitive::Date).collect_references(&mut refs);
        assert!(refs.is_empty());
    }
}
