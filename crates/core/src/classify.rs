//! Classification of referenced type names.
//!
//! A referenced type is either a base type (never imported), a member of the
//! shared utilities module, or a symbol living in a sibling module.

use std::collections::HashSet;

/// Type names that are built into TypeScript or the generated dictionary shapes.
pub const BASE_TYPE_NAMES: &[&str] = &[
    "string",
    "number",
    "boolean",
    "Date",
    "void",
    "any",
    "undefined",
    "null",
    "{ [key: string]: any; }",
    "{ [key: string]: string; }",
];

/// Names always imported from the shared utilities module.
pub const UTILITY_SYMBOL_NAMES: &[&str] = &[
    "throwException",
    "FileParameter",
    "FileResponse",
    "SwaggerException",
    "ServiceBase",
    "blobToText",
];

/// Where a referenced type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Base,
    Utility,
    CrossModule,
}

/// A single normalized type name and its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedName {
    pub name: String,
    pub class: TypeClass,
}

/// Classifies raw type expressions against the base set and the utility registry.
///
/// Both sets are fixed at construction; callers extend them with excluded
/// names or extra utility members before classification starts.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    base: HashSet<String>,
    utility: HashSet<String>,
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl TypeClassifier {
    /// Build a classifier whose base set also contains `excluded` names.
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut base: HashSet<String> = BASE_TYPE_NAMES.iter().map(|s| (*s).to_string()).collect();
        base.extend(excluded.into_iter().map(Into::into));
        Self {
            base,
            utility: UTILITY_SYMBOL_NAMES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Add names that live in the utilities module (e.g. a configured client base class).
    pub fn with_utility_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.utility.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_utility(&self, name: &str) -> bool {
        self.utility.contains(name)
    }

    /// Classify a raw type expression as one unit.
    ///
    /// A multi-alternative union is `CrossModule` if any alternative is, then
    /// `Utility` if any alternative is, otherwise `Base`.
    pub fn classify(&self, raw: &str) -> TypeClass {
        let alternatives = self.classify_alternatives(raw);
        if alternatives.is_empty() {
            return TypeClass::Base;
        }
        if alternatives.iter().any(|c| c.class == TypeClass::CrossModule) {
            TypeClass::CrossModule
        } else if alternatives.iter().any(|c| c.class == TypeClass::Utility) {
            TypeClass::Utility
        } else {
            TypeClass::Base
        }
    }

    /// Normalize a raw type expression and classify each alternative it names.
    ///
    /// Array suffixes and wrapping parentheses are stripped. `T | null` and
    /// `T | undefined` classify `T` only; any other union classifies every
    /// alternative on its own. An empty expression yields nothing.
    pub fn classify_alternatives(&self, raw: &str) -> Vec<ClassifiedName> {
        let name = normalize(raw);
        if name.is_empty() {
            return Vec::new();
        }
        if self.is_base(name) {
            return vec![ClassifiedName {
                name: name.to_string(),
                class: TypeClass::Base,
            }];
        }

        let parts = split_union(name);
        if parts.len() == 2 && is_nullish(parts[1]) {
            return self.classify_alternatives(parts[0]);
        }
        if parts.len() > 1 {
            return parts
                .into_iter()
                .flat_map(|part| self.classify_alternatives(part))
                .collect();
        }

        let class = if self.utility.contains(name) {
            TypeClass::Utility
        } else {
            TypeClass::CrossModule
        };
        vec![ClassifiedName {
            name: name.to_string(),
            class,
        }]
    }

    fn is_base(&self, name: &str) -> bool {
        self.base.contains(name) || is_dictionary_shape(name)
    }
}

/// Trim, strip every trailing `[]` and any parentheses wrapping the whole expression.
fn normalize(raw: &str) -> &str {
    let mut name = raw.trim();
    loop {
        if let Some(stripped) = name.strip_suffix("[]") {
            name = stripped.trim_end();
        } else if name.starts_with('(') && name.ends_with(')') && wraps_whole(name) {
            name = name[1..name.len() - 1].trim();
        } else {
            return name;
        }
    }
}

fn wraps_whole(name: &str) -> bool {
    let mut depth = 0usize;
    for (i, c) in name.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i + 1 < name.len() {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Split on `|` outside of braces, brackets, parentheses and generics.
fn split_union(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in name.char_indices() {
        match c {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' | '>' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(name[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

fn is_nullish(name: &str) -> bool {
    matches!(name, "null" | "undefined")
}

/// Open-ended dictionaries render as `{ [key: string]: T; }` and never need an import themselves.
fn is_dictionary_shape(name: &str) -> bool {
    name.starts_with("{ [key: ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn names(classified: &[ClassifiedName]) -> Vec<(&str, TypeClass)> {
        classified.iter().map(|c| (c.name.as_str(), c.class)).collect()
    }

    #[test]
    fn test_base_types() {
        let classifier = TypeClassifier::new(["ExternalThing"]);
        for name in BASE_TYPE_NAMES {
            assert_eq!(classifier.classify(name), TypeClass::Base, "{name}");
        }
        assert_eq!(classifier.classify("ExternalThing"), TypeClass::Base);
        assert_eq!(classifier.classify("ExternalThing[]"), TypeClass::Base);
        assert_eq!(
            classifier.classify("{ [key: string]: PersonDto; }"),
            TypeClass::Base
        );
    }

    #[test]
    fn test_excluded_names_do_not_leak_between_classifiers() {
        let with = TypeClassifier::new(["Money"]);
        let without = TypeClassifier::default();
        assert_eq!(with.classify("Money"), TypeClass::Base);
        assert_eq!(without.classify("Money"), TypeClass::CrossModule);
    }

    #[test]
    fn test_array_suffix_is_ignored() {
        let classifier = TypeClassifier::default();
        for (plain, array) in [
            ("Foo", "Foo[]"),
            ("string", "string[]"),
            ("FileParameter", "FileParameter[]"),
            ("Foo", "Foo[][]"),
            ("Foo", "(Foo | null)[]"),
        ] {
            assert_eq!(classifier.classify(plain), classifier.classify(array), "{array}");
        }
    }

    #[test]
    fn test_nullable_follows_first_alternative() {
        let classifier = TypeClassifier::default();
        assert_eq!(classifier.classify("Foo|null"), TypeClass::CrossModule);
        assert_eq!(classifier.classify("Foo | undefined"), TypeClass::CrossModule);
        assert_eq!(classifier.classify("string | null"), TypeClass::Base);
        assert_eq!(classifier.classify("Date | undefined"), TypeClass::Base);
        assert_eq!(
            names(&classifier.classify_alternatives("Foo[] | undefined")),
            vec![("Foo", TypeClass::CrossModule)]
        );
    }

    #[test]
    fn test_multi_alternative_union() {
        let classifier = TypeClassifier::default();
        assert_eq!(
            names(&classifier.classify_alternatives("Foo | Bar")),
            vec![("Foo", TypeClass::CrossModule), ("Bar", TypeClass::CrossModule)]
        );
        assert_eq!(
            names(&classifier.classify_alternatives("ProblemDetails | string | SwaggerException")),
            vec![
                ("ProblemDetails", TypeClass::CrossModule),
                ("string", TypeClass::Base),
                ("SwaggerException", TypeClass::Utility),
            ]
        );
    }

    #[test]
    fn test_utility_registry() {
        let classifier = TypeClassifier::default().with_utility_names(["ApiClientBase"]);
        assert_eq!(classifier.classify("FileResponse"), TypeClass::Utility);
        assert_eq!(classifier.classify("FileParameter | null"), TypeClass::Utility);
        assert_eq!(classifier.classify("ApiClientBase"), TypeClass::Utility);
    }

    #[test]
    fn test_malformed_names_are_imported() {
        let classifier = TypeClassifier::default();
        assert_eq!(classifier.classify("Weird<Thing"), TypeClass::CrossModule);
        assert_eq!(classifier.classify(""), TypeClass::Base);
        assert!(classifier.classify_alternatives("  ").is_empty());
    }
}
