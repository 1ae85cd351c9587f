//! File and module naming conventions.
//!
//! Every convention goes through the same word splitter so that a name
//! converted once is a fixed point of the same conversion.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Naming convention applied to generated file names and import paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileCase {
    KebabCase,
    CamelCase,
    SnakeCase,
    TitleCase,
    AllCapsSnakeCase,
    PascalCase,
    /// Keep symbol names as they are.
    #[default]
    Identity,
}

impl FileCase {
    pub const ALL: [Self; 7] = [
        Self::KebabCase,
        Self::CamelCase,
        Self::SnakeCase,
        Self::TitleCase,
        Self::AllCapsSnakeCase,
        Self::PascalCase,
        Self::Identity,
    ];

    /// The label accepted on the command line for this convention.
    pub fn label(self) -> &'static str {
        match self {
            Self::KebabCase => "kebab-case",
            Self::CamelCase => "camelCase",
            Self::SnakeCase => "snake_case",
            Self::TitleCase => "Title Case",
            Self::AllCapsSnakeCase => "ALL_CAPS_SNAKE_CASE",
            Self::PascalCase => "PascalCase",
            Self::Identity => "identity",
        }
    }

    /// Convert an identifier into a file-safe name under this convention.
    ///
    /// Empty or whitespace-only input is returned unchanged.
    pub fn convert(self, input: &str) -> String {
        if self == Self::Identity || input.trim().is_empty() {
            return input.to_string();
        }

        let words = split_words(input);
        match self {
            Self::KebabCase => join_mapped(&words, "-", str::to_lowercase),
            Self::SnakeCase => join_mapped(&words, "_", str::to_lowercase),
            Self::AllCapsSnakeCase => join_mapped(&words, "_", str::to_uppercase),
            Self::TitleCase => join_mapped(&words, " ", capitalize_first),
            Self::PascalCase => join_mapped(&words, "", capitalize_first),
            Self::CamelCase => {
                let mut out = String::with_capacity(input.len());
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        out.push_str(&capitalize_first(word));
                    }
                }
                out
            }
            Self::Identity => input.to_string(),
        }
    }
}

impl fmt::Display for FileCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kebab-case" => Ok(Self::KebabCase),
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            "Title Case" => Ok(Self::TitleCase),
            "ALL_CAPS_SNAKE_CASE" => Ok(Self::AllCapsSnakeCase),
            "PascalCase" => Ok(Self::PascalCase),
            "identity" | "none" | "" => Ok(Self::Identity),
            other => Err(Error::Config(format!(
                "Unknown file case `{other}`, expected one of: {}",
                Self::ALL.map(Self::label).join(", ")
            ))),
        }
    }
}

/// Split an identifier into words.
///
/// Boundaries are whitespace, `-` and `_`, plus two case transitions:
/// an uppercase letter following a lowercase letter (digits and other
/// uncased characters in between do not hide the lowercase letter), and
/// the last capital of an acronym when it starts a new lowercase word
/// (`HTTPServer` becomes `HTTP`, `Server`).
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    // Case of the last cased character pushed into `current`.
    let mut last_cased_upper: Option<bool> = None;

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' || c == '_' {
            flush(&mut words, &mut current);
            last_cased_upper = None;
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let after_lower = last_cased_upper != Some(true);
            let acronym_end = chars[i - 1].is_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            if after_lower || acronym_end {
                flush(&mut words, &mut current);
            }
        }

        if c.is_uppercase() {
            last_cased_upper = Some(true);
        } else if c.is_lowercase() {
            last_cased_upper = Some(false);
        }
        current.push(c);
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn join_mapped(words: &[String], sep: &str, f: impl Fn(&str) -> String) -> String {
    words.iter().map(|w| f(w.as_str())).collect::<Vec<_>>().join(sep)
}

/// Uppercase the first character and keep the rest as is.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "PersonDto",
        "personDto",
        "person_dto",
        "person-dto",
        "Person Dto",
        "PERSON_DTO",
        "HTTPServerError",
        "getUserByIdAsync",
        "Dto2Person",
        "ABC2DEF",
        "a b c",
        "a 2B",
        "2 b",
        "x.y Z",
        "__weird--name__",
        "IPersonDto",
        "ItemsClient",
        "Utilities",
    ];

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("PersonDto"), vec!["Person", "Dto"]);
        assert_eq!(split_words("person_dto"), vec!["person", "dto"]);
        assert_eq!(split_words("person-dto item"), vec!["person", "dto", "item"]);
        assert_eq!(split_words("HTTPServer"), vec!["HTTP", "Server"]);
        assert_eq!(split_words("Dto2Person"), vec!["Dto2", "Person"]);
        assert_eq!(split_words("ABC2DEF"), vec!["ABC2DEF"]);
        assert_eq!(split_words("__"), Vec::<String>::new());
    }

    #[test]
    fn test_convert_each_convention() {
        let name = "PersonAddressDto";
        assert_eq!(FileCase::KebabCase.convert(name), "person-address-dto");
        assert_eq!(FileCase::CamelCase.convert(name), "personAddressDto");
        assert_eq!(FileCase::SnakeCase.convert(name), "person_address_dto");
        assert_eq!(FileCase::TitleCase.convert(name), "Person Address Dto");
        assert_eq!(FileCase::AllCapsSnakeCase.convert(name), "PERSON_ADDRESS_DTO");
        assert_eq!(FileCase::PascalCase.convert("person-address-dto"), name);
        assert_eq!(FileCase::Identity.convert("any_Thing"), "any_Thing");
    }

    #[test]
    fn test_acronyms_are_kept_together() {
        assert_eq!(FileCase::KebabCase.convert("HTTPServerError"), "http-server-error");
        assert_eq!(FileCase::CamelCase.convert("HTTPServerError"), "httpServerError");
        assert_eq!(FileCase::PascalCase.convert("HTTPServerError"), "HTTPServerError");
    }

    #[test]
    fn test_blank_input_is_unchanged() {
        for case in FileCase::ALL {
            assert_eq!(case.convert(""), "");
            assert_eq!(case.convert("   "), "   ");
        }
    }

    #[test]
    fn test_conversion_is_idempotent() {
        for case in FileCase::ALL {
            for sample in SAMPLES {
                let once = case.convert(sample);
                let twice = case.convert(&once);
                assert_eq!(once, twice, "{case} is not stable for {sample:?}");
            }
        }
    }

    #[test]
    fn test_parse_labels() {
        for case in FileCase::ALL {
            assert_eq!(case.label().parse::<FileCase>().unwrap(), case);
        }
        assert!("Sentence case".parse::<FileCase>().is_err());
    }
}
