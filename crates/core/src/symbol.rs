//! Generated symbols and the type references they carry.

/// What a symbol represents in the generated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Dto,
    Enum,
    ClientClass,
    UtilityMember,
}

impl SymbolKind {
    /// DTOs and enums share one namespace, client classes another.
    pub fn partition(self) -> &'static str {
        match self {
            Self::Dto | Self::Enum => "model",
            Self::ClientClass => "client",
            Self::UtilityMember => "utility",
        }
    }
}

/// A type expression referenced by generated code.
///
/// `companions` are extra names that must be imported from the same module
/// whenever the type itself is, such as a constructor interface (`IPersonDto`
/// next to `PersonDto`). They are listed before the type in the import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub raw: String,
    pub companions: Vec<String>,
}

impl TypeReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            companions: Vec::new(),
        }
    }

    pub fn with_companion(mut self, name: impl Into<String>) -> Self {
        self.companions.push(name.into());
        self
    }
}

impl From<&str> for TypeReference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// One independently emitted unit of generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub source_text: String,
    pub references: Vec<TypeReference>,
    /// Names declared inside `source_text` besides `name` (constructor
    /// interfaces, inline enums). Never imported.
    pub defined_names: Vec<String>,
    /// Schema name for DTOs, tag or controller for clients.
    pub group_key: Option<String>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, source_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            source_text: source_text.into(),
            references: Vec::new(),
            defined_names: Vec::new(),
            group_key: None,
        }
    }

    pub fn with_references<I, R>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<TypeReference>,
    {
        self.references.extend(references.into_iter().map(Into::into));
        self
    }

    pub fn with_defined_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defined_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether `name` is declared by this symbol's own source text.
    pub fn defines(&self, name: &str) -> bool {
        self.name == name || self.defined_names.iter().any(|n| n == name)
    }
}
