//! Rendering of schema definitions and operation groups into source text.
//!
//! The extractor only talks to a [`SymbolRenderer`]; it never inspects the
//! text it gets back beyond appending inline enums to their owner.

mod types;
mod typescript;
mod utils;

pub use types::{Emit, TsLiteral, TsPrimitive, TsType};
pub use typescript::{TypeScriptRenderer, TypeScriptSettings};

use std::collections::HashSet;

use crate::error::Result;
use crate::extract::OperationGroup;
use crate::openapi::Schema;
use crate::symbol::{SymbolKind, TypeReference};

/// Source text of one symbol plus everything it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSymbol {
    pub name: String,
    pub source_text: String,
    pub references: Vec<TypeReference>,
    /// Extra names declared by `source_text`, such as a constructor interface.
    pub defined_names: Vec<String>,
}

/// An anonymous enumeration found on a property, to be emitted inside its owner's file.
#[derive(Debug, Clone)]
pub struct InlineEnum {
    pub name: String,
    pub schema: Schema,
}

/// A rendered schema definition.
#[derive(Debug, Clone)]
pub struct RenderedDto {
    pub kind: SymbolKind,
    pub symbol: RenderedSymbol,
    pub inline_enums: Vec<InlineEnum>,
}

/// Type names already claimed in the model namespace of one run.
///
/// Seeded with every schema definition name so a name invented for an
/// anonymous enum never shadows a definition or another invented name.
#[derive(Debug, Clone, Default)]
pub struct TypeNames {
    taken: HashSet<String>,
}

impl TypeNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Mark `name` as used. Returns `false` when it already was.
    pub fn claim(&mut self, name: impl Into<String>) -> bool {
        self.taken.insert(name.into())
    }

    /// Claim the first free name out of `preferred`, `qualified`, then
    /// `qualified` with a counter starting at `2`.
    pub fn claim_first_free(&mut self, preferred: &str, qualified: &str) -> String {
        let mut name = if self.contains(preferred) {
            qualified.to_string()
        } else {
            preferred.to_string()
        };
        let mut counter = 2;
        while self.contains(&name) {
            name = format!("{qualified}{counter}");
            counter += 1;
        }
        self.claim(name.clone());
        name
    }
}

/// Turns document nodes into source text.
pub trait SymbolRenderer {
    /// Render one schema definition (class, enum or type alias).
    ///
    /// Names the renderer invents for nested types are claimed in `names`.
    fn render_dto(&self, name: &str, schema: &Schema, names: &mut TypeNames) -> Result<RenderedDto>;

    /// Render one client class covering every operation of the group.
    fn render_client(&self, group: &OperationGroup<'_>) -> Result<RenderedSymbol>;

    /// Body of the shared utilities module.
    fn render_utilities(&self) -> Result<String>;

    /// Utility names every client module imports.
    fn utility_baseline(&self) -> Vec<String>;

    /// Names this renderer places in the utilities module beyond the fixed registry.
    fn utility_names(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_first_free() {
        let mut names = TypeNames::new(["Status", "OrderDto"]);
        assert_eq!(names.claim_first_free("Kind", "OrderDtoKind"), "Kind");
        assert_eq!(names.claim_first_free("Status", "OrderDtoStatus"), "OrderDtoStatus");
        assert_eq!(names.claim_first_free("Status", "OrderDtoStatus"), "OrderDtoStatus2");
        assert!(names.contains("OrderDtoStatus2"));
        assert!(!names.claim("Kind"));
    }
}
