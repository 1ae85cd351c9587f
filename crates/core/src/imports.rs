//! Import header construction.
//!
//! Each symbol file starts with one import per sibling module it depends on,
//! followed by a single import from the shared utilities module.

use crate::classify::{TypeClass, TypeClassifier};
use crate::naming::FileCase;
use crate::symbol::Symbol;

/// A single `import { ... } from '...'` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    pub path: String,
    pub names: Vec<String>,
}

impl ModuleImport {
    fn render(&self) -> String {
        format!("import {{ {} }} from '{}';\n", self.names.join(", "), self.path)
    }
}

/// The resolved imports of one symbol, before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    pub modules: Vec<ModuleImport>,
    pub utilities: Option<ModuleImport>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.utilities.is_none()
    }

    /// Render the header; empty plans render to an empty string.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut header = String::new();
        for module in &self.modules {
            header.push_str(&module.render());
        }
        if let Some(utilities) = &self.utilities {
            header.push_str(&utilities.render());
        }
        header.push('\n');
        header
    }
}

/// Builds import headers for symbols that live in one directory.
///
/// `sibling_prefix` is prepended to the converted file name of every
/// cross-module target (`./` for DTO siblings, `./Dto/` for clients importing
/// DTOs from a subdirectory). `utilities_path` is the module path of the
/// shared utilities file as seen from that directory.
#[derive(Debug, Clone)]
pub struct ImportHeaderBuilder<'a> {
    classifier: &'a TypeClassifier,
    file_case: FileCase,
    sibling_prefix: String,
    utilities_path: String,
    baseline: Vec<String>,
}

impl<'a> ImportHeaderBuilder<'a> {
    pub fn new(
        classifier: &'a TypeClassifier,
        file_case: FileCase,
        sibling_prefix: impl Into<String>,
        utilities_path: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            file_case,
            sibling_prefix: sibling_prefix.into(),
            utilities_path: utilities_path.into(),
            baseline: Vec::new(),
        }
    }

    /// Utility names every symbol built by this builder imports, referenced or not.
    pub fn with_baseline<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.baseline.extend(names.into_iter().map(Into::into));
        self
    }

    /// Resolve a symbol's references into sibling and utilities imports.
    pub fn plan(&self, symbol: &Symbol) -> ImportPlan {
        let mut modules: Vec<ModuleImport> = Vec::new();
        let mut utility_names: Vec<String> = Vec::new();

        for reference in &symbol.references {
            for classified in self.classifier.classify_alternatives(&reference.raw) {
                match classified.class {
                    TypeClass::Base => {}
                    TypeClass::Utility => push_unique(&mut utility_names, &classified.name),
                    TypeClass::CrossModule => {
                        if symbol.defines(&classified.name) {
                            continue;
                        }
                        let path = format!(
                            "{}{}",
                            self.sibling_prefix,
                            self.file_case.convert(&classified.name)
                        );
                        let names = reference
                            .companions
                            .iter()
                            .filter(|c| !symbol.defines(c) && !self.classifier.is_utility(c))
                            .chain(std::iter::once(&classified.name));
                        match modules.iter().position(|m| m.path == path) {
                            Some(index) => {
                                for name in names {
                                    push_unique(&mut modules[index].names, name);
                                }
                            }
                            None => {
                                let mut import = ModuleImport {
                                    path,
                                    names: Vec::new(),
                                };
                                for name in names {
                                    push_unique(&mut import.names, name);
                                }
                                modules.push(import);
                            }
                        }
                    }
                }
            }
        }

        for name in &self.baseline {
            push_unique(&mut utility_names, name);
        }
        utility_names.retain(|name| !symbol.defines(name));

        let utilities = (!utility_names.is_empty()).then(|| ModuleImport {
            path: self.utilities_path.clone(),
            names: utility_names,
        });
        ImportPlan { modules, utilities }
    }

    /// Build the import header text for a symbol.
    pub fn build(&self, symbol: &Symbol) -> String {
        self.plan(symbol).render()
    }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::symbol::{SymbolKind, TypeReference};

    #[test]
    fn test_one_line_per_target_plus_utilities() {
        let classifier = TypeClassifier::default().with_utility_names(["ThrowHelper"]);
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::Identity, "./", "../Utilities")
            .with_baseline(["throwException"]);
        let symbol = Symbol::new("ItemsClient", SymbolKind::ClientClass, "")
            .with_references(["Bar", "Baz[]", "ThrowHelper", "Bar | null", "string"]);

        let header = builder.build(&symbol);
        assert_eq!(
            header,
            "import { Bar } from './Bar';\n\
             import { Baz } from './Baz';\n\
             import { ThrowHelper, throwException } from '../Utilities';\n\n"
        );
    }

    #[test]
    fn test_names_sharing_a_file_are_combined() {
        let classifier = TypeClassifier::default();
        // Both names normalize to the same kebab-case file.
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::KebabCase, "./", "./Utilities");
        let symbol = Symbol::new("Owner", SymbolKind::Dto, "")
            .with_references(["PersonDto", "Person_Dto"]);

        let plan = builder.plan(&symbol);
        assert_eq!(plan.modules.len(), 1);
        assert_eq!(plan.modules[0].path, "./person-dto");
        assert_eq!(plan.modules[0].names, vec!["PersonDto", "Person_Dto"]);
    }

    #[test]
    fn test_self_and_inline_names_are_excluded() {
        let classifier = TypeClassifier::default();
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::Identity, "./", "../Utilities");
        let symbol = Symbol::new("TreeNode", SymbolKind::Dto, "")
            .with_references(["TreeNode[]", "Status", "AddressDto | undefined"])
            .with_defined_names(["ITreeNode", "Status"]);

        let plan = builder.plan(&symbol);
        assert_eq!(
            plan.modules,
            vec![ModuleImport {
                path: "./AddressDto".to_string(),
                names: vec!["AddressDto".to_string()],
            }]
        );
        assert!(plan.utilities.is_none());
    }

    #[test]
    fn test_constructor_interface_travels_with_parent() {
        let classifier = TypeClassifier::default();
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::Identity, "./", "../Utilities");
        let symbol = Symbol::new("TagDto", SymbolKind::Dto, "").with_references([
            TypeReference::new("TagBasicDto").with_companion("ITagBasicDto"),
        ]);

        assert_eq!(
            builder.build(&symbol),
            "import { ITagBasicDto, TagBasicDto } from './TagBasicDto';\n\n"
        );
    }

    #[test]
    fn test_base_only_symbol_has_no_header() {
        let classifier = TypeClassifier::new(["Money"]);
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::Identity, "./", "../Utilities");
        let symbol = Symbol::new("Price", SymbolKind::Dto, "")
            .with_references(["number", "Money", "{ [key: string]: string; }"]);
        assert_eq!(builder.build(&symbol), "");
    }

    #[test]
    fn test_header_is_deterministic() {
        let classifier = TypeClassifier::default();
        let builder = ImportHeaderBuilder::new(&classifier, FileCase::SnakeCase, "./Dto/", "./Utilities")
            .with_baseline(["ServiceBase", "throwException"]);
        let symbol = Symbol::new("OrdersClient", SymbolKind::ClientClass, "")
            .with_references(["OrderDto[]", "FileResponse", "ProblemDetails | ValidationProblem"]);

        let first = builder.build(&symbol);
        for _ in 0..5 {
            assert_eq!(builder.build(&symbol), first);
        }
        assert!(first.contains("import { OrderDto } from './Dto/order_dto';"));
        assert!(first.contains("import { ValidationProblem } from './Dto/validation_problem';"));
        assert!(first.ends_with(
            "import { FileResponse, ServiceBase, throwException } from './Utilities';\n\n"
        ));
    }
}
