//! Symbol extraction: schema definitions and operation groups become [`Symbol`]s.
//!
//! Both sequences are produced lazily in document order and can be
//! requested any number of times; each call starts a fresh walk.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{GeneratorConfig, OperationGenerationMode};
use crate::error::Result;
use crate::naming::FileCase;
use crate::openapi::{HttpMethod, OpenApiDocument, Operation, Parameter, PathOperation, Schema};
use crate::render::{SymbolRenderer, TypeNames};
use crate::symbol::{Symbol, SymbolKind};

/// One client method: a path operation plus its resolved method name.
#[derive(Debug, Clone)]
pub struct ClientOperation<'a> {
    pub name: String,
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    /// Path-level and operation-level parameters, operation entries winning.
    pub parameters: Vec<&'a Parameter>,
}

impl ClientOperation<'_> {
    pub fn has_path_parameters(&self) -> bool {
        self.parameters.iter().any(|p| p.location == "path")
    }
}

/// Operations sharing one client class.
#[derive(Debug, Clone)]
pub struct OperationGroup<'a> {
    pub key: String,
    pub class_name: String,
    pub operations: Vec<ClientOperation<'a>>,
}

/// Walks a document and produces the symbols to emit.
#[derive(Debug)]
pub struct SymbolExtractor<'a, R: ?Sized> {
    document: &'a OpenApiDocument,
    renderer: &'a R,
    config: &'a GeneratorConfig,
}

impl<'a, R: SymbolRenderer + ?Sized> SymbolExtractor<'a, R> {
    pub fn new(document: &'a OpenApiDocument, renderer: &'a R, config: &'a GeneratorConfig) -> Self {
        Self {
            document,
            renderer,
            config,
        }
    }

    /// One symbol per schema definition that is not excluded.
    ///
    /// Inline enums are appended to their owner's source text and recorded
    /// as names the owner defines. Their names are drawn from one registry
    /// per walk, seeded with every schema name, so no two files export the
    /// same identifier.
    pub fn dto_symbols(&self) -> impl Iterator<Item = Result<Symbol>> + '_ {
        let document: &'a OpenApiDocument = self.document;
        let schemas = document.schemas();
        let mut names = TypeNames::new(schemas.keys().copied());
        schemas
            .into_iter()
            .filter(move |(name, _)| !self.is_excluded(name))
            .map(move |(name, schema)| self.dto_symbol(name, schema, &mut names))
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.config.excluded_type_names.iter().any(|n| n == name)
    }

    fn dto_symbol(&self, name: &str, schema: &Schema, names: &mut TypeNames) -> Result<Symbol> {
        let rendered = self.renderer.render_dto(name, schema, names)?;
        let mut source_text = rendered.symbol.source_text;
        let mut references = rendered.symbol.references;
        let mut defined_names = rendered.symbol.defined_names;

        for inline in &rendered.inline_enums {
            let nested = self.renderer.render_dto(&inline.name, &inline.schema, names)?;
            source_text.push('\n');
            source_text.push_str(&nested.symbol.source_text);
            references.extend(nested.symbol.references);
            if !defined_names.contains(&inline.name) {
                defined_names.push(inline.name.clone());
            }
            defined_names.extend(nested.symbol.defined_names);
        }
        if !rendered.inline_enums.is_empty() {
            debug!(symbol = %name, inline_enums = rendered.inline_enums.len(), "Embedded inline enums");
        }

        Ok(Symbol {
            name: name.to_string(),
            kind: rendered.kind,
            source_text,
            references,
            defined_names,
            group_key: Some(name.to_string()),
        })
    }

    /// One symbol per client class.
    pub fn client_symbols(&self) -> impl Iterator<Item = Result<Symbol>> + '_ {
        self.operation_groups().into_iter().map(move |group| {
            let rendered = self.renderer.render_client(&group)?;
            Ok(Symbol {
                name: rendered.name,
                kind: SymbolKind::ClientClass,
                source_text: rendered.source_text,
                references: rendered.references,
                defined_names: rendered.defined_names,
                group_key: Some(group.key),
            })
        })
    }

    /// Group operations into client classes.
    ///
    /// The first tag of an operation names its group; untagged operations
    /// fall back to the name derived by the configured generation mode.
    /// Groups whose keys resolve to the same class name are merged.
    pub fn operation_groups(&self) -> Vec<OperationGroup<'a>> {
        let document: &'a OpenApiDocument = self.document;
        let by_path = self.config.operation_generation_mode
            == OperationGenerationMode::MultipleClientsFromPathSegments;
        let mut path_names: HashMap<String, usize> = HashMap::new();
        if by_path {
            for op in document.operations() {
                *path_names.entry(path_name(op.path)).or_insert(0) += 1;
            }
        }
        let mut groups: Vec<OperationGroup<'a>> = Vec::new();

        for op in document.operations() {
            let (controller, mut raw_name) = self.split_operation(&op);
            // Path-derived names only carry the verb when the path alone is ambiguous.
            let ambiguous = raw_name.is_empty() || path_names.get(&raw_name).is_some_and(|n| *n > 1);
            if by_path && ambiguous {
                raw_name.push(' ');
                raw_name.push_str(op.method.as_str());
            }
            let key = match self.config.operation_generation_mode {
                OperationGenerationMode::SingleClientFromOperationId => String::new(),
                _ => op.operation.tags.first().cloned().unwrap_or(controller),
            };
            let class_name = self.config.client_class_name(&key);
            let parameters = self.merge_parameters(&op);
            let has_path_parameters = parameters.iter().any(|p| p.location == "path");

            let operation = ClientOperation {
                name: operation_name(&key, &raw_name, op.method, has_path_parameters, by_path),
                path: op.path,
                method: op.method,
                operation: op.operation,
                parameters,
            };

            match groups.iter().position(|g| g.class_name == class_name) {
                Some(index) => groups[index].operations.push(operation),
                None => groups.push(OperationGroup {
                    key,
                    class_name,
                    operations: vec![operation],
                }),
            }
        }

        for group in &mut groups {
            let mut seen: HashMap<String, usize> = HashMap::new();
            for operation in &mut group.operations {
                let count = seen.entry(operation.name.clone()).or_insert(0);
                *count += 1;
                if *count > 1 {
                    operation.name = format!("{}{count}", operation.name);
                }
            }
        }

        debug!(groups = groups.len(), "Grouped operations");
        groups
    }

    /// `(controller, method name)` per generation mode.
    fn split_operation(&self, op: &PathOperation<'_>) -> (String, String) {
        let operation_id = op.operation.operation_id.clone().unwrap_or_default();
        match self.config.operation_generation_mode {
            OperationGenerationMode::MultipleClientsFromPathSegments => {
                let controller = static_segments(op.path).next().unwrap_or_default().to_string();
                (controller, path_name(op.path))
            }
            OperationGenerationMode::MultipleClientsFromOperationId => {
                match operation_id.split_once('_') {
                    Some((controller, name)) => (controller.to_string(), name.to_string()),
                    None => (String::new(), operation_id),
                }
            }
            OperationGenerationMode::SingleClientFromOperationId => (String::new(), operation_id),
        }
    }

    fn merge_parameters(&self, op: &PathOperation<'a>) -> Vec<&'a Parameter> {
        let mut merged: Vec<&'a Parameter> = op
            .path_parameters
            .iter()
            .filter(|p| {
                !op.operation
                    .parameters
                    .iter()
                    .any(|o| o.name == p.name && o.location == p.location)
            })
            .collect();
        merged.extend(op.operation.parameters.iter());
        merged.retain(|p| !self.config.excluded_parameter_names.iter().any(|n| *n == p.name));
        merged
    }
}

fn static_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && !s.starts_with('{'))
}

/// `/people/{id}/search` -> `people search`.
fn path_name(path: &str) -> String {
    static_segments(path).collect::<Vec<_>>().join(" ")
}

/// Final method name: camelCase, no `Async` suffix, and a `ByPath`
/// qualifier when the operation takes path parameters.
///
/// With `reduce_to_verb`, a name that only echoes controller and verb
/// (`peopleGet` in `People`) becomes the verb.
fn operation_name(
    controller: &str,
    raw: &str,
    method: HttpMethod,
    has_path_parameters: bool,
    reduce_to_verb: bool,
) -> String {
    let mut name = FileCase::CamelCase.convert(raw);
    if let Some(stripped) = name.strip_suffix("Async")
        && !stripped.is_empty()
    {
        name = stripped.to_string();
    }

    let echo = format!("{}{}", FileCase::PascalCase.convert(controller), method.as_upper());
    if reduce_to_verb && !controller.is_empty() && name.eq_ignore_ascii_case(&echo) {
        name = method.as_str().to_string();
    }

    if name.is_empty() {
        name = method.as_str().to_string();
    }
    if has_path_parameters && !name.ends_with("ByPath") {
        name.push_str("ByPath");
    }
    name
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::render::TypeScriptRenderer;

    const DOC: &str = r##"{
      "swagger": "2.0",
      "definitions": {
        "PersonDto": {
          "type": "object",
          "properties": {
            "address": { "$ref": "#/definitions/AddressDto" },
            "status": { "type": "string", "enum": ["active", "archived"] }
          }
        },
        "AddressDto": { "type": "object", "properties": { "street": { "type": "string" } } },
        "Legacy": { "type": "object" }
      },
      "paths": {
        "/people": {
          "get": { "tags": ["People"], "operationId": "People_ListAsync", "responses": {} },
          "post": { "operationId": "People_Create", "responses": {} }
        },
        "/people/{id}": {
          "parameters": [{ "name": "id", "in": "path", "required": true, "type": "integer" }],
          "get": {
            "operationId": "People_Get",
            "parameters": [{ "name": "X-Trace", "in": "header", "type": "string" }],
            "responses": {}
          }
        },
        "/orders": {
          "get": { "responses": {} }
        }
      }
    }"##;

    fn document() -> OpenApiDocument {
        let mut document = OpenApiDocument::from_json(DOC).unwrap();
        document.ensure_operation_ids();
        document
    }

    #[test]
    fn test_dto_symbols_embed_inline_enums() {
        let document = document();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default().with_excluded_type_names(["Legacy"]);
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let symbols: Vec<Symbol> = extractor.dto_symbols().collect::<Result<_>>().unwrap();
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["AddressDto", "PersonDto"]);

        let person = &symbols[1];
        assert_eq!(person.kind, SymbolKind::Dto);
        assert!(person.source_text.contains("export class PersonDto"));
        assert!(person.source_text.contains("export enum Status {"));
        assert!(person.defines("Status"));
        assert!(person.defines("IPersonDto"));
        assert!(person.references.iter().any(|r| r.raw == "AddressDto"));
        assert_eq!(person.group_key.as_deref(), Some("PersonDto"));
    }

    #[test]
    fn test_dto_symbols_are_restartable() {
        let document = document();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default();
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let first: Vec<Symbol> = extractor.dto_symbols().collect::<Result<_>>().unwrap();
        let second: Vec<Symbol> = extractor.dto_symbols().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_groups_by_operation_id() {
        let document = document();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default()
            .with_operation_generation_mode(OperationGenerationMode::MultipleClientsFromOperationId);
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let groups = extractor.operation_groups();
        let classes: Vec<&str> = groups.iter().map(|g| g.class_name.as_str()).collect();
        assert_eq!(classes, vec!["Client", "PeopleClient"]);

        let people = &groups[1];
        let names: Vec<&str> = people.operations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["list", "create", "getByPath"]);

        let get = &people.operations[2];
        assert!(get.has_path_parameters());
        assert_eq!(get.parameters.len(), 2);
    }

    #[test]
    fn test_groups_by_path_segments() {
        let document = document();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default();
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let groups = extractor.operation_groups();
        let orders = groups.iter().find(|g| g.class_name == "OrdersClient").unwrap();
        assert_eq!(orders.operations[0].name, "orders");

        let people = groups.iter().find(|g| g.class_name == "PeopleClient").unwrap();
        let names: Vec<&str> = people.operations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["get", "post", "getByPath"]);
    }

    #[test]
    fn test_path_segment_names_carry_verb_only_when_ambiguous() {
        let mut document = OpenApiDocument::from_json(
            r#"{
              "swagger": "2.0",
              "paths": {
                "/people/search": { "get": { "responses": {} } },
                "/people/export": {
                  "get": { "responses": {} },
                  "post": { "responses": {} }
                },
                "/": { "get": { "responses": {} } }
              }
            }"#,
        )
        .unwrap();
        document.ensure_operation_ids();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default();
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let groups = extractor.operation_groups();
        let people = groups.iter().find(|g| g.class_name == "PeopleClient").unwrap();
        let names: Vec<&str> = people.operations.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["peopleExportGet", "peopleExportPost", "peopleSearch"]);

        let root = groups.iter().find(|g| g.class_name == "Client").unwrap();
        assert_eq!(root.operations[0].name, "get");
    }

    #[test]
    fn test_operation_id_names_keep_controller_echo() {
        let document = OpenApiDocument::from_json(
            r#"{
              "swagger": "2.0",
              "paths": {
                "/items": { "get": { "operationId": "Items_ItemsGet", "responses": {} } }
              }
            }"#,
        )
        .unwrap();
        let renderer = TypeScriptRenderer::default();
        let config = GeneratorConfig::default()
            .with_operation_generation_mode(OperationGenerationMode::MultipleClientsFromOperationId);
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let groups = extractor.operation_groups();
        assert_eq!(groups[0].class_name, "ItemsClient");
        assert_eq!(groups[0].operations[0].name, "itemsGet");
    }

    #[test]
    fn test_single_client_and_duplicate_names() {
        let document = document();
        let renderer = TypeScriptRenderer::default();
        let mut config = GeneratorConfig::default()
            .with_operation_generation_mode(OperationGenerationMode::SingleClientFromOperationId);
        config.excluded_parameter_names = vec!["X-Trace".to_string()];
        let extractor = SymbolExtractor::new(&document, &renderer, &config);

        let groups = extractor.operation_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].class_name, "Client");
        let get = groups[0]
            .operations
            .iter()
            .find(|o| o.path == "/people/{id}")
            .unwrap();
        assert_eq!(get.parameters.len(), 1);

        let symbols: Vec<Symbol> = extractor.client_symbols().collect::<Result<_>>().unwrap();
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].kind, SymbolKind::ClientClass);
        assert_eq!(symbols[0].group_key.as_deref(), Some(""));
        assert!(symbols[0].source_text.contains("export class Client {"));
    }

    #[test]
    fn test_operation_name_rules() {
        assert_eq!(operation_name("Items", "GetItemsAsync", HttpMethod::Get, false, true), "getItems");
        assert_eq!(operation_name("items", "items get", HttpMethod::Get, false, true), "get");
        assert_eq!(operation_name("items", "items get", HttpMethod::Get, false, false), "itemsGet");
        assert_eq!(operation_name("items", "items get", HttpMethod::Get, true, true), "getByPath");
        assert_eq!(operation_name("", "Async", HttpMethod::Post, false, true), "async");
        assert_eq!(operation_name("Items", "find", HttpMethod::Get, true, true), "findByPath");
        assert_eq!(operation_name("", "", HttpMethod::Delete, false, false), "delete");
    }
}
