//! OpenAPI document structs for serde deserialization.
//!
//! Accepts Swagger 2.0 (`definitions`, `host`, `basePath`) and OpenAPI 3.x
//! (`components.schemas`, `servers`) documents. Maps are ordered so every
//! walk over the document is deterministic.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Root OpenAPI document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenApiDocument {
    pub swagger: Option<String>,
    pub openapi: Option<String>,
    pub info: Option<Info>,
    pub host: Option<String>,
    pub base_path: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,
    pub components: Option<Components>,
    #[serde(skip)]
    operation_ids_generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
}

/// Components section containing reusable schemas.
#[derive(Debug, Clone, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, Schema>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    pub head: Option<Operation>,
    pub options: Option<Operation>,
    /// Path-level parameters shared by all operations.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }

    pub fn as_upper(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A parameter (query, path, header, or a Swagger 2 body/formData parameter).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    /// Swagger 2 non-body parameters carry their type inline.
    #[serde(rename = "type")]
    pub param_type: Option<String>,
    pub format: Option<String>,
    pub items: Option<Box<Schema>>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,
}

impl Parameter {
    /// The parameter's schema, synthesized from inline Swagger 2 fields when needed.
    pub fn effective_schema(&self) -> Schema {
        if let Some(schema) = &self.schema {
            return schema.clone();
        }
        Schema {
            schema_type: self.param_type.clone().map(SchemaType::Single),
            format: self.format.clone(),
            items: self.items.clone(),
            enum_values: self.enum_values.clone(),
            ..Schema::default()
        }
    }
}

/// A request body definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    /// Swagger 2 response schema.
    pub schema: Option<Schema>,
    #[serde(default)]
    pub content: BTreeMap<String, MediaType>,
}

impl Response {
    /// The response body schema, preferring JSON content.
    pub fn body_schema(&self) -> Option<&Schema> {
        self.schema.as_ref().or_else(|| preferred_media_schema(&self.content))
    }
}

impl RequestBody {
    pub fn body_schema(&self) -> Option<&Schema> {
        preferred_media_schema(&self.content)
    }

    /// Whether the body is sent as multipart form data.
    pub fn is_multipart(&self) -> bool {
        self.content.contains_key("multipart/form-data")
            && !self.content.contains_key("application/json")
    }
}

fn preferred_media_schema(content: &BTreeMap<String, MediaType>) -> Option<&Schema> {
    content
        .get("application/json")
        .or_else(|| content.values().next())
        .and_then(|media| media.schema.as_ref())
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    pub properties: Option<BTreeMap<String, Schema>>,

    pub required: Option<Vec<String>>,

    pub items: Option<Box<Schema>>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Member names for integer enums.
    #[serde(rename = "x-enumNames")]
    pub enum_names: Option<Vec<String>>,

    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<Schema>>,

    pub additional_properties: Option<AdditionalProperties>,

    pub format: Option<String>,

    pub description: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    /// NSwag's Swagger 2 nullability extension.
    #[serde(rename = "x-nullable")]
    pub x_nullable: Option<bool>,
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// One operation with the path it lives on.
#[derive(Debug, Clone, Copy)]
pub struct PathOperation<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    pub path_parameters: &'a [Parameter],
}

impl PathItem {
    fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Patch, self.patch.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
            (HttpMethod::Head, self.head.as_ref()),
            (HttpMethod::Options, self.options.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }

    fn operations_mut(&mut self) -> impl Iterator<Item = (HttpMethod, &mut Operation)> {
        [
            (HttpMethod::Get, self.get.as_mut()),
            (HttpMethod::Post, self.post.as_mut()),
            (HttpMethod::Put, self.put.as_mut()),
            (HttpMethod::Patch, self.patch.as_mut()),
            (HttpMethod::Delete, self.delete.as_mut()),
            (HttpMethod::Head, self.head.as_mut()),
            (HttpMethod::Options, self.options.as_mut()),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.map(|op| (method, op)))
    }
}

impl OpenApiDocument {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Self =
            serde_json::from_str(json).map_err(|e| Error::Document(e.to_string()))?;
        if document.swagger.is_none() && document.openapi.is_none() {
            return Err(Error::Document(
                "missing `swagger` or `openapi` version field".to_string(),
            ));
        }
        Ok(document)
    }

    /// All schema definitions by name, Swagger 2 and OpenAPI 3 merged.
    ///
    /// On a name clash the `components.schemas` entry wins.
    pub fn schemas(&self) -> BTreeMap<&str, &Schema> {
        let mut schemas: BTreeMap<&str, &Schema> = self
            .definitions
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
            .collect();
        if let Some(components) = &self.components {
            for (name, schema) in &components.schemas {
                schemas.insert(name.as_str(), schema);
            }
        }
        schemas
    }

    /// Every operation in path order, then method order.
    pub fn operations(&self) -> Vec<PathOperation<'_>> {
        self.paths
            .iter()
            .flat_map(|(path, item)| {
                item.operations().map(move |(method, operation)| PathOperation {
                    path: path.as_str(),
                    method,
                    operation,
                    path_parameters: &item.parameters,
                })
            })
            .collect()
    }

    /// Give every operation a unique `operationId`.
    ///
    /// Missing ids are derived from method and path; repeated ids get a
    /// numeric suffix starting at `2`. Runs once per document.
    pub fn ensure_operation_ids(&mut self) {
        if self.operation_ids_generated {
            return;
        }
        let mut seen: BTreeMap<String, usize> = BTreeMap::new();
        for (path, item) in &mut self.paths {
            for (method, operation) in item.operations_mut() {
                let base = operation
                    .operation_id
                    .clone()
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| derive_operation_id(method, path));
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let id = if *count == 1 {
                    base
                } else {
                    format!("{base}{count}")
                };
                if operation.operation_id.as_deref() != Some(id.as_str()) {
                    debug!(path = %path, method = %method, operation_id = %id, "Assigned operation id");
                }
                operation.operation_id = Some(id);
            }
        }
        self.operation_ids_generated = true;
    }

    /// The API base URL: the first server, or `scheme://host/basePath`.
    pub fn base_url(&self) -> Option<String> {
        if let Some(server) = self.servers.first() {
            return Some(server.url.trim_end_matches('/').to_string());
        }
        let base_path = self.base_path.as_deref().unwrap_or("");
        match &self.host {
            Some(host) => {
                let scheme = self
                    .schemes
                    .first()
                    .map_or("http", String::as_str);
                Some(format!("{scheme}://{host}{base_path}").trim_end_matches('/').to_string())
            }
            None if !base_path.is_empty() => Some(base_path.trim_end_matches('/').to_string()),
            None => None,
        }
    }

    /// Make a relative base URL absolute using the URL the document was fetched from.
    ///
    /// Absolute base URLs are left alone. A base URL without a scheme but with
    /// a host (`//api.example.com`, `api.example.com/v1`) gets the fetch
    /// URL's scheme; a bare path gets its scheme and host.
    pub fn resolve_relative_base_url(&mut self, fetched_from: &str) {
        let Ok(source) = Url::parse(fetched_from) else {
            return;
        };
        let Some(current) = self.base_url() else {
            return;
        };
        if Url::parse(&current).is_ok_and(|u| u.has_host()) {
            return;
        }

        let resolved = if let Some(rest) = current.strip_prefix("//") {
            format!("{}://{rest}", source.scheme())
        } else if current.starts_with('/') || current.is_empty() {
            let mut origin = source.origin().ascii_serialization();
            if origin == "null" {
                origin = format!("{}://", source.scheme());
            }
            format!("{origin}{current}")
        } else {
            format!("{}://{current}", source.scheme())
        };
        debug!(from = %current, to = %resolved, "Resolved relative base URL");
        self.servers = vec![Server { url: resolved }];
    }
}

/// `get` on `/users/{id}/orders` becomes `getUsersOrders`.
fn derive_operation_id(method: HttpMethod, path: &str) -> String {
    let mut id = method.as_str().to_string();
    for segment in path.split('/') {
        if segment.is_empty() || segment.starts_with('{') {
            continue;
        }
        id.push_str(&crate::naming::FileCase::PascalCase.convert(segment));
    }
    id
}

/// Last segment of a `$ref`, e.g. `#/components/schemas/Item` → `Item`.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}

impl Schema {
    /// Check if this schema is nullable (nullable flags, `null` in a type array, or a null alternative).
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) || self.x_nullable == Some(true) {
            return true;
        }
        if let Some(SchemaType::Multiple(types)) = &self.schema_type
            && types.iter().any(|t| t == "null")
        {
            return true;
        }
        self.any_of
            .iter()
            .chain(self.one_of.iter())
            .flatten()
            .any(Schema::is_null_type)
    }

    /// Whether this schema is exactly `{ "type": "null" }`.
    pub fn is_null_type(&self) -> bool {
        matches!(&self.schema_type, Some(SchemaType::Single(t)) if t == "null")
    }

    /// The first non-null type name.
    pub fn primary_type(&self) -> Option<&str> {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => Some(t.as_str()),
            Some(SchemaType::Multiple(types)) => {
                types.iter().map(String::as_str).find(|t| *t != "null")
            }
            None => None,
        }
    }

    /// The referenced schema name, when this is a `$ref`.
    pub fn ref_name(&self) -> Option<&str> {
        self.ref_path.as_deref().map(ref_name)
    }

    pub fn is_enum(&self) -> bool {
        self.enum_values.as_ref().is_some_and(|values| !values.is_empty())
    }

    /// Whether the schema describes an object with named properties or inheritance.
    pub fn is_object_like(&self) -> bool {
        self.properties.is_some()
            || self.all_of.is_some()
            || (self.primary_type() == Some("object") && self.additional_properties.is_none())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SWAGGER2: &str = r##"{
      "swagger": "2.0",
      "host": "api.example.com",
      "basePath": "/v1",
      "schemes": ["https"],
      "paths": {
        "/items": {
          "get": { "tags": ["Items"], "responses": {} },
          "post": { "operationId": "Items_Create", "responses": {} }
        },
        "/items/{id}": {
          "get": { "operationId": "Items_Create", "responses": {} }
        }
      },
      "definitions": { "Item": { "type": "object" } }
    }"##;

    #[test]
    fn test_parses_swagger2_and_openapi3() {
        let doc = OpenApiDocument::from_json(SWAGGER2).unwrap();
        assert_eq!(doc.schemas().keys().copied().collect::<Vec<_>>(), vec!["Item"]);
        assert_eq!(doc.operations().len(), 3);

        let doc = OpenApiDocument::from_json(
            r#"{ "openapi": "3.0.1", "paths": {}, "components": { "schemas": { "B": {}, "A": {} } } }"#,
        )
        .unwrap();
        assert_eq!(doc.schemas().keys().copied().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_rejects_non_openapi_json() {
        assert!(matches!(
            OpenApiDocument::from_json(r#"{ "name": "x" }"#),
            Err(Error::Document(_))
        ));
        assert!(OpenApiDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_ensure_operation_ids() {
        let mut doc = OpenApiDocument::from_json(SWAGGER2).unwrap();
        doc.ensure_operation_ids();
        let ids: Vec<_> = doc
            .operations()
            .iter()
            .map(|op| op.operation.operation_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["getItems", "Items_Create", "Items_Create2"]);

        // A second pass leaves the ids alone.
        doc.ensure_operation_ids();
        let again: Vec<_> = doc
            .operations()
            .iter()
            .map(|op| op.operation.operation_id.clone().unwrap())
            .collect();
        assert_eq!(ids, again);
    }

    #[test]
    fn test_base_url() {
        let doc = OpenApiDocument::from_json(SWAGGER2).unwrap();
        assert_eq!(doc.base_url().as_deref(), Some("https://api.example.com/v1"));

        let doc = OpenApiDocument::from_json(
            r#"{ "openapi": "3.0.0", "servers": [{ "url": "http://localhost:5000/" }] }"#,
        )
        .unwrap();
        assert_eq!(doc.base_url().as_deref(), Some("http://localhost:5000"));
    }

    #[test]
    fn test_resolve_relative_base_url() {
        let mut doc =
            OpenApiDocument::from_json(r#"{ "openapi": "3.0.0", "servers": [{ "url": "/api" }] }"#)
                .unwrap();
        doc.resolve_relative_base_url("https://petstore.example.com/swagger/v1/swagger.json");
        assert_eq!(
            doc.base_url().as_deref(),
            Some("https://petstore.example.com/api")
        );

        let mut doc = OpenApiDocument::from_json(
            r#"{ "openapi": "3.0.0", "servers": [{ "url": "//cdn.example.com/v2" }] }"#,
        )
        .unwrap();
        doc.resolve_relative_base_url("https://petstore.example.com/swagger.json");
        assert_eq!(doc.base_url().as_deref(), Some("https://cdn.example.com/v2"));

        let mut doc = OpenApiDocument::from_json(
            r#"{ "openapi": "3.0.0", "servers": [{ "url": "http://fixed.example.com" }] }"#,
        )
        .unwrap();
        doc.resolve_relative_base_url("https://other.example.com/swagger.json");
        assert_eq!(doc.base_url().as_deref(), Some("http://fixed.example.com"));
    }

    #[test]
    fn test_nullable_detection() {
        let schema: Schema =
            serde_json::from_str(r#"{ "type": ["string", "null"] }"#).unwrap();
        assert!(schema.is_nullable());
        assert_eq!(schema.primary_type(), Some("string"));

        let schema: Schema = serde_json::from_str(
            r##"{ "anyOf": [{ "$ref": "#/components/schemas/A" }, { "type": "null" }] }"##,
        )
        .unwrap();
        assert!(schema.is_nullable());

        let schema: Schema = serde_json::from_str(r#"{ "type": "string" }"#).unwrap();
        assert!(!schema.is_nullable());
    }
}
