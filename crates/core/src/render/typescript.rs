//! NSwag-flavoured TypeScript renderer.
//!
//! DTOs become classes with `init`/`fromJS`/`toJSON` and an optional
//! constructor interface, enums become TypeScript enums, and every
//! operation group becomes one client class for the configured template.

use std::collections::HashSet;

use super::types::{Emit, TsLiteral, TsPrimitive, TsType};
use super::utils::{
    enum_member_name, escape_js_string, member_access, quote_if_needed, sanitize_identifier,
};
use super::{InlineEnum, RenderedDto, RenderedSymbol, SymbolRenderer, TypeNames};
use crate::config::{ClientTemplate, GeneratorConfig};
use crate::error::Result;
use crate::extract::{ClientOperation, OperationGroup};
use crate::naming::FileCase;
use crate::openapi::{AdditionalProperties, EnumValue, HttpMethod, Schema};
use crate::symbol::{SymbolKind, TypeReference};

const INDENT: &str = "    ";
const BODY_INDENT: &str = "            ";

/// Options that shape the emitted TypeScript.
#[derive(Debug, Clone)]
pub struct TypeScriptSettings {
    pub template: ClientTemplate,
    pub client_base_class: Option<String>,
    pub use_get_base_url_method: bool,
    pub generate_constructor_interface: bool,
    /// Default base URL baked into client constructors.
    pub base_url: String,
}

impl Default for TypeScriptSettings {
    fn default() -> Self {
        Self {
            template: ClientTemplate::Fetch,
            client_base_class: None,
            use_get_base_url_method: false,
            generate_constructor_interface: true,
            base_url: String::new(),
        }
    }
}

impl TypeScriptSettings {
    pub fn from_config(config: &GeneratorConfig, base_url: Option<String>) -> Self {
        Self {
            template: config.template,
            client_base_class: config.client_base_class.clone(),
            use_get_base_url_method: config.use_get_base_url_method,
            generate_constructor_interface: config.generate_constructor_interface,
            base_url: base_url.unwrap_or_default(),
        }
    }
}

/// Renders schemas and operation groups as TypeScript.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptRenderer {
    settings: TypeScriptSettings,
}

/// Where a type appears; binary payloads map differently per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Usage {
    Model,
    Input,
    Output,
}

impl TypeScriptRenderer {
    pub fn new(settings: TypeScriptSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TypeScriptSettings {
        &self.settings
    }

    // =========================================================================
    // Type mapping
    // =========================================================================

    fn map_type(&self, schema: &Schema, usage: Usage) -> TsType {
        let ty = self.map_non_null(schema, usage);
        if schema.is_nullable() {
            ty.nullable()
        } else {
            ty
        }
    }

    fn map_non_null(&self, schema: &Schema, usage: Usage) -> TsType {
        if let Some(name) = schema.ref_name() {
            return TsType::named(name);
        }

        if let Some(all_of) = &schema.all_of {
            let mut parts = self.map_parts(all_of, usage);
            return match parts.len() {
                0 | 1 => parts.pop().unwrap_or_else(TsType::any),
                _ => TsType::Intersection(parts),
            };
        }

        if let Some(alternatives) = schema.any_of.as_ref().or(schema.one_of.as_ref()) {
            let mut parts = self.map_parts(alternatives, usage);
            return match parts.len() {
                0 | 1 => parts.pop().unwrap_or_else(TsType::any),
                _ => TsType::Union(parts),
            };
        }

        if let Some(values) = &schema.enum_values {
            let mut literals: Vec<TsType> = values
                .iter()
                .filter_map(enum_literal)
                .map(TsType::Literal)
                .collect();
            match literals.len() {
                0 => {}
                1 => return literals.pop().unwrap_or_else(TsType::any),
                _ => return TsType::Union(literals),
            }
        }

        match schema.primary_type() {
            Some("string") => match schema.format.as_deref() {
                Some("date" | "date-time") => TsType::Primitive(TsPrimitive::Date),
                Some("binary") => binary_type(usage),
                _ => TsType::Primitive(TsPrimitive::String),
            },
            Some("file") => binary_type(usage),
            Some("integer" | "number") => TsType::Primitive(TsPrimitive::Number),
            Some("boolean") => TsType::Primitive(TsPrimitive::Boolean),
            Some("null") => TsType::Primitive(TsPrimitive::Null),
            Some("array") => {
                let item = schema
                    .items
                    .as_deref()
                    .map_or_else(TsType::any, |items| self.map_type(items, usage));
                TsType::Array(Box::new(item))
            }
            _ => match &schema.additional_properties {
                Some(AdditionalProperties::Schema(value)) => {
                    TsType::Dictionary(Box::new(self.map_type(value, usage)))
                }
                Some(AdditionalProperties::Bool(true)) => TsType::Dictionary(Box::new(TsType::any())),
                _ => TsType::any(),
            },
        }
    }

    fn map_parts(&self, schemas: &[Schema], usage: Usage) -> Vec<TsType> {
        let mut parts: Vec<TsType> = Vec::new();
        for schema in schemas.iter().filter(|s| !s.is_null_type()) {
            let ty = self.map_type(schema, usage);
            if !parts.contains(&ty) {
                parts.push(ty);
            }
        }
        parts
    }

    // =========================================================================
    // DTOs
    // =========================================================================

    fn render_class(&self, name: &str, schema: &Schema, names: &mut TypeNames) -> RenderedDto {
        let mut parents: Vec<&str> = Vec::new();
        let mut members: Vec<(&str, &Schema)> = Vec::new();
        let mut required: HashSet<&str> = HashSet::new();
        collect_members(schema, &mut parents, &mut members, &mut required);

        let with_interface = self.settings.generate_constructor_interface;
        let interface_name = format!("I{name}");
        let mut references = Vec::new();
        let mut defined_names = Vec::new();
        if with_interface {
            names.claim(interface_name.clone());
            defined_names.push(interface_name.clone());
        }
        for parent in &parents {
            let reference = TypeReference::new(*parent);
            references.push(if with_interface {
                reference.with_companion(format!("I{parent}"))
            } else {
                reference
            });
        }

        let mut inline_enums = Vec::new();
        let mut fields = Vec::new();
        for (key, prop) in members {
            let ty = match inline_enum_for(name, key, prop, names) {
                Some((enum_name, enum_schema, ty)) => {
                    defined_names.push(enum_name.clone());
                    inline_enums.push(InlineEnum {
                        name: enum_name,
                        schema: enum_schema,
                    });
                    ty
                }
                None => self.map_type(prop, Usage::Model),
            };
            let is_required = required.contains(key);
            let ty = if is_required { ty } else { ty.optional() };
            ty.collect_references(&mut references);
            fields.push(Field {
                key,
                ty,
                required: is_required,
                description: prop.description.as_deref(),
            });
        }

        let parent = parents.first().copied();
        let mut out = String::new();
        if let Some(description) = &schema.description {
            out.push_str(&doc_comment(description, ""));
        }
        let extends = parent.map(|p| format!(" extends {p}")).unwrap_or_default();
        let implements = if with_interface {
            format!(" implements {interface_name}")
        } else {
            String::new()
        };
        out.push_str(&format!("export class {name}{extends}{implements} {{\n"));
        for field in &fields {
            if let Some(description) = field.description {
                out.push_str(&doc_comment(description, INDENT));
            }
            let marker = if field.required { "!" } else { "?" };
            out.push_str(&format!(
                "{INDENT}{}{marker}: {};\n",
                quote_if_needed(field.key),
                field.ty.emit()
            ));
        }
        if !fields.is_empty() {
            out.push('\n');
        }

        let data_type = if with_interface { interface_name.as_str() } else { "any" };
        out.push_str(&format!("{INDENT}constructor(data?: {data_type}) {{\n"));
        if parent.is_some() {
            out.push_str("        super(data);\n");
        } else {
            out.push_str(
                "        if (data) {\n\
                 \x20           for (var property in data) {\n\
                 \x20               if (data.hasOwnProperty(property))\n\
                 \x20                   (this as any)[property] = (data as any)[property];\n\
                 \x20           }\n\
                 \x20       }\n",
            );
        }
        out.push_str("    }\n\n");

        out.push_str("    init(_data?: any) {\n");
        if parent.is_some() {
            out.push_str("        super.init(_data);\n");
        }
        if !fields.is_empty() {
            out.push_str("        if (_data) {\n");
            for field in &fields {
                let target = member_access("this", field.key);
                let source = format!("_data[\"{}\"]", escape_js_string(field.key));
                if field.ty.is_date() {
                    out.push_str(&format!(
                        "{BODY_INDENT}{target} = {source} ? new Date({source}.toString()) : undefined as any;\n"
                    ));
                } else {
                    out.push_str(&format!("{BODY_INDENT}{target} = {source};\n"));
                }
            }
            out.push_str("        }\n");
        }
        out.push_str("    }\n\n");

        out.push_str(&format!(
            "    static fromJS(data: any): {name} {{\n\
             \x20       data = typeof data === 'object' ? data : {{}};\n\
             \x20       let result = new {name}();\n\
             \x20       result.init(data);\n\
             \x20       return result;\n\
             \x20   }}\n\n"
        ));

        out.push_str("    toJSON(data?: any) {\n");
        out.push_str("        data = typeof data === 'object' ? data : {};\n");
        for field in &fields {
            let key = format!("data[\"{}\"]", escape_js_string(field.key));
            let value = member_access("this", field.key);
            if field.ty.is_date() {
                out.push_str(&format!(
                    "        {key} = {value} ? {value}.toISOString() : undefined as any;\n"
                ));
            } else {
                out.push_str(&format!("        {key} = {value};\n"));
            }
        }
        if parent.is_some() {
            out.push_str("        super.toJSON(data);\n");
        }
        out.push_str("        return data;\n    }\n}\n");

        if with_interface {
            let interface_extends = if parents.is_empty() {
                String::new()
            } else {
                format!(
                    " extends {}",
                    parents
                        .iter()
                        .map(|p| format!("I{p}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            };
            out.push_str(&format!("\nexport interface {interface_name}{interface_extends} {{\n"));
            for field in &fields {
                let marker = if field.required { "" } else { "?" };
                out.push_str(&format!(
                    "{INDENT}{}{marker}: {};\n",
                    quote_if_needed(field.key),
                    field.ty.emit()
                ));
            }
            out.push_str("}\n");
        }

        RenderedDto {
            kind: SymbolKind::Dto,
            symbol: RenderedSymbol {
                name: name.to_string(),
                source_text: out,
                references,
                defined_names,
            },
            inline_enums,
        }
    }

    fn render_enum(&self, name: &str, schema: &Schema) -> RenderedDto {
        let values = schema.enum_values.as_deref().unwrap_or_default();
        let all_strings = values
            .iter()
            .all(|v| matches!(v, EnumValue::String(_) | EnumValue::Null));
        let all_integers = values
            .iter()
            .all(|v| matches!(v, EnumValue::Integer(_) | EnumValue::Null));
        if !all_strings && !all_integers {
            return self.render_alias(name, schema);
        }

        let mut out = String::new();
        if let Some(description) = &schema.description {
            out.push_str(&doc_comment(description, ""));
        }
        out.push_str(&format!("export enum {name} {{\n"));
        let mut used: HashSet<String> = HashSet::new();
        for (index, value) in values.iter().enumerate() {
            let (key, literal) = match value {
                EnumValue::String(s) => (enum_member_name(s), format!("\"{}\"", escape_js_string(s))),
                EnumValue::Integer(n) => {
                    let key = schema
                        .enum_names
                        .as_ref()
                        .and_then(|names| names.get(index))
                        .map_or_else(|| integer_member_name(*n), |label| enum_member_name(label.as_str()));
                    (key, n.to_string())
                }
                _ => continue,
            };
            let key = unique_name(key, &mut used);
            out.push_str(&format!("{INDENT}{key} = {literal},\n"));
        }
        out.push_str("}\n");

        RenderedDto {
            kind: SymbolKind::Enum,
            symbol: RenderedSymbol {
                name: name.to_string(),
                source_text: out,
                references: Vec::new(),
                defined_names: Vec::new(),
            },
            inline_enums: Vec::new(),
        }
    }

    fn render_alias(&self, name: &str, schema: &Schema) -> RenderedDto {
        let ty = self.map_type(schema, Usage::Model);
        let mut references = Vec::new();
        ty.collect_references(&mut references);

        let mut out = String::new();
        if let Some(description) = &schema.description {
            out.push_str(&doc_comment(description, ""));
        }
        out.push_str(&format!("export type {name} = {};\n", ty.emit()));

        RenderedDto {
            kind: SymbolKind::Dto,
            symbol: RenderedSymbol {
                name: name.to_string(),
                source_text: out,
                references,
                defined_names: Vec::new(),
            },
            inline_enums: Vec::new(),
        }
    }

    // =========================================================================
    // Clients
    // =========================================================================

    fn operation_model<'o>(&self, op: &'o ClientOperation<'_>) -> OperationModel<'o> {
        let mut used = HashSet::new();
        let mut params = Vec::new();

        for parameter in &op.parameters {
            let location = match parameter.location.as_str() {
                "path" => ParamLocation::Path,
                "query" => ParamLocation::Query,
                "header" => ParamLocation::Header,
                "formData" => ParamLocation::Form,
                "body" => ParamLocation::Body,
                _ => continue,
            };
            let schema = parameter.effective_schema();
            params.push(ParamModel {
                original: parameter.name.clone(),
                ident: unique_name(sanitize_identifier(&parameter.name), &mut used),
                location,
                required: parameter.required || location == ParamLocation::Path,
                ty: self.map_type(&schema, Usage::Input),
            });
        }

        if let Some(request_body) = &op.operation.request_body
            && let Some(schema) = request_body.body_schema()
        {
            match (&schema.properties, request_body.is_multipart()) {
                (Some(properties), true) => {
                    let required = schema.required.clone().unwrap_or_default();
                    for (key, prop) in properties {
                        params.push(ParamModel {
                            original: key.clone(),
                            ident: unique_name(sanitize_identifier(key), &mut used),
                            location: ParamLocation::Form,
                            required: required.contains(key),
                            ty: self.map_type(prop, Usage::Input),
                        });
                    }
                }
                _ => params.push(ParamModel {
                    original: "body".to_string(),
                    ident: unique_name("body".to_string(), &mut used),
                    location: ParamLocation::Body,
                    required: request_body.required,
                    ty: self.map_type(schema, Usage::Input),
                }),
            }
        }
        params.sort_by_key(|p| p.location.rank());

        let mut responses = Vec::new();
        for (code, response) in &op.operation.responses {
            let Ok(status) = code.parse::<u16>() else {
                continue;
            };
            responses.push(ResponseModel {
                status,
                ty: response
                    .body_schema()
                    .map(|schema| self.map_type(schema, Usage::Output)),
            });
        }

        let result = responses
            .iter()
            .filter(|r| r.is_success())
            .find_map(|r| r.ty.clone())
            .unwrap_or(TsType::Primitive(TsPrimitive::Void));

        let mut errors: Vec<TsType> = Vec::new();
        for response in responses.iter().filter(|r| !r.is_success()) {
            if let Some(ty) = &response.ty
                && !errors.contains(ty)
            {
                errors.push(ty.clone());
            }
        }
        let exception = match errors.len() {
            0 => TsType::Primitive(TsPrimitive::String),
            1 => errors.remove(0),
            _ => TsType::Union(errors),
        };

        OperationModel {
            name: op.name.clone(),
            process_name: format!("process{}", FileCase::PascalCase.convert(&op.name)),
            path: op.path,
            method: op.method,
            summary: op
                .operation
                .summary
                .as_deref()
                .or(op.operation.description.as_deref()),
            params,
            is_file_result: result == TsType::named("FileResponse"),
            result,
            responses,
            exception,
        }
    }

    fn client_preamble(&self) -> &'static str {
        match self.settings.template {
            ClientTemplate::Fetch => "",
            ClientTemplate::Axios => {
                "import axios, { AxiosInstance, AxiosRequestConfig, AxiosResponse } from 'axios';\n\n"
            }
            ClientTemplate::Angular => {
                "import { Injectable, Inject, Optional } from '@angular/core';\n\
                 import { HttpClient, HttpHeaders, HttpResponse, HttpResponseBase } from '@angular/common/http';\n\
                 import { Observable, throwError as _observableThrow, of as _observableOf } from 'rxjs';\n\
                 import { mergeMap as _observableMergeMap, catchError as _observableCatch } from 'rxjs/operators';\n\n"
            }
        }
    }

    fn base_url_assignment(&self, argument: &str) -> String {
        let default = escape_js_string(&self.settings.base_url);
        if self.settings.use_get_base_url_method && self.settings.client_base_class.is_some() {
            format!("this.baseUrl = this.getBaseUrl(\"{default}\", {argument});")
        } else {
            format!("this.baseUrl = {argument} ?? \"{default}\";")
        }
    }

    fn client_fields_and_constructor(&self) -> String {
        let super_call = if self.settings.client_base_class.is_some() {
            "        super();\n"
        } else {
            ""
        };
        let base_url = self.base_url_assignment("baseUrl");
        match self.settings.template {
            ClientTemplate::Fetch => format!(
                "    private http: {{ fetch(url: RequestInfo, init?: RequestInit): Promise<Response> }};\n\
                 \x20   private baseUrl: string;\n\
                 \x20   protected jsonParseReviver: ((key: string, value: any) => any) | undefined = undefined;\n\n\
                 \x20   constructor(baseUrl?: string, http?: {{ fetch(url: RequestInfo, init?: RequestInit): Promise<Response> }}) {{\n\
                 {super_call}\
                 \x20       this.http = http ? http : window as any;\n\
                 \x20       {base_url}\n\
                 \x20   }}\n"
            ),
            ClientTemplate::Axios => format!(
                "    private instance: AxiosInstance;\n\
                 \x20   private baseUrl: string;\n\
                 \x20   protected jsonParseReviver: ((key: string, value: any) => any) | undefined = undefined;\n\n\
                 \x20   constructor(baseUrl?: string, instance?: AxiosInstance) {{\n\
                 {super_call}\
                 \x20       this.instance = instance ? instance : axios.create();\n\
                 \x20       {base_url}\n\
                 \x20   }}\n"
            ),
            ClientTemplate::Angular => format!(
                "    private http: HttpClient;\n\
                 \x20   private baseUrl: string;\n\
                 \x20   protected jsonParseReviver: ((key: string, value: any) => any) | undefined = undefined;\n\n\
                 \x20   constructor(@Inject(HttpClient) http: HttpClient, @Optional() @Inject(API_BASE_URL) baseUrl?: string) {{\n\
                 {super_call}\
                 \x20       this.http = http;\n\
                 \x20       {base_url}\n\
                 \x20   }}\n"
            ),
        }
    }

    fn wrap_result(&self, ty: &str) -> String {
        match self.settings.template {
            ClientTemplate::Angular => format!("Observable<{ty}>"),
            ClientTemplate::Fetch | ClientTemplate::Axios => format!("Promise<{ty}>"),
        }
    }

    fn render_method(&self, m: &OperationModel<'_>) -> String {
        let mut out = String::new();
        if let Some(summary) = m.summary {
            out.push_str(&doc_comment(summary, INDENT));
        }
        let return_type = self.wrap_result(&m.result.emit());
        out.push_str(&format!(
            "    {}({}): {return_type} {{\n",
            m.name,
            m.signature()
        ));

        let has_query = m.params.iter().any(|p| p.location == ParamLocation::Query);
        out.push_str(&format!(
            "        let url_ = this.baseUrl + \"{}{}\";\n",
            escape_js_string(m.path),
            if has_query { "?" } else { "" }
        ));
        for p in m.params.iter().filter(|p| p.location == ParamLocation::Path) {
            out.push_str(&format!(
                "        if ({id} === undefined || {id} === null)\n\
                 \x20           throw new Error(\"The parameter '{id}' must be defined.\");\n\
                 \x20       url_ = url_.replace(\"{{{original}}}\", encodeURIComponent(\"\" + {id}));\n",
                id = p.ident,
                original = escape_js_string(&p.original),
            ));
        }
        for p in m.params.iter().filter(|p| p.location == ParamLocation::Query) {
            let append = query_append(p);
            if p.required {
                out.push_str(&format!(
                    "        if ({id} === undefined || {id} === null)\n\
                     \x20           throw new Error(\"The parameter '{id}' must be defined and cannot be null.\");\n\
                     \x20       else\n\
                     \x20           {append}\n",
                    id = p.ident
                ));
            } else {
                out.push_str(&format!(
                    "        if ({id} !== undefined && {id} !== null)\n\
                     \x20           {append}\n",
                    id = p.ident
                ));
            }
        }
        out.push_str("        url_ = url_.replace(/[?&]$/, \"\");\n\n");

        let body = m.params.iter().find(|p| p.location == ParamLocation::Body);
        let form: Vec<&ParamModel> = m
            .params
            .iter()
            .filter(|p| p.location == ParamLocation::Form)
            .collect();
        let has_content = body.is_some() || !form.is_empty();
        if let Some(body) = body {
            out.push_str(&format!("        const content_ = JSON.stringify({});\n\n", body.ident));
        } else if !form.is_empty() {
            out.push_str("        const content_ = new FormData();\n");
            for p in &form {
                let append = form_append(p);
                if p.required {
                    out.push_str(&format!(
                        "        if ({id} === null || {id} === undefined)\n\
                         \x20           throw new Error(\"The parameter '{id}' cannot be null.\");\n\
                         \x20       else\n\
                         \x20           {append}\n",
                        id = p.ident
                    ));
                } else {
                    out.push_str(&format!(
                        "        if ({id} !== null && {id} !== undefined)\n\
                         \x20           {append}\n",
                        id = p.ident
                    ));
                }
            }
            out.push('\n');
        }

        let mut headers = Vec::new();
        if body.is_some() {
            headers.push("\"Content-Type\": \"application/json\"".to_string());
        }
        for p in m.params.iter().filter(|p| p.location == ParamLocation::Header) {
            headers.push(format!(
                "\"{}\": {id} !== undefined && {id} !== null ? \"\" + {id} : \"\"",
                escape_js_string(&p.original),
                id = p.ident
            ));
        }
        if m.is_file_result {
            headers.push("\"Accept\": \"application/octet-stream\"".to_string());
        } else if m.result != TsType::Primitive(TsPrimitive::Void) {
            headers.push("\"Accept\": \"application/json\"".to_string());
        }

        out.push_str(&self.dispatch(m, has_content, &headers));
        out.push_str("    }\n");
        out
    }

    fn dispatch(&self, m: &OperationModel<'_>, has_content: bool, headers: &[String]) -> String {
        let process = &m.process_name;
        let mut options = Vec::new();
        match self.settings.template {
            ClientTemplate::Fetch => {
                if has_content {
                    options.push("body: content_".to_string());
                }
                options.push(format!("method: \"{}\"", m.method.as_upper()));
                if !headers.is_empty() {
                    options.push(format!("headers: {}", object_literal(headers, 3)));
                }
                format!(
                    "        let options_: RequestInit = {};\n\n\
                     \x20       return this.http.fetch(url_, options_).then((_response: Response) => {{\n\
                     \x20           return this.{process}(_response);\n\
                     \x20       }});\n",
                    object_literal(&options, 2)
                )
            }
            ClientTemplate::Axios => {
                if has_content {
                    options.push("data: content_".to_string());
                }
                if m.is_file_result {
                    options.push("responseType: \"blob\"".to_string());
                }
                options.push(format!("method: \"{}\"", m.method.as_upper()));
                options.push("url: url_".to_string());
                if !headers.is_empty() {
                    options.push(format!("headers: {}", object_literal(headers, 3)));
                }
                format!(
                    "        let options_: AxiosRequestConfig = {};\n\n\
                     \x20       return this.instance.request(options_).catch((_error: any) => {{\n\
                     \x20           if (isAxiosError(_error) && _error.response) {{\n\
                     \x20               return _error.response;\n\
                     \x20           }} else {{\n\
                     \x20               throw _error;\n\
                     \x20           }}\n\
                     \x20       }}).then((_response: AxiosResponse) => {{\n\
                     \x20           return this.{process}(_response);\n\
                     \x20       }});\n",
                    object_literal(&options, 2)
                )
            }
            ClientTemplate::Angular => {
                if has_content {
                    options.push("body: content_".to_string());
                }
                options.push("observe: \"response\"".to_string());
                options.push("responseType: \"blob\"".to_string());
                if !headers.is_empty() {
                    options.push(format!(
                        "headers: new HttpHeaders({})",
                        object_literal(headers, 3)
                    ));
                }
                let result = format!("Observable<{}>", m.result.emit());
                format!(
                    "        let options_: any = {};\n\n\
                     \x20       return this.http.request(\"{method}\", url_, options_).pipe(_observableMergeMap((response_: any) => {{\n\
                     \x20           return this.{process}(response_);\n\
                     \x20       }})).pipe(_observableCatch((response_: any) => {{\n\
                     \x20           if (response_ instanceof HttpResponseBase) {{\n\
                     \x20               try {{\n\
                     \x20                   return this.{process}(response_ as any);\n\
                     \x20               }} catch (e) {{\n\
                     \x20                   return _observableThrow(e) as any as {result};\n\
                     \x20               }}\n\
                     \x20           }} else\n\
                     \x20               return _observableThrow(response_) as any as {result};\n\
                     \x20       }}));\n",
                    object_literal(&options, 2),
                    method = m.method.as_str(),
                )
            }
        }
    }

    fn render_processor(&self, m: &OperationModel<'_>) -> String {
        let result = m.result.emit();
        let response_type = match self.settings.template {
            ClientTemplate::Fetch => "Response",
            ClientTemplate::Axios => "AxiosResponse",
            ClientTemplate::Angular => "HttpResponseBase",
        };
        let mut out = format!(
            "    protected {}(response: {response_type}): {} {{\n        const status = response.status;\n",
            m.process_name,
            self.wrap_result(&result)
        );
        out.push_str(match self.settings.template {
            ClientTemplate::Fetch => {
                "        let _headers: any = {}; if (response.headers && response.headers.forEach) { response.headers.forEach((v: any, k: any) => _headers[k] = v); };\n"
            }
            ClientTemplate::Axios => {
                "        let _headers: any = {};\n\
                 \x20       if (response.headers && typeof response.headers === \"object\") {\n\
                 \x20           for (const k in response.headers) {\n\
                 \x20               if (response.headers.hasOwnProperty(k)) {\n\
                 \x20                   _headers[k] = response.headers[k];\n\
                 \x20               }\n\
                 \x20           }\n\
                 \x20       }\n"
            }
            ClientTemplate::Angular => {
                "        const responseBlob =\n\
                 \x20           response instanceof HttpResponse ? response.body :\n\
                 \x20           (response as any).error instanceof Blob ? (response as any).error : undefined;\n\n\
                 \x20       let _headers: any = {}; if (response.headers) { for (let key of response.headers.keys()) { _headers[key] = response.headers.get(key); }}\n"
            }
        });

        for (i, response) in m.responses.iter().enumerate() {
            let keyword = if i == 0 { "        if" } else { "        } else if" };
            out.push_str(&format!("{keyword} (status === {}) {{\n", response.status));
            let lines = if response.is_success() && m.is_file_result {
                return_lines(&self.file_result_lines())
            } else if response.is_success() {
                match &response.ty {
                    Some(ty) => self.read_text(&[
                        format!("let result{}: any = null;", response.status),
                        format!("result{} = {};", response.status, self.parse_expr(ty)),
                        self.resolve(&result, &format!("result{}", response.status)),
                    ]),
                    None => self.read_text(&[self.resolve(&result, "null as any")]),
                }
            } else {
                match &response.ty {
                    Some(ty) => self.read_text(&[
                        format!("let result{}: any = null;", response.status),
                        format!("result{} = {};", response.status, self.parse_expr(ty)),
                        format!(
                            "return throwException(\"A server side error occurred.\", status, _responseText, _headers, result{});",
                            response.status
                        ),
                    ]),
                    None => self.read_text(&[
                        "return throwException(\"A server side error occurred.\", status, _responseText, _headers);"
                            .to_string(),
                    ]),
                }
            };
            out.push_str(&lines);
        }

        let keyword = if m.responses.is_empty() { "        if" } else { "        } else if" };
        out.push_str(&format!("{keyword} (status !== 200 && status !== 204) {{\n"));
        out.push_str(&self.read_text(&[
            "return throwException(\"An unexpected server error occurred.\", status, _responseText, _headers);"
                .to_string(),
        ]));
        out.push_str("        }\n");
        let fallback = match self.settings.template {
            ClientTemplate::Fetch => format!("return Promise.resolve<{result}>(null as any);"),
            ClientTemplate::Axios | ClientTemplate::Angular => self.resolve(&result, "null as any"),
        };
        out.push_str(&format!("        {fallback}\n    }}\n"));
        out
    }

    fn file_result_lines(&self) -> Vec<String> {
        let (disposition, finish) = match self.settings.template {
            ClientTemplate::Fetch => (
                "response.headers ? response.headers.get(\"content-disposition\") : undefined",
                "return response.blob().then(blob => { return { fileName: fileName, data: blob, status: status, headers: _headers }; });",
            ),
            ClientTemplate::Axios => (
                "response.headers ? response.headers[\"content-disposition\"] : undefined",
                "return Promise.resolve({ fileName: fileName, status: status, data: new Blob([response.data], { type: response.headers[\"content-type\"] }), headers: _headers });",
            ),
            ClientTemplate::Angular => (
                "response.headers ? response.headers.get(\"content-disposition\") : undefined",
                "return _observableOf({ fileName: fileName, data: responseBlob as any, status: status, headers: _headers });",
            ),
        };
        vec![
            format!("const contentDisposition = {disposition};"),
            r#"let fileNameMatch = contentDisposition ? /filename="?([^";]*)"?/g.exec(contentDisposition) : undefined;"#
                .to_string(),
            "let fileName = fileNameMatch && fileNameMatch.length > 1 ? fileNameMatch[1] : undefined;"
                .to_string(),
            finish.to_string(),
        ]
    }

    fn read_text(&self, lines: &[String]) -> String {
        let body = return_lines(lines);
        match self.settings.template {
            ClientTemplate::Fetch => format!(
                "{BODY_INDENT}return response.text().then((_responseText) => {{\n{body}{BODY_INDENT}}});\n"
            ),
            ClientTemplate::Axios => {
                format!("{BODY_INDENT}const _responseText = response.data;\n{body}")
            }
            ClientTemplate::Angular => format!(
                "{BODY_INDENT}return blobToText(responseBlob).pipe(_observableMergeMap((_responseText: string) => {{\n{body}{BODY_INDENT}}}));\n"
            ),
        }
    }

    fn parse_expr(&self, ty: &TsType) -> String {
        match self.settings.template {
            ClientTemplate::Axios => "_responseText".to_string(),
            ClientTemplate::Fetch | ClientTemplate::Angular => format!(
                "_responseText === \"\" ? null : JSON.parse(_responseText, this.jsonParseReviver) as {}",
                ty.emit()
            ),
        }
    }

    fn resolve(&self, result: &str, expr: &str) -> String {
        match self.settings.template {
            ClientTemplate::Fetch => format!("return {expr};"),
            ClientTemplate::Axios => format!("return Promise.resolve<{result}>({expr});"),
            ClientTemplate::Angular => format!("return _observableOf({expr});"),
        }
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    fn base_class_source(&self) -> Option<String> {
        let base = self.settings.client_base_class.as_deref()?;
        let body = if self.settings.use_get_base_url_method {
            "    protected getBaseUrl(defaultUrl: string, baseUrl?: string) {\n\
             \x20       return baseUrl !== undefined && baseUrl !== null ? baseUrl : defaultUrl;\n\
             \x20   }\n"
        } else {
            ""
        };
        Some(format!("export class {base} {{\n{body}}}\n"))
    }
}

impl SymbolRenderer for TypeScriptRenderer {
    fn render_dto(&self, name: &str, schema: &Schema, names: &mut TypeNames) -> Result<RenderedDto> {
        if schema.is_enum() && schema.ref_path.is_none() {
            return Ok(self.render_enum(name, schema));
        }
        if schema.is_object_like() {
            return Ok(self.render_class(name, schema, names));
        }
        Ok(self.render_alias(name, schema))
    }

    fn render_client(&self, group: &OperationGroup<'_>) -> Result<RenderedSymbol> {
        let mut references = Vec::new();
        let mut out = String::from(self.client_preamble());

        let extends = self
            .settings
            .client_base_class
            .as_ref()
            .map(|base| format!(" extends {base}"))
            .unwrap_or_default();
        if self.settings.template == ClientTemplate::Angular {
            out.push_str("@Injectable()\n");
        }
        out.push_str(&format!("export class {}{extends} {{\n", group.class_name));
        out.push_str(&self.client_fields_and_constructor());

        for operation in &group.operations {
            let model = self.operation_model(operation);
            model.collect_references(&mut references);
            out.push('\n');
            out.push_str(&self.render_method(&model));
            out.push('\n');
            out.push_str(&self.render_processor(&model));
        }
        out.push_str("}\n");

        Ok(RenderedSymbol {
            name: group.class_name.clone(),
            source_text: out,
            references,
            defined_names: Vec::new(),
        })
    }

    fn render_utilities(&self) -> Result<String> {
        let template = self.settings.template;
        let mut out = String::new();

        match template {
            ClientTemplate::Angular => {
                out.push_str("import { InjectionToken } from '@angular/core';\n");
                out.push_str(
                    "import { Observable, throwError as _observableThrow, of as _observableOf } from 'rxjs';\n\n",
                );
                out.push_str(
                    "export const API_BASE_URL = new InjectionToken<string>('API_BASE_URL');\n\n",
                );
            }
            ClientTemplate::Axios => out.push_str("import { AxiosError } from 'axios';\n\n"),
            ClientTemplate::Fetch => {}
        }

        if let Some(base) = self.base_class_source() {
            out.push_str(&base);
            out.push('\n');
        }

        out.push_str(
            "export interface FileParameter {\n\
             \x20   data: any;\n\
             \x20   fileName: string;\n\
             }\n\n\
             export interface FileResponse {\n\
             \x20   data: Blob;\n\
             \x20   status: number;\n\
             \x20   fileName?: string;\n\
             \x20   headers?: { [name: string]: any };\n\
             }\n\n\n\
             export class SwaggerException extends Error {\n\
             \x20   override message: string;\n\
             \x20   status: number;\n\
             \x20   response: string;\n\
             \x20   headers: { [key: string]: any; };\n\
             \x20   result: any;\n\n\
             \x20   constructor(message: string, status: number, response: string, headers: { [key: string]: any; }, result: any) {\n\
             \x20       super();\n\n\
             \x20       this.message = message;\n\
             \x20       this.status = status;\n\
             \x20       this.response = response;\n\
             \x20       this.headers = headers;\n\
             \x20       this.result = result;\n\
             \x20   }\n\n\
             \x20   protected isSwaggerException = true;\n\n\
             \x20   static isSwaggerException(obj: any): obj is SwaggerException {\n\
             \x20       return obj.isSwaggerException === true;\n\
             \x20   }\n\
             }\n\n",
        );

        match template {
            ClientTemplate::Angular => out.push_str(
                "function throwException(message: string, status: number, response: string, headers: { [key: string]: any; }, result?: any): Observable<any> {\n\
                 \x20   if (result !== null && result !== undefined)\n\
                 \x20       return _observableThrow(result);\n\
                 \x20   else\n\
                 \x20       return _observableThrow(new SwaggerException(message, status, response, headers, null));\n\
                 }\n\n\
                 function blobToText(blob: any): Observable<string> {\n\
                 \x20   return new Observable<string>((observer: any) => {\n\
                 \x20       if (!blob) {\n\
                 \x20           observer.next(\"\");\n\
                 \x20           observer.complete();\n\
                 \x20       } else {\n\
                 \x20           let reader = new FileReader();\n\
                 \x20           reader.onload = event => {\n\
                 \x20               observer.next((event.target as any).result);\n\
                 \x20               observer.complete();\n\
                 \x20           };\n\
                 \x20           reader.readAsText(blob);\n\
                 \x20       }\n\
                 \x20   });\n\
                 }\n",
            ),
            ClientTemplate::Fetch | ClientTemplate::Axios => out.push_str(
                "function throwException(message: string, status: number, response: string, headers: { [key: string]: any; }, result?: any): any {\n\
                 \x20   if (result !== null && result !== undefined)\n\
                 \x20       throw result;\n\
                 \x20   else\n\
                 \x20       throw new SwaggerException(message, status, response, headers, null);\n\
                 }\n",
            ),
        }

        if template == ClientTemplate::Axios {
            out.push_str(
                "\n\n\nfunction isAxiosError(obj: any | undefined): obj is AxiosError {\n\
                 \x20   return obj && obj.isAxiosError === true;\n\
                 }\n",
            );
        }
        Ok(out)
    }

    fn utility_baseline(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(base) = &self.settings.client_base_class {
            names.push(base.clone());
        }
        match self.settings.template {
            ClientTemplate::Axios => names.push("isAxiosError".to_string()),
            ClientTemplate::Angular => {
                names.push("blobToText".to_string());
                names.push("API_BASE_URL".to_string());
            }
            ClientTemplate::Fetch => {}
        }
        names.push("throwException".to_string());
        names
    }

    fn utility_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.settings.client_base_class.iter().cloned().collect();
        names.extend(["isAxiosError".to_string(), "API_BASE_URL".to_string()]);
        names
    }
}

// =============================================================================
// Operation model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamLocation {
    Path,
    Body,
    Query,
    Header,
    Form,
}

impl ParamLocation {
    fn rank(self) -> u8 {
        match self {
            Self::Path => 0,
            Self::Body => 1,
            Self::Query => 2,
            Self::Header => 3,
            Self::Form => 4,
        }
    }
}

#[derive(Debug, Clone)]
struct ParamModel {
    original: String,
    ident: String,
    location: ParamLocation,
    required: bool,
    ty: TsType,
}

impl ParamModel {
    fn declared_type(&self) -> TsType {
        if self.required {
            self.ty.clone()
        } else {
            self.ty.clone().optional()
        }
    }
}

#[derive(Debug, Clone)]
struct ResponseModel {
    status: u16,
    ty: Option<TsType>,
}

impl ResponseModel {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug)]
struct OperationModel<'o> {
    name: String,
    process_name: String,
    path: &'o str,
    method: HttpMethod,
    summary: Option<&'o str>,
    params: Vec<ParamModel>,
    result: TsType,
    is_file_result: bool,
    responses: Vec<ResponseModel>,
    exception: TsType,
}

impl OperationModel<'_> {
    /// Trailing optional parameters get `?`, earlier ones keep `| undefined` only.
    fn signature(&self) -> String {
        let first_trailing_optional = self
            .params
            .iter()
            .rposition(|p| p.required)
            .map_or(0, |i| i + 1);
        self.params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let marker = if i >= first_trailing_optional { "?" } else { "" };
                format!("{}{marker}: {}", p.ident, p.declared_type().emit())
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn collect_references(&self, references: &mut Vec<TypeReference>) {
        for param in &self.params {
            param.declared_type().collect_references(references);
        }
        self.result.collect_references(references);
        self.exception.collect_references(references);
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug)]
struct Field<'s> {
    key: &'s str,
    ty: TsType,
    required: bool,
    description: Option<&'s str>,
}

fn binary_type(usage: Usage) -> TsType {
    match usage {
        Usage::Input => TsType::named("FileParameter"),
        Usage::Output => TsType::named("FileResponse"),
        Usage::Model => TsType::any(),
    }
}

fn enum_literal(value: &EnumValue) -> Option<TsLiteral> {
    match value {
        EnumValue::String(s) => Some(TsLiteral::String(s.clone())),
        EnumValue::Integer(n) => Some(TsLiteral::Int(*n)),
        EnumValue::Float(f) => Some(TsLiteral::Number(*f)),
        EnumValue::Bool(b) => Some(TsLiteral::Bool(*b)),
        EnumValue::Null => None,
    }
}

fn integer_member_name(n: i64) -> String {
    if n < 0 {
        format!("_Minus{}", n.unsigned_abs())
    } else {
        format!("_{n}")
    }
}

/// Walk `allOf` chains: referenced parts are parents, inline parts contribute members.
fn collect_members<'s>(
    schema: &'s Schema,
    parents: &mut Vec<&'s str>,
    members: &mut Vec<(&'s str, &'s Schema)>,
    required: &mut HashSet<&'s str>,
) {
    if let Some(all_of) = &schema.all_of {
        for part in all_of {
            match part.ref_name() {
                Some(parent) => {
                    if !parents.contains(&parent) {
                        parents.push(parent);
                    }
                }
                None => collect_members(part, parents, members, required),
            }
        }
    }
    if let Some(properties) = &schema.properties {
        for (key, prop) in properties {
            if !members.iter().any(|(k, _)| k == key) {
                members.push((key.as_str(), prop));
            }
        }
    }
    if let Some(names) = &schema.required {
        required.extend(names.iter().map(String::as_str));
    }
}

/// An anonymous enum on a property (or on its array items) becomes a named sibling enum.
///
/// The enum is named after the property, qualified by its owner when that
/// name is already taken anywhere in the model namespace.
fn inline_enum_for(
    owner: &str,
    key: &str,
    prop: &Schema,
    names: &mut TypeNames,
) -> Option<(String, Schema, TsType)> {
    let (enum_schema, is_array) = if prop.ref_path.is_none() && prop.is_enum() {
        (prop, false)
    } else if prop.primary_type() == Some("array")
        && let Some(items) = prop.items.as_deref()
        && items.ref_path.is_none()
        && items.is_enum()
    {
        (items, true)
    } else {
        return None;
    };

    let base = enum_member_name(key);
    let name = names.claim_first_free(&base, &format!("{owner}{base}"));

    let mut ty = TsType::named(name.as_str());
    if is_array {
        ty = TsType::Array(Box::new(ty));
    }
    if prop.is_nullable() {
        ty = ty.nullable();
    }
    Some((name, enum_schema.clone(), ty))
}

fn unique_name(candidate: String, used: &mut HashSet<String>) -> String {
    let mut name = candidate.clone();
    let mut counter = 2;
    while used.contains(&name) {
        name = format!("{candidate}{counter}");
        counter += 1;
    }
    used.insert(name.clone());
    name
}

fn doc_comment(text: &str, indent: &str) -> String {
    let mut out = format!("{indent}/**\n");
    for line in text.trim().lines() {
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            out.push_str(&format!("{indent} *\n"));
        } else {
            out.push_str(&format!("{indent} * {line}\n"));
        }
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// `{ a, b }` spread over lines at the given indentation depth.
fn object_literal(entries: &[String], depth: usize) -> String {
    let inner = INDENT.repeat(depth + 1);
    let outer = INDENT.repeat(depth);
    let body = entries
        .iter()
        .map(|e| format!("{inner}{e}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n{outer}}}")
}

fn return_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("{BODY_INDENT}{line}\n"))
        .collect()
}

fn query_append(p: &ParamModel) -> String {
    let original = escape_js_string(&p.original);
    let id = &p.ident;
    let is_array = matches!(&p.ty, TsType::Array(_))
        || matches!(&p.ty, TsType::Union(types) if types.iter().any(|t| matches!(t, TsType::Array(_))));
    if is_array {
        format!(
            "{id} && {id}.forEach(item => {{ url_ += \"{original}=\" + encodeURIComponent(\"\" + item) + \"&\"; }});"
        )
    } else if p.ty.is_date() {
        format!(
            "url_ += \"{original}=\" + encodeURIComponent({id} ? \"\" + {id}.toISOString() : \"\") + \"&\";"
        )
    } else {
        format!("url_ += \"{original}=\" + encodeURIComponent(\"\" + {id}) + \"&\";")
    }
}

fn form_append(p: &ParamModel) -> String {
    let original = escape_js_string(&p.original);
    let id = &p.ident;
    if p.ty == TsType::named("FileParameter")
        || matches!(&p.ty, TsType::Union(types) if types.contains(&TsType::named("FileParameter")))
    {
        format!("content_.append(\"{original}\", {id}.data, {id}.fileName ? {id}.fileName : \"{original}\");")
    } else {
        format!("content_.append(\"{original}\", {id}.toString());")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::OperationGenerationMode;
    use crate::extract::SymbolExtractor;
    use crate::openapi::OpenApiDocument;

    fn schema(json: &str) -> Schema {
        serde_json::from_str(json).unwrap()
    }

    fn raw_refs(symbol: &RenderedSymbol) -> Vec<&str> {
        symbol.references.iter().map(|r| r.raw.as_str()).collect()
    }

    #[test]
    fn test_render_class_with_inline_enum() {
        let renderer = TypeScriptRenderer::default();
        let person = schema(
            r##"{
              "type": "object",
              "required": ["name"],
              "properties": {
                "name": { "type": "string" },
                "address": { "$ref": "#/definitions/AddressDto" },
                "status": { "type": "string", "enum": ["active", "archived"] },
                "born": { "type": "string", "format": "date-time" }
              }
            }"##,
        );
        let mut names = TypeNames::new(["PersonDto", "AddressDto"]);
        let rendered = renderer.render_dto("PersonDto", &person, &mut names).unwrap();
        let text = &rendered.symbol.source_text;

        assert_eq!(rendered.kind, SymbolKind::Dto);
        assert!(text.contains("export class PersonDto implements IPersonDto {"));
        assert!(text.contains("    name!: string;"));
        assert!(text.contains("    address?: AddressDto | undefined;"));
        assert!(text.contains("    status?: Status | undefined;"));
        assert!(text.contains("new Date(_data[\"born\"].toString())"));
        assert!(text.contains("export interface IPersonDto {"));

        assert_eq!(rendered.inline_enums.len(), 1);
        assert_eq!(rendered.inline_enums[0].name, "Status");
        assert!(rendered.symbol.defined_names.contains(&"Status".to_string()));
        assert!(raw_refs(&rendered.symbol).contains(&"AddressDto"));
    }

    #[test]
    fn test_inline_enum_name_avoids_owner() {
        let renderer = TypeScriptRenderer::default();
        let status = schema(
            r#"{ "properties": { "status": { "type": "integer", "enum": [0, 1] } } }"#,
        );
        let rendered = renderer
            .render_dto("Status", &status, &mut TypeNames::new(["Status"]))
            .unwrap();
        assert_eq!(rendered.inline_enums[0].name, "StatusStatus");
    }

    #[test]
    fn test_inline_enum_names_are_unique_across_definitions() {
        let renderer = TypeScriptRenderer::default();
        let with_status = schema(
            r#"{ "type": "object", "properties": { "status": { "type": "string", "enum": ["open", "closed"] } } }"#,
        );
        let mut names = TypeNames::new(["OrderDto", "PersonDto", "Status"]);

        let order = renderer.render_dto("OrderDto", &with_status, &mut names).unwrap();
        let person = renderer.render_dto("PersonDto", &with_status, &mut names).unwrap();
        assert_eq!(order.inline_enums[0].name, "OrderDtoStatus");
        assert_eq!(person.inline_enums[0].name, "PersonDtoStatus");
        assert!(person.symbol.source_text.contains("    status?: PersonDtoStatus | undefined;"));

        let mut names = TypeNames::new(["OrderDto", "PersonDto"]);
        let order = renderer.render_dto("OrderDto", &with_status, &mut names).unwrap();
        let person = renderer.render_dto("PersonDto", &with_status, &mut names).unwrap();
        assert_eq!(order.inline_enums[0].name, "Status");
        assert_eq!(person.inline_enums[0].name, "PersonDtoStatus");
    }

    #[test]
    fn test_render_class_with_parent() {
        let renderer = TypeScriptRenderer::default();
        let tag = schema(
            r##"{
              "allOf": [
                { "$ref": "#/components/schemas/TagBasicDto" },
                { "type": "object", "properties": { "color": { "type": "string" } } }
              ]
            }"##,
        );
        let rendered = renderer
            .render_dto("TagDto", &tag, &mut TypeNames::default())
            .unwrap();
        let text = &rendered.symbol.source_text;
        assert!(text.contains("export class TagDto extends TagBasicDto implements ITagDto {"));
        assert!(text.contains("        super(data);"));
        assert!(text.contains("        super.toJSON(data);"));
        assert!(text.contains("export interface ITagDto extends ITagBasicDto {"));
        assert_eq!(
            rendered.symbol.references[0],
            TypeReference::new("TagBasicDto").with_companion("ITagBasicDto")
        );
    }

    #[test]
    fn test_render_enums() {
        let renderer = TypeScriptRenderer::default();
        let rendered = renderer
            .render_dto(
                "Priority",
                &schema(r#"{ "type": "integer", "enum": [0, 1, -1], "x-enumNames": ["Low", "High"] }"#),
                &mut TypeNames::default(),
            )
            .unwrap();
        assert_eq!(rendered.kind, SymbolKind::Enum);
        assert_eq!(
            rendered.symbol.source_text,
            "export enum Priority {\n    Low = 0,\n    High = 1,\n    _Minus1 = -1,\n}\n"
        );

        let rendered = renderer
            .render_dto("Mixed", &schema(r#"{ "enum": ["a", 1] }"#), &mut TypeNames::default())
            .unwrap();
        assert_eq!(rendered.symbol.source_text, "export type Mixed = \"a\" | 1;\n");
    }

    #[test]
    fn test_render_alias_and_dictionary() {
        let renderer = TypeScriptRenderer::default();
        let rendered = renderer
            .render_dto(
                "Lookup",
                &schema(r##"{ "type": "object", "additionalProperties": { "$ref": "#/definitions/Item" } }"##),
                &mut TypeNames::default(),
            )
            .unwrap();
        assert_eq!(
            rendered.symbol.source_text,
            "export type Lookup = { [key: string]: Item; };\n"
        );
        assert_eq!(raw_refs(&rendered.symbol), vec!["{ [key: string]: Item; }", "Item"]);
    }

    const CLIENT_DOC: &str = r##"{
      "openapi": "3.0.1",
      "paths": {
        "/items/{id}": {
          "get": {
            "tags": ["Items"],
            "operationId": "Items_GetAsync",
            "summary": "Fetch one item",
            "parameters": [
              { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
              { "name": "expand", "in": "query", "schema": { "type": "array", "items": { "type": "string" } } }
            ],
            "responses": {
              "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ItemDto" } } } },
              "404": { "description": "Missing", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ProblemDetails" } } } }
            }
          }
        },
        "/items/{id}/file": {
          "get": {
            "tags": ["Items"],
            "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }],
            "responses": {
              "200": { "description": "OK", "content": { "application/octet-stream": { "schema": { "type": "string", "format": "binary" } } } }
            }
          }
        }
      }
    }"##;

    fn client_for(settings: TypeScriptSettings) -> RenderedSymbol {
        let mut document = OpenApiDocument::from_json(CLIENT_DOC).unwrap();
        document.ensure_operation_ids();
        let config = GeneratorConfig::default()
            .with_operation_generation_mode(OperationGenerationMode::MultipleClientsFromOperationId);
        let renderer = TypeScriptRenderer::new(settings);
        let extractor = SymbolExtractor::new(&document, &renderer, &config);
        let groups = extractor.operation_groups();
        assert_eq!(groups.len(), 1);
        renderer.render_client(&groups[0]).unwrap()
    }

    #[test]
    fn test_render_fetch_client() {
        let client = client_for(TypeScriptSettings {
            base_url: "https://api.example.com".to_string(),
            ..TypeScriptSettings::default()
        });
        let text = &client.source_text;

        assert_eq!(client.name, "ItemsClient");
        assert!(text.contains("export class ItemsClient {"));
        assert!(text.contains("this.baseUrl = baseUrl ?? \"https://api.example.com\";"));
        assert!(text.contains("     * Fetch one item\n"));
        assert!(text.contains("getByPath(id: number, expand?: string[] | undefined): Promise<ItemDto> {"));
        assert!(text.contains("url_ = url_.replace(\"{id}\", encodeURIComponent(\"\" + id));"));
        assert!(text.contains("expand && expand.forEach(item =>"));
        assert!(text.contains("protected processGetByPath(response: Response): Promise<ItemDto> {"));
        assert!(text.contains("return throwException(\"A server side error occurred.\", status, _responseText, _headers, result404);"));
        assert!(text.contains("\"Accept\": \"application/octet-stream\""));

        let refs = raw_refs(&client);
        assert!(refs.contains(&"ItemDto"));
        assert!(refs.contains(&"ProblemDetails"));
        assert!(refs.contains(&"FileResponse"));
    }

    #[test]
    fn test_render_axios_and_angular_clients() {
        let axios = client_for(TypeScriptSettings {
            template: ClientTemplate::Axios,
            client_base_class: Some("ServiceBase".to_string()),
            use_get_base_url_method: true,
            ..TypeScriptSettings::default()
        });
        assert!(axios.source_text.starts_with("import axios, {"));
        assert!(axios.source_text.contains("export class ItemsClient extends ServiceBase {"));
        assert!(axios.source_text.contains("this.baseUrl = this.getBaseUrl(\"\", baseUrl);"));
        assert!(axios.source_text.contains("isAxiosError(_error)"));

        let angular = client_for(TypeScriptSettings {
            template: ClientTemplate::Angular,
            ..TypeScriptSettings::default()
        });
        assert!(angular.source_text.contains("@Injectable()\nexport class ItemsClient {"));
        assert!(angular.source_text.contains("): Observable<ItemDto> {"));
        assert!(angular.source_text.contains("blobToText(responseBlob)"));
    }

    #[test]
    fn test_utilities_and_baseline() {
        let fetch = TypeScriptRenderer::default();
        let text = fetch.render_utilities().unwrap();
        assert!(text.contains("\nfunction throwException("));
        assert!(text.contains("export class SwaggerException extends Error {"));
        assert!(!text.contains("blobToText"));
        assert_eq!(fetch.utility_baseline(), vec!["throwException"]);

        let angular = TypeScriptRenderer::new(TypeScriptSettings {
            template: ClientTemplate::Angular,
            client_base_class: Some("ApiBase".to_string()),
            use_get_base_url_method: true,
            ..TypeScriptSettings::default()
        });
        let text = angular.render_utilities().unwrap();
        assert!(text.contains("export const API_BASE_URL"));
        assert!(text.contains("export class ApiBase {\n    protected getBaseUrl("));
        assert!(text.contains("function blobToText(blob: any): Observable<string> {"));
        assert_eq!(
            angular.utility_baseline(),
            vec!["ApiBase", "blobToText", "API_BASE_URL", "throwException"]
        );

        let axios = TypeScriptRenderer::new(TypeScriptSettings {
            template: ClientTemplate::Axios,
            ..TypeScriptSettings::default()
        });
        assert!(axios.render_utilities().unwrap().contains("function isAxiosError("));
        assert_eq!(axios.utility_baseline(), vec!["isAxiosError", "throwException"]);
    }
}
