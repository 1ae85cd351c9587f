//! OpenAPI document model.
//!
//! Only the parts the generator reads are modelled; unknown fields are ignored.

mod document;

pub use document::{
    AdditionalProperties, Components, EnumValue, HttpMethod, Info, MediaType, OpenApiDocument,
    Operation, Parameter, PathItem, PathOperation, RequestBody, Response, Schema, SchemaType,
    Server, ref_name,
};
