//! nsplit: split generated OpenAPI TypeScript clients into one module per symbol.
//!
//! A run walks an OpenAPI document, renders every schema definition and
//! client class through a [`SymbolRenderer`], computes each module's import
//! header and synchronizes the output directory: unchanged files are left
//! alone, stale ones removed and the index barrel rewritten.
//!
//! ```ignore
//! use nsplit_core::{FileCase, GeneratorConfig, Generator, OpenApiDocument};
//!
//! let document = OpenApiDocument::from_json(&json)?;
//! let config = GeneratorConfig::new("src/api")
//!     .with_dto_dir("Dto")
//!     .with_file_case(FileCase::KebabCase);
//! let report = Generator::new(document, config)?.run()?;
//! println!("{} files written", report.sync.written.len());
//! ```

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod imports;
pub mod naming;
pub mod openapi;
pub mod pipeline;
pub mod render;
pub mod symbol;
pub mod sync;

pub use classify::{ClassifiedName, TypeClass, TypeClassifier};
pub use config::{
    ClientTemplate, DocumentSource, GeneratorConfig, INDEX_NAME, LoadedSettings,
    OperationGenerationMode, UTILITIES_NAME, discover_settings, load_settings,
};
pub use error::{Error, Result};
pub use extract::{ClientOperation, OperationGroup, SymbolExtractor};
pub use imports::{ImportHeaderBuilder, ImportPlan, ModuleImport};
pub use naming::FileCase;
pub use openapi::OpenApiDocument;
pub use pipeline::{GenerationReport, Generator};
pub use render::{
    RenderedDto, RenderedSymbol, SymbolRenderer, TypeNames, TypeScriptRenderer, TypeScriptSettings,
};
pub use symbol::{Symbol, SymbolKind, TypeReference};
pub use sync::{DirectorySynchronizer, ModuleFile, SyncReport};
