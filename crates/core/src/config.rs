//! Generator configuration and NSwag settings files.
//!
//! A `GeneratorConfig` is either built in code or read from the
//! `codeGenerators.openApiToTypeScriptClient` section of a `*.nswag` file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::naming::FileCase;

/// Base name of the shared utilities module.
pub const UTILITIES_NAME: &str = "Utilities";

/// Base name of the barrel module in each output directory.
pub const INDEX_NAME: &str = "index";

/// Client flavour emitted by the TypeScript renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ClientTemplate {
    #[default]
    #[serde(alias = "fetch")]
    Fetch,
    #[serde(alias = "axios")]
    Axios,
    #[serde(alias = "angular")]
    Angular,
}

impl FromStr for ClientTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fetch" => Ok(Self::Fetch),
            "axios" => Ok(Self::Axios),
            "angular" => Ok(Self::Angular),
            other => Err(Error::Config(format!(
                "Unsupported template `{other}`, expected Fetch, Axios or Angular"
            ))),
        }
    }
}

/// How operations are grouped into client classes and named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum OperationGenerationMode {
    #[default]
    #[serde(alias = "MultipleClientsFromFirstTagAndPathSegments")]
    MultipleClientsFromPathSegments,
    #[serde(alias = "MultipleClientsFromFirstTagAndOperationId")]
    MultipleClientsFromOperationId,
    SingleClientFromOperationId,
}

/// Everything one generation run needs besides the document itself.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    /// Subdirectory of `output_dir` for DTO files; empty keeps them next to the clients.
    pub dto_dir: String,
    pub file_case: FileCase,
    pub template: ClientTemplate,
    /// Client class name template, `{controller}` is replaced by the group name.
    pub class_name: String,
    pub client_base_class: Option<String>,
    pub use_get_base_url_method: bool,
    pub generate_dto_types: bool,
    pub generate_constructor_interface: bool,
    /// Types provided elsewhere: never generated, never imported.
    pub excluded_type_names: Vec<String>,
    /// Parameters left out of generated client method signatures.
    pub excluded_parameter_names: Vec<String>,
    pub operation_generation_mode: OperationGenerationMode,
    /// File extension of generated modules, without the dot.
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            dto_dir: String::new(),
            file_case: FileCase::Identity,
            template: ClientTemplate::Fetch,
            class_name: "{controller}Client".to_string(),
            client_base_class: None,
            use_get_base_url_method: false,
            generate_dto_types: true,
            generate_constructor_interface: true,
            excluded_type_names: Vec::new(),
            excluded_parameter_names: Vec::new(),
            operation_generation_mode: OperationGenerationMode::default(),
            extension: "ts".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_dto_dir(mut self, dto_dir: impl Into<String>) -> Self {
        self.dto_dir = dto_dir.into().trim_matches(['/', '\\']).to_string();
        self
    }

    pub fn with_file_case(mut self, file_case: FileCase) -> Self {
        self.file_case = file_case;
        self
    }

    pub fn with_template(mut self, template: ClientTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_client_base_class(mut self, base: impl Into<String>) -> Self {
        self.client_base_class = Some(base.into());
        self
    }

    pub fn with_excluded_type_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_type_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_operation_generation_mode(mut self, mode: OperationGenerationMode) -> Self {
        self.operation_generation_mode = mode;
        self
    }

    /// Directory receiving DTO files.
    pub fn dto_output_dir(&self) -> PathBuf {
        if self.dto_dir.is_empty() {
            self.output_dir.clone()
        } else {
            self.output_dir.join(&self.dto_dir)
        }
    }

    /// Resolve the client class name for a group key.
    pub fn client_class_name(&self, controller: &str) -> String {
        let controller = FileCase::PascalCase.convert(controller);
        let name = self.class_name.replace("{controller}", &controller);
        if name.trim().is_empty() {
            "Client".to_string()
        } else {
            name
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(Error::Config(format!(
                "Invalid file extension `{}`",
                self.extension
            )));
        }
        if self.dto_dir.contains("..") {
            return Err(Error::Config(format!(
                "DTO directory `{}` must stay inside the output directory",
                self.dto_dir
            )));
        }
        Ok(())
    }
}

/// Where the OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(String),
    File(PathBuf),
    /// JSON embedded in the settings file.
    Inline(String),
}

impl DocumentSource {
    /// Interpret a location: http(s) URLs stay URLs, anything else is a path relative to `base_dir`.
    pub fn from_location(location: &str, base_dir: &Path) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            let path = PathBuf::from(location);
            if path.is_absolute() {
                Self::File(path)
            } else {
                Self::File(base_dir.join(path))
            }
        }
    }
}

/// A parsed `*.nswag` file.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub path: PathBuf,
    pub source: Option<DocumentSource>,
    pub config: GeneratorConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NswagSettings {
    #[serde(alias = "swaggerGenerator")]
    document_generator: Option<DocumentGeneratorSection>,
    #[serde(default)]
    code_generators: CodeGeneratorsSection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentGeneratorSection {
    from_document: Option<FromDocumentSection>,
}

#[derive(Debug, Deserialize)]
struct FromDocumentSection {
    url: Option<String>,
    json: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CodeGeneratorsSection {
    #[serde(rename = "openApiToTypeScriptClient", alias = "swaggerToTypeScriptClient")]
    typescript_client: Option<TypeScriptClientSection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeScriptClientSection {
    output: Option<String>,
    class_name: Option<String>,
    template: Option<String>,
    client_base_class: Option<String>,
    #[serde(default)]
    use_get_base_url_method: bool,
    #[serde(default = "default_true")]
    generate_dto_types: bool,
    #[serde(default = "default_true")]
    generate_constructor_interface: bool,
    #[serde(default)]
    excluded_type_names: Vec<String>,
    #[serde(default)]
    excluded_parameter_names: Vec<String>,
    operation_generation_mode: Option<OperationGenerationMode>,
}

fn default_true() -> bool {
    true
}

/// Read a `*.nswag` settings file.
///
/// The output directory is resolved relative to the settings file.
pub fn load_settings(path: &Path) -> Result<LoadedSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_settings(&content, path, base_dir)
}

fn parse_settings(content: &str, path: &Path, base_dir: &Path) -> Result<LoadedSettings> {
    let settings: NswagSettings = serde_json::from_str(content)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

    let client = settings.code_generators.typescript_client.ok_or_else(|| {
        Error::Config(format!(
            "{}: missing codeGenerators.openApiToTypeScriptClient section",
            path.display()
        ))
    })?;

    let mut config = GeneratorConfig::default();
    if let Some(output) = client.output.filter(|o| !o.trim().is_empty()) {
        let output = PathBuf::from(output.replace('\\', "/"));
        config.output_dir = if output.is_absolute() {
            output
        } else {
            base_dir.join(output)
        };
    } else {
        config.output_dir = base_dir.to_path_buf();
    }
    if let Some(class_name) = client.class_name.filter(|c| !c.trim().is_empty()) {
        config.class_name = class_name;
    }
    if let Some(template) = client.template {
        config.template = template.parse()?;
    }
    config.client_base_class = client.client_base_class.filter(|b| !b.trim().is_empty());
    config.use_get_base_url_method = client.use_get_base_url_method;
    config.generate_dto_types = client.generate_dto_types;
    config.generate_constructor_interface = client.generate_constructor_interface;
    config.excluded_type_names = client.excluded_type_names;
    config.excluded_parameter_names = client.excluded_parameter_names;
    if let Some(mode) = client.operation_generation_mode {
        config.operation_generation_mode = mode;
    }

    let source = settings
        .document_generator
        .and_then(|g| g.from_document)
        .and_then(|doc| {
            if let Some(json) = doc.json.filter(|j| !j.trim().is_empty()) {
                Some(DocumentSource::Inline(json))
            } else {
                doc.url
                    .filter(|u| !u.trim().is_empty())
                    .map(|u| DocumentSource::from_location(u.trim(), base_dir))
            }
        });

    debug!(
        path = %path.display(),
        output = %config.output_dir.display(),
        template = ?config.template,
        "Loaded settings"
    );
    Ok(LoadedSettings {
        path: path.to_path_buf(),
        source,
        config,
    })
}

/// First `*.nswag` file in `dir`, by file name.
pub fn discover_settings(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .find(|path| path.extension().is_some_and(|ext| ext == "nswag"))
}
