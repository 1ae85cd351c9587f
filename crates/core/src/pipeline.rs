//! One generation run: render, build imports, emit, synchronize.

use std::collections::HashMap;
use std::fs;
use std::iter;
use std::path::{Component, Path};
use std::time::Instant;

use tracing::{debug, info};

use crate::classify::TypeClassifier;
use crate::config::{GeneratorConfig, UTILITIES_NAME};
use crate::emit::{emit_symbol, emit_utilities};
use crate::error::{Error, Result};
use crate::extract::SymbolExtractor;
use crate::imports::ImportHeaderBuilder;
use crate::openapi::OpenApiDocument;
use crate::render::{SymbolRenderer, TypeScriptRenderer, TypeScriptSettings};
use crate::symbol::{Symbol, SymbolKind};
use crate::sync::{DirectorySynchronizer, ModuleFile, SyncReport, write_if_changed};

/// Outcome of [`Generator::run`].
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub dto_count: usize,
    pub client_count: usize,
    pub sync: SyncReport,
    pub elapsed_ms: u64,
}

/// Drives a generation run over one document.
#[derive(Debug)]
pub struct Generator<R: SymbolRenderer = TypeScriptRenderer> {
    document: OpenApiDocument,
    config: GeneratorConfig,
    renderer: R,
    classifier: TypeClassifier,
}

impl Generator<TypeScriptRenderer> {
    /// Generator with the TypeScript renderer configured from `config`.
    pub fn new(document: OpenApiDocument, config: GeneratorConfig) -> Result<Self> {
        let settings = TypeScriptSettings::from_config(&config, document.base_url());
        Self::with_renderer(document, config, TypeScriptRenderer::new(settings))
    }
}

impl<R: SymbolRenderer> Generator<R> {
    pub fn with_renderer(mut document: OpenApiDocument, config: GeneratorConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        document.ensure_operation_ids();
        let classifier = TypeClassifier::new(config.excluded_type_names.iter().cloned())
            .with_utility_names(renderer.utility_names());
        Ok(Self {
            document,
            config,
            renderer,
            classifier,
        })
    }

    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn stem(&self, name: &str) -> String {
        self.config.file_case.convert(name)
    }

    fn extractor(&self) -> SymbolExtractor<'_, R> {
        SymbolExtractor::new(&self.document, &self.renderer, &self.config)
    }

    /// The shared utilities module.
    pub fn utilities_file(&self) -> Result<ModuleFile> {
        let symbol = Symbol::new(
            UTILITIES_NAME,
            SymbolKind::UtilityMember,
            self.renderer.render_utilities()?,
        );
        Ok(ModuleFile::new(
            symbol.name.clone(),
            self.stem(&symbol.name),
            emit_utilities(&symbol.source_text),
        ))
    }

    /// One module per schema definition, importing siblings from `./`.
    pub fn dto_files(&self) -> Result<Vec<ModuleFile>> {
        if !self.config.generate_dto_types {
            return Ok(Vec::new());
        }
        let depth = dir_depth(&self.config.dto_dir);
        let utilities_path = if depth == 0 {
            format!("./{}", self.stem(UTILITIES_NAME))
        } else {
            format!("{}{}", "../".repeat(depth), self.stem(UTILITIES_NAME))
        };
        let builder =
            ImportHeaderBuilder::new(&self.classifier, self.config.file_case, "./", utilities_path);

        let symbols: Vec<Symbol> = self.extractor().dto_symbols().collect::<Result<_>>()?;
        check_partitions(&symbols)?;
        Ok(symbols
            .iter()
            .map(|symbol| {
                let header = builder.build(symbol);
                ModuleFile::new(
                    symbol.name.clone(),
                    self.stem(&symbol.name),
                    emit_symbol(symbol, &header),
                )
            })
            .collect())
    }

    /// One module per client class, importing DTOs from the DTO directory.
    pub fn client_files(&self) -> Result<Vec<ModuleFile>> {
        let sibling_prefix = if self.config.dto_dir.is_empty() {
            "./".to_string()
        } else {
            format!("./{}/", self.config.dto_dir)
        };
        let builder = ImportHeaderBuilder::new(
            &self.classifier,
            self.config.file_case,
            sibling_prefix,
            format!("./{}", self.stem(UTILITIES_NAME)),
        )
        .with_baseline(self.renderer.utility_baseline());

        let dto_names: Vec<&str> = if self.config.generate_dto_types {
            self.document
                .schemas()
                .into_keys()
                .filter(|name| !self.config.excluded_type_names.iter().any(|n| n == name))
                .collect()
        } else {
            Vec::new()
        };

        let symbols: Vec<Symbol> = self.extractor().client_symbols().collect::<Result<_>>()?;
        check_partitions(&symbols)?;
        symbols
            .iter()
            .map(|symbol| {
                if dto_names.contains(&symbol.name.as_str()) {
                    return Err(Error::DuplicateSymbol(symbol.name.clone()));
                }
                let header = builder.build(symbol);
                Ok(ModuleFile::new(
                    symbol.name.clone(),
                    self.stem(&symbol.name),
                    emit_symbol(symbol, &header),
                ))
            })
            .collect()
    }

    /// Generate every module and synchronize the output directories.
    pub fn run(&self) -> Result<GenerationReport> {
        let started = Instant::now();
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| Error::CreateDir {
            path: output_dir.clone(),
            source,
        })?;

        let phase = Instant::now();
        let utilities = self.utilities_file()?;
        let utilities_path = output_dir.join(format!("{}.{}", utilities.stem, self.config.extension));
        let utilities_written = write_if_changed(&utilities_path, &utilities.content)?;
        info!(elapsed_ms = elapsed_ms(phase), "Generated utilities module");

        let phase = Instant::now();
        let dtos = self.dto_files()?;
        info!(count = dtos.len(), elapsed_ms = elapsed_ms(phase), "Generated DTO modules");

        let phase = Instant::now();
        let clients = self.client_files()?;
        info!(count = clients.len(), elapsed_ms = elapsed_ms(phase), "Generated client modules");

        let phase = Instant::now();
        let dto_count = dtos.len();
        let client_count = clients.len();
        let root = DirectorySynchronizer::new(output_dir, &self.config.extension).preserve(&utilities.stem);
        let mut sync = SyncReport::default();
        if utilities_written {
            sync.written.push(utilities_path);
        } else {
            sync.unchanged.push(utilities_path);
        }

        if self.config.dto_dir.is_empty() {
            let mut files = dtos;
            files.extend(clients);
            sync.merge(root.sync(&files)?);
        } else {
            let dto_dir = self.config.dto_output_dir();
            debug!(dir = %dto_dir.display(), "Synchronizing DTO directory");
            sync.merge(DirectorySynchronizer::new(dto_dir, &self.config.extension).sync(&dtos)?);
            sync.merge(root.sync(&clients)?);
        }
        info!(
            written = sync.written.len(),
            unchanged = sync.unchanged.len(),
            deleted = sync.deleted.len(),
            elapsed_ms = elapsed_ms(phase),
            "Synchronized output and index"
        );

        Ok(GenerationReport {
            dto_count,
            client_count,
            sync,
            elapsed_ms: elapsed_ms(started),
        })
    }
}

/// Every name a symbol declares must be unique within its kind partition.
fn check_partitions(symbols: &[Symbol]) -> Result<()> {
    let mut owners: HashMap<(&str, &str), usize> = HashMap::new();
    for (index, symbol) in symbols.iter().enumerate() {
        let declared = iter::once(&symbol.name).chain(&symbol.defined_names);
        for name in declared {
            let key = (symbol.kind.partition(), name.as_str());
            if let Some(owner) = owners.insert(key, index)
                && owner != index
            {
                return Err(Error::DuplicateSymbol(name.clone()));
            }
        }
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn dir_depth(dir: &str) -> usize {
    Path::new(dir)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}
