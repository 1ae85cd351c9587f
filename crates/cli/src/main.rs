//! nsplit - split NSwag-style TypeScript clients into one module per type.
//!
//! Reads a `*.nswag` settings file, retrieves the OpenAPI document it points
//! at and synchronizes the output directory with the generated modules.

mod fetch;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use nsplit_core::{
    DocumentSource, Error, FileCase, GenerationReport, Generator, GeneratorConfig, Result,
    discover_settings, load_settings,
};
use tracing::{info, warn};

/// Exit code when generation succeeded but stale files could not be removed.
const EXIT_CLEANUP_FAILED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "nsplit",
    version,
    about = "Generate one TypeScript module per OpenAPI type and client"
)]
struct Cli {
    /// NSwag settings file (defaults to the first *.nswag file in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subdirectory of the output directory that receives DTO modules
    #[arg(short = 'd', long = "dto-path")]
    dto_path: Option<String>,

    /// File naming: kebab-case, camelCase, snake_case, "Title Case", ALL_CAPS_SNAKE_CASE, PascalCase or identity
    #[arg(short = 'f', long = "file-case")]
    file_case: Option<String>,

    /// OpenAPI document URL or path, overriding the settings file
    #[arg(short, long)]
    input: Option<String>,

    /// Output directory, overriding the settings file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            println!(
                "nsplit: {} DTOs, {} clients ({} written, {} unchanged, {} removed) in {}ms",
                report.dto_count,
                report.client_count,
                report.sync.written.len(),
                report.sync.unchanged.len(),
                report.sync.deleted.len(),
                report.elapsed_ms
            );
            for path in &report.sync.failed_deletions {
                warn!(path = %path.display(), "Stale file was not removed");
            }
            ExitCode::from(exit_status(&report))
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<GenerationReport> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::Config(format!("Cannot determine current directory: {e}")))?;

    let phase = Instant::now();
    let settings_path = cli.config.clone().or_else(|| discover_settings(&cwd));
    let (mut config, mut source) = match &settings_path {
        Some(path) => {
            let loaded = load_settings(path)?;
            (loaded.config, loaded.source)
        }
        None => {
            info!("No settings file found, using defaults");
            (GeneratorConfig::new(&cwd), None)
        }
    };
    apply_overrides(&cli, &cwd, &mut config, &mut source);
    info!(
        settings = ?settings_path,
        output = %config.output_dir.display(),
        file_case = %config.file_case,
        elapsed_ms = elapsed_ms(phase),
        "Loaded configuration"
    );

    let source = source.ok_or_else(|| {
        Error::Config(
            "No OpenAPI document: pass --input or set documentGenerator.fromDocument.url".to_string(),
        )
    })?;

    let phase = Instant::now();
    let document = fetch::load_document(&source).await?;
    info!(elapsed_ms = elapsed_ms(phase), "Loaded OpenAPI document");

    Generator::new(document, config)?.run()
}

/// A completed run still fails the process when stale files survived.
fn exit_status(report: &GenerationReport) -> u8 {
    if report.sync.has_failures() {
        EXIT_CLEANUP_FAILED
    } else {
        0
    }
}

fn apply_overrides(
    cli: &Cli,
    cwd: &Path,
    config: &mut GeneratorConfig,
    source: &mut Option<DocumentSource>,
) {
    if let Some(input) = &cli.input {
        *source = Some(DocumentSource::from_location(input, cwd));
    }
    if let Some(output) = &cli.output {
        config.output_dir = if output.is_absolute() {
            output.clone()
        } else {
            cwd.join(output)
        };
    }
    if let Some(dto_path) = &cli.dto_path {
        *config = std::mem::take(config).with_dto_dir(dto_path.as_str());
    }
    if let Some(file_case) = &cli.file_case {
        config.file_case = parse_file_case(file_case);
    }
}

/// Unknown conventions fall back to no conversion.
fn parse_file_case(value: &str) -> FileCase {
    match value.parse::<FileCase>() {
        Ok(case) => case,
        Err(e) => {
            warn!(value, error = %e, "Unknown file case, using identity");
            FileCase::Identity
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
