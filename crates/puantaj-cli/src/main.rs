//! puantaj CLI - attendance report generator
//!
//! Reads stay records from a JSON array, computes the day-by-day attendance
//! matrix and writes it as an Excel/CSV file or prints a text preview.

mod diagnostics;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use puantaj_core::dates::parse_date;
use puantaj_core::{EngineConfig, RecordInput, Renderer, ReportOutcome, ReportRequest, Scope};
use puantaj_engine::ReportEngine;
use puantaj_render::{CsvRenderer, ExcelRenderer, ExportArtifact, TextRenderer};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::diagnostics::{DiagnosticConfig, ExitCode, TerminalEmitter};

#[derive(Parser)]
#[command(name = "puantaj")]
#[command(author, version, about = "Hotel attendance (puantaj) reports", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the attendance report to a file
    Report {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Xlsx)]
        format: Format,

        /// Directory the report file is written to
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Print the attendance matrix as a text table
    Preview {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// JSON file holding an array of stay records
    #[arg(value_name = "RECORDS")]
    records: PathBuf,

    /// Case-insensitive organization name filter
    #[arg(long, value_name = "TEXT")]
    org: Option<String>,

    /// Window start (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Window end (YYYY-MM-DD or DD.MM.YYYY)
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    to: Option<NaiveDate>,

    /// all, individual or org:<id>:<name>
    #[arg(long, default_value = "all", value_parser = parse_scope)]
    scope: Scope,

    /// Restrict date columns to the window
    #[arg(long)]
    clip: bool,

    /// Engine configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Xlsx,
    Csv,
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a date"))
}

fn parse_scope(raw: &str) -> Result<Scope, String> {
    match raw.trim() {
        "all" => Ok(Scope::All),
        "individual" => Ok(Scope::Unaffiliated),
        other => {
            let rest = other
                .strip_prefix("org:")
                .ok_or_else(|| format!("unknown scope '{other}'"))?;
            let mut parts = rest.splitn(2, ':');
            let id = parts.next().unwrap_or_default().trim();
            if id.is_empty() {
                return Err("organization scope needs an id: org:<id>:<name>".into());
            }
            let name = parts.next().map(str::trim).filter(|n| !n.is_empty()).unwrap_or(id);
            Ok(Scope::organization(id, name))
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let diagnostics = DiagnosticConfig { quiet: cli.quiet };
    let result = match cli.command {
        Commands::Report {
            selection,
            format,
            output_dir,
        } => cmd_report(&selection, format, &output_dir, diagnostics),
        Commands::Preview { selection } => cmd_preview(&selection, diagnostics),
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Failure.into()
        }
    }
}

fn cmd_report(
    selection: &SelectionArgs,
    format: Format,
    output_dir: &Path,
    diagnostics: DiagnosticConfig,
) -> Result<ExitCode> {
    let config = load_config(selection.config.as_deref())?;
    let Some(outcome) = run_report(selection, &config, diagnostics)? else {
        return Ok(ExitCode::Failure);
    };

    let artifact: ExportArtifact = match format {
        Format::Xlsx => ExcelRenderer::from_config(&config).export(&outcome.report)?,
        Format::Csv => CsvRenderer::from_config(&config).export(&outcome.report)?,
    };

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let path = output_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = artifact.bytes.len(), "report written");
    println!("{}", path.display());
    Ok(ExitCode::Success)
}

fn cmd_preview(selection: &SelectionArgs, diagnostics: DiagnosticConfig) -> Result<ExitCode> {
    let config = load_config(selection.config.as_deref())?;
    let Some(outcome) = run_report(selection, &config, diagnostics)? else {
        return Ok(ExitCode::Failure);
    };

    let text = TextRenderer::from_config(&config).render(&outcome.report)?;
    print!("{text}");
    Ok(ExitCode::Success)
}

/// Load, scope and run. `None` means the engine rejected the request;
/// the reason has already been printed.
fn run_report(
    selection: &SelectionArgs,
    config: &EngineConfig,
    diagnostics: DiagnosticConfig,
) -> Result<Option<ReportOutcome>> {
    let mut inputs = load_records(&selection.records)?;
    let total = inputs.len();
    inputs.retain(|input| {
        selection
            .scope
            .admits_organization(input.organization_id.as_deref(), input.organization.as_deref())
    });
    debug!(total, in_scope = inputs.len(), scope = selection.scope.label(), "records loaded");

    let request = build_request(selection);
    let engine = ReportEngine::new(config.clone());
    let outcome = match engine.run_inputs(inputs, &request) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(None);
        }
    };

    let stderr = std::io::stderr();
    let mut emitter = TerminalEmitter::new(stderr.lock(), diagnostics);
    emitter.emit_all(&outcome.diagnostics)?;
    emitter.summary(outcome.dropped().count())?;
    debug!(warnings = emitter.warning_count(), rows = outcome.report.rows.len(), "report computed");

    Ok(Some(outcome))
}

fn build_request(selection: &SelectionArgs) -> ReportRequest {
    let mut request = ReportRequest::new().scope(selection.scope.clone());
    if let Some(org) = &selection.org {
        request = request.organization_filter(org.clone());
    }
    if let Some(from) = selection.from {
        request = request.window_start(from);
    }
    if let Some(to) = selection.to {
        request = request.window_end(to);
    }
    if selection.clip {
        request = request.clip_to_window();
    }
    request
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_records(path: &Path) -> Result<Vec<RecordInput>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of stay records", path.display()))
}
