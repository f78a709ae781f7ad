// crates/api-smoke-cli/src/main.rs
// ============================================================================
// Module: API Smoke CLI Entry Point
// Description: Command dispatcher for listing and running smoke cases.
// Purpose: Run the contract catalog against a backend and report the results.
// Dependencies: api-smoke-catalog, api-smoke-core, clap, serde_jcs, tracing-subscriber
// ============================================================================

//! ## Overview
//! `api-smoke list` prints the catalog. `api-smoke run` resolves configuration
//! (defaults, TOML file, `API_SMOKE_*` env, then flags), runs the selected
//! cases in order, and prints the report on stdout. Logs go to stderr so the
//! report stays machine-readable. The exit code is non-zero when any case
//! fails or the command cannot run.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use api_smoke_catalog::CatalogContext;
use api_smoke_catalog::cases;
use api_smoke_catalog::select;
use api_smoke_core::ContractRunner;
use api_smoke_core::SmokeCase;
use api_smoke_core::SmokeConfig;
use api_smoke_core::StepMode;
use api_smoke_core::SuiteReport;
use api_smoke_core::SuiteRunner;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";
/// File name of the canonical JSON summary.
const SUMMARY_JSON: &str = "summary.json";
/// File name of the Markdown summary.
const SUMMARY_MARKDOWN: &str = "summary.md";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "api-smoke", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_json: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the cases in the catalog.
    List(ListCommand),
    /// Run cases against a backend.
    Run(RunCommand),
}

/// Arguments for `list`.
#[derive(Args, Debug)]
struct ListCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = ListFormat::Text)]
    format: ListFormat,
}

/// Arguments for `run`.
#[derive(Args, Debug, Default)]
struct RunCommand {
    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Backend base URL.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout_sec: Option<u64>,
    /// Bearer token for protected routes.
    #[arg(long, value_name = "TOKEN")]
    bearer_token: Option<String>,
    /// Case id to run; repeat to run several. Runs every case when omitted.
    #[arg(long = "case", value_name = "ID")]
    cases: Vec<String>,
    /// Report format printed on stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Directory receiving `summary.json` and `summary.md`.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

/// Output formats for `list`.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
enum ListFormat {
    /// One line per case.
    #[default]
    Text,
    /// Canonical JSON array.
    Json,
}

/// Output formats for `run`.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
enum ReportFormat {
    /// Plain text.
    #[default]
    Text,
    /// Canonical JSON.
    Json,
    /// Markdown summary.
    Markdown,
}

/// Catalog entry printed by `list`.
#[derive(Debug, Serialize)]
struct CaseListing {
    /// Case id.
    id: String,
    /// Case title.
    title: String,
    /// True when the case signs in first.
    login_setup: bool,
    /// Step labels in execution order.
    steps: Vec<String>,
}

impl From<&SmokeCase> for CaseListing {
    fn from(case: &SmokeCase) -> Self {
        Self {
            id: case.id.clone(),
            title: case.title.clone(),
            login_setup: case.setup.is_some(),
            steps: case
                .steps
                .iter()
                .map(|step| match step.mode {
                    StepMode::Once => step.label.clone(),
                    StepMode::Repeated(probe) => format!("{} ({probe})", step.label),
                })
                .collect(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a printable message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("api-smoke {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    init_tracing(cli.log_json)?;
    match command {
        Commands::List(command) => command_list(&command),
        Commands::Run(command) => command_run(&command),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing(json: bool) -> CliResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).try_init()
    };
    installed.map_err(|err| CliError::new(format!("failed to initialize logging: {err}")))
}

// ============================================================================
// SECTION: List Command
// ============================================================================

/// Executes the `list` command.
fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let ctx = CatalogContext::from_config(&SmokeConfig::default());
    let catalog = cases(&ctx).map_err(|err| CliError::new(format!("invalid catalog: {err}")))?;
    let listings: Vec<CaseListing> = catalog.iter().map(CaseListing::from).collect();
    match command.format {
        ListFormat::Json => write_canonical_json(&listings)?,
        ListFormat::Text => write_stdout_bytes(render_listing(&listings).as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders the catalog as text.
fn render_listing(listings: &[CaseListing]) -> String {
    let mut out = String::new();
    for listing in listings {
        let setup = if listing.login_setup { " [login setup]" } else { "" };
        let _ = writeln!(out, "{} {}{setup}", listing.id, listing.title);
        for step in &listing.steps {
            let _ = writeln!(out, "  - {step}");
        }
    }
    out
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let config = resolve_config(command)?;
    let runner = ContractRunner::new(&config).map_err(|err| CliError::new(err.to_string()))?;
    let ctx = CatalogContext::from_config(&config);
    let catalog = cases(&ctx).map_err(|err| CliError::new(format!("invalid catalog: {err}")))?;
    let selected = select(catalog, &command.cases)
        .map_err(|unknown| CliError::new(format!("unknown case id `{unknown}`")))?;
    info!(base_url = %config.base_url, cases = selected.len(), "starting smoke run");

    let report = SuiteRunner::new(runner).run_suite(&selected);
    match command.format {
        ReportFormat::Json => write_canonical_json(&report)?,
        ReportFormat::Text => write_stdout_bytes(report.render_text().as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
        ReportFormat::Markdown => write_stdout_bytes(report.render_markdown().as_bytes())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    if let Some(dir) = &command.out_dir {
        write_summary(dir, &report)?;
    }
    Ok(if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Resolves configuration and layers command-line flags on top.
fn resolve_config(command: &RunCommand) -> CliResult<SmokeConfig> {
    let mut config =
        SmokeConfig::load(command.config.as_deref()).map_err(|err| CliError::new(err.to_string()))?;
    apply_flags(&mut config, command)?;
    Ok(config)
}

/// Applies `run` flags to a loaded configuration and revalidates it.
fn apply_flags(config: &mut SmokeConfig, command: &RunCommand) -> CliResult<()> {
    if let Some(base_url) = &command.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(secs) = command.timeout_sec {
        config.set_timeout_secs(secs).map_err(|err| CliError::new(err.to_string()))?;
    }
    if let Some(token) = &command.bearer_token {
        config.bearer_token = Some(token.clone());
    }
    config.validate().map_err(|err| CliError::new(err.to_string()))
}

/// Writes `summary.json` and `summary.md` into `dir`.
fn write_summary(dir: &Path, report: &SuiteReport) -> CliResult<()> {
    fs::create_dir_all(dir)
        .map_err(|err| CliError::new(format!("failed to create {}: {err}", dir.display())))?;
    let json = canonical_output_bytes(report)?;
    write_file(&dir.join(SUMMARY_JSON), &json)?;
    write_file(&dir.join(SUMMARY_MARKDOWN), report.render_markdown().as_bytes())
}

/// Writes bytes to a file.
fn write_file(path: &Path, bytes: &[u8]) -> CliResult<()> {
    fs::write(path, bytes)
        .map_err(|err| CliError::new(format!("failed to write {}: {err}", path.display())))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints help text.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_bytes(help.as_bytes()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Computes canonical JSON bytes for output rendering.
fn canonical_output_bytes<T: Serialize>(value: &T) -> CliResult<Vec<u8>> {
    serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))
}

/// Writes canonical JSON to stdout with a trailing newline.
fn write_canonical_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = canonical_output_bytes(value)?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
