//! Release retention CLI
//!
//! The `retention` command evaluates which deployed releases to keep for
//! every (project, environment) pair in a JSON request file.
//!
//! ## Commands
//!
//! - `evaluate`: Run the full evaluation and print or write the result
//! - `validate`: Check a request for structural errors only
//! - `digest`: Print the SHA-256 golden digest of the evaluation result

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};

use retention_core::{
    evaluate, evaluate_observed, render_result_md, result_digest, validate, write_result_json,
    write_result_md, RetentionMetrics, RetentionRequest, RetentionResult, TracingObserver,
    ValidationError,
};

#[derive(Parser)]
#[command(name = "retention")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decide which deployed releases to keep", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a retention request
    Evaluate(EvaluateArgs),

    /// Validate a retention request without evaluating it
    Validate {
        /// Path to the request file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the golden digest of the evaluation result
    Digest {
        /// Path to the request file (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct EvaluateArgs {
    /// Path to the request file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Releases to keep per project/environment (overrides the file)
    #[arg(short, long, env = "RETENTION_KEEP", allow_negative_numbers = true)]
    keep: Option<i64>,

    /// Correlation id stamped on every decision (overrides the file)
    #[arg(long, env = "RETENTION_CORRELATION_ID")]
    correlation_id: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    retention_core::init_tracing(cli.json, level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", describe_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Evaluate(args) => {
            if let Some(rendered) = cmd_evaluate(&args)? {
                println!("{rendered}");
            }
            Ok(())
        }
        Commands::Validate { input } => {
            println!("{}", cmd_validate(&input)?);
            Ok(())
        }
        Commands::Digest { input } => {
            println!("{}", cmd_digest(&input)?);
            Ok(())
        }
    }
}

/// Format a failure for stderr. Validation failures carry their stable code.
fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ValidationError>() {
        Some(validation) => format!("error[{}]: {}", validation.code(), validation),
        None => format!("error: {err:#}"),
    }
}

// ========== Commands ==========

/// Evaluate a request file.
///
/// Returns the rendered result when it should go to stdout, `None` when it
/// was written to `--output`.
fn cmd_evaluate(args: &EvaluateArgs) -> Result<Option<String>> {
    let mut request = load_request(&args.input)?;
    if let Some(keep) = args.keep {
        debug!(keep, "overriding releases_to_keep");
        request.releases_to_keep = keep;
    }
    if let Some(id) = &args.correlation_id {
        request.correlation_id = Some(id.clone());
    }

    let metrics = RetentionMetrics::new();
    let outcome = evaluate_observed(&request, &(TracingObserver, &metrics));
    metrics.flush();
    let result = outcome?;

    match &args.output {
        Some(path) => {
            match args.format {
                OutputFormat::Json => write_result_json(path, &result)?,
                OutputFormat::Markdown => write_result_md(path, &result)?,
            }
            info!(output = %path.display(), "wrote retention result");
            Ok(None)
        }
        None => render(&result, args.format).map(Some),
    }
}

/// Run only the validation stage.
fn cmd_validate(input: &Path) -> Result<String> {
    let request = load_request(input)?;
    let validated = validate(&request)?;
    Ok(format!(
        "ok: {} projects, {} environments, {} releases, {} deployments",
        validated.projects.len(),
        validated.environments.len(),
        validated.releases.len(),
        validated.deployments.len()
    ))
}

/// Evaluate and return the golden digest of the result.
fn cmd_digest(input: &Path) -> Result<String> {
    let request = load_request(input)?;
    let result = evaluate(&request)?;
    Ok(result_digest(&result)?)
}

// ========== Helpers ==========

fn load_request(path: &Path) -> Result<RetentionRequest> {
    let request: RetentionRequest = read_json_file(path)?;
    debug!(
        path = %path.display(),
        deployments = request.deployments.len(),
        "loaded retention request"
    );
    Ok(request)
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn render(result: &RetentionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("Failed to serialize retention result")
        }
        OutputFormat::Markdown => Ok(render_result_md(result)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "projects": [{"id": "P1", "name": "api"}],
        "environments": [{"id": "E1", "name": "prod"}, {"id": "E2", "name": "stage"}],
        "releases": [
            {"id": "R1", "project_id": "P1", "version": "1.0.0", "created": "2024-01-01T08:00:00Z"},
            {"id": "R2", "project_id": "P1", "version": "1.1.0", "created": "2024-01-01T09:00:00Z"}
        ],
        "deployments": [
            {"id": "D1", "release_id": "R1", "environment_id": "E1", "deployed_at": "2024-01-01T10:00:00Z"},
            {"id": "D2", "release_id": "R2", "environment_id": "E1", "deployed_at": "2024-01-01T11:00:00Z"},
            {"id": "D3", "release_id": "R2", "environment_id": "E-missing", "deployed_at": "2024-01-01T11:00:00Z"}
        ],
        "releases_to_keep": 1
    }"#;

    fn request_file(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("request.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn args(input: PathBuf) -> EvaluateArgs {
        EvaluateArgs {
            input,
            keep: None,
            correlation_id: None,
            format: OutputFormat::Json,
            output: None,
        }
    }

    #[test]
    fn test_evaluate_prints_json_result() {
        let dir = tempfile::tempdir().unwrap();
        let input = request_file(dir.path(), REQUEST);

        let rendered = cmd_evaluate(&args(input)).unwrap().unwrap();
        let result: RetentionResult = serde_json::from_str(&rendered).unwrap();

        assert_eq!(result.kept_releases.len(), 1);
        assert_eq!(result.kept_releases[0].release_id, "R2");
        assert_eq!(result.diagnostics.invalid_deployments_excluded, 1);
    }

    #[test]
    fn test_evaluate_overrides_keep_and_correlation() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(request_file(dir.path(), REQUEST));
        args.keep = Some(2);
        args.correlation_id = Some("cli-run-7".to_string());

        let rendered = cmd_evaluate(&args).unwrap().unwrap();
        let result: RetentionResult = serde_json::from_str(&rendered).unwrap();

        assert_eq!(result.kept_releases.len(), 2);
        assert!(result
            .decisions
            .iter()
            .all(|d| d.correlation_id.as_deref() == Some("cli-run-7")));
    }

    #[test]
    fn test_evaluate_writes_markdown_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(request_file(dir.path(), REQUEST));
        let output = dir.path().join("summary.md");
        args.format = OutputFormat::Markdown;
        args.output = Some(output.clone());

        assert!(cmd_evaluate(&args).unwrap().is_none());
        let written = std::fs::read_to_string(output).unwrap();
        assert!(written.starts_with("# Retention Summary"));
        assert!(written.contains("environment 'E-missing' not found"));
    }

    #[test]
    fn test_negative_keep_reports_coded_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(request_file(dir.path(), REQUEST));
        args.keep = Some(-1);

        let err = cmd_evaluate(&args).unwrap_err();
        let message = describe_error(&err);
        assert!(
            message.starts_with("error[validation.n_negative]:"),
            "unexpected error: {message}"
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let body = REQUEST.replace(
            r#"{"id": "E2", "name": "stage"}"#,
            r#"{"id": "E1", "name": "again"}"#,
        );
        let input = request_file(dir.path(), &body);

        let err = cmd_validate(&input).unwrap_err();
        assert_eq!(
            describe_error(&err),
            "error[validation.duplicate_id.environment]: duplicate environment id 'E1'"
        );
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = request_file(dir.path(), REQUEST);

        let summary = cmd_validate(&input).unwrap();
        assert_eq!(
            summary,
            "ok: 1 projects, 2 environments, 2 releases, 3 deployments"
        );
    }

    #[test]
    fn test_digest_is_stable_and_hex() {
        let dir = tempfile::tempdir().unwrap();
        let input = request_file(dir.path(), REQUEST);

        let first = cmd_digest(&input).unwrap();
        let second = cmd_digest(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_missing_input_file_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_digest(&dir.path().join("absent.json")).unwrap_err();
        let message = describe_error(&err);
        assert!(
            message.contains("Failed to read JSON file"),
            "unexpected error: {message}"
        );
    }

    #[test]
    fn test_cli_parses_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "retention",
            "--json",
            "evaluate",
            "--input",
            "req.json",
            "--keep",
            "3",
            "--format",
            "markdown",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Evaluate(args) => {
                assert_eq!(args.keep, Some(3));
                assert_eq!(args.format, OutputFormat::Markdown);
                assert_eq!(args.input, PathBuf::from("req.json"));
            }
            _ => panic!("expected evaluate"),
        }
    }
}
