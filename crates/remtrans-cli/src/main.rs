use std::fs;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;

use remtrans_core::{FILE_EXTENSION, FORMAT_NAME, ImportReport, ImportStats, import_reader};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("REMTRANS_BUILD_COMMIT"),
    ", ",
    env!("REMTRANS_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "remtrans")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Importer for IrTrans remote database exports (.rem).",
    long_about = None,
    after_help = "Examples:\n  remtrans rem import devices.rem -o remotes.json\n  remtrans rem import devices.rem --stdout --pretty\n  RUST_LOG=warn remtrans rem import devices.rem -o remotes.json --list-failures"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on IrTrans `.rem` database exports.
    Rem {
        #[command(subcommand)]
        command: RemCommands,
    },
}

#[derive(Subcommand, Debug)]
enum RemCommands {
    /// Import a database export and write the remote set as JSON.
    #[command(
        after_help = "Examples:\n  remtrans rem import devices.rem -o remotes.json\n  remtrans rem import devices.rem --stdout"
    )]
    Import {
        /// Path to a .rem file
        input: PathBuf,

        /// Output path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if the importer had to recover from
        /// skipped lines, discarded blocks or name collisions
        #[arg(long)]
        strict: bool,

        /// List recovered problems after the import
        #[arg(long)]
        list_failures: bool,

        /// Record this user as the creator of the remote set
        #[arg(long)]
        creator: Option<String>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Rem { command } => match command {
            RemCommands::Import {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_failures,
                creator,
            } => cmd_rem_import(
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
                list_failures,
                creator,
            ),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_rem_import(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_failures: bool,
    creator: Option<String>,
) -> Result<(), CliError> {
    let input = resolve_input_path(&input)?;
    validate_input_file(&input)?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        if same_file(report_path, &input) {
            return Err(CliError::new(
                format!("output path must differ from input: {}", report_path.display()),
                Some("choose a different output path".to_string()),
            ));
        }
    }

    let file = fs::File::open(&input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    let imported = import_reader(
        BufReader::new(file),
        &input.display().to_string(),
        creator.as_deref(),
    )
    .with_context(|| format!("{} import failed", FORMAT_NAME))?;

    let json = serialize_remote_set(&imported, pretty, compact)?;

    if let Some(report_path) = report.as_ref() {
        if let Some(parent) = report_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        fs::write(report_path, json)
            .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
        if !quiet {
            eprintln!("OK: remote set written -> {}", report_path.display());
        }
    } else {
        print!("{}", json);
    }

    if list_failures && !quiet {
        print_failures(&imported.stats);
    }
    if strict && !imported.stats.is_clean() {
        return Err(CliError::new(
            "import recovered from problems in the input",
            Some("use --list-failures to inspect".to_string()),
        ));
    }
    Ok(())
}

fn serialize_remote_set(
    imported: &ImportReport,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(&imported.remote_set)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(&imported.remote_set)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_failures(stats: &ImportStats) {
    eprintln!("Import diagnostics:");
    for failure in &stats.failures {
        eprintln!("  discarded remote block: {}", failure);
    }
    eprintln!("  commands skipped: {}", stats.commands_skipped);
    eprintln!("  command name collisions: {}", stats.command_collisions);
    eprintln!("  remote name collisions: {}", stats.remote_collisions);
}

fn same_file(a: &PathBuf, b: &PathBuf) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some(format!("use a .{} file", FILE_EXTENSION)),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some(format!("use a .{} file", FILE_EXTENSION)),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != FILE_EXTENSION {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some(format!("expected a .{} file", FILE_EXTENSION)),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some(format!(
                "check the path or quote the pattern; expected a .{} file",
                FILE_EXTENSION
            )),
        )),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::new(
            format!("multiple files match pattern '{}' ({} matches)", pattern, n),
            Some("pass a single database file, or run once per file".to_string()),
        )),
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
