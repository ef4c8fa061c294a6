//! mockgen CLI binary entry point.
//!
//! ## Usage
//!
//! ```bash
//! mockgen generate Service.json
//! mockgen generate --format json - < Service.json
//! RUST_LOG=mockgen_core=debug mockgen generate --no-proxies Service.json
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use mockgen::cli::{build_response, load_description, render_type_body, GenerateOptions};
use mockgen_core::error::{MockgenError, OutputErrorCode};
use mockgen_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Declaration synthesis for Swift test doubles.
///
/// Reads a JSON description of a mockable type and prints the source of its
/// mock members, stubbing accessors and initializer proxies.
#[derive(Parser, Debug)]
#[command(name = "mockgen", version, about = "Declaration synthesis for Swift test doubles")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for the generate command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Concatenated type body fragments.
    #[default]
    Text,
    /// Per-method artifacts as a JSON response.
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate mock members for a type description.
    Generate {
        /// Path to the JSON type description, or `-` for stdin.
        input: String,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: Format,

        /// Omit initializer proxies from text output.
        #[arg(long)]
        no_proxies: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON so callers parse one stream.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), MockgenError> {
    match cli.command {
        Command::Generate {
            input,
            format,
            no_proxies,
        } => execute_generate(&input, format, no_proxies),
    }
}

fn execute_generate(input: &str, format: Format, no_proxies: bool) -> Result<(), MockgenError> {
    let description = load_description(input)?;
    let mut stdout = io::stdout();
    match format {
        Format::Text => {
            let options = GenerateOptions {
                include_proxies: !no_proxies,
            };
            let body = render_type_body(&description, options);
            if !body.is_empty() {
                writeln!(stdout, "{}", body)?;
            }
        }
        Format::Json => {
            let response = build_response(&description);
            emit_response(&response, &mut stdout)?;
        }
    }
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
