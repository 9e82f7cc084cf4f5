// crates/propline-cli/src/main.rs
// ============================================================================
// Module: Propline CLI Entry Point
// Description: Command dispatcher for resolving and expanding properties.
// Purpose: Exercise a configured engine from the shell.
// Dependencies: clap, propline-config, propline-core, propline-resolvers, thiserror, tracing
// ============================================================================

//! ## Overview
//! The `propline` binary loads `propline.toml`, builds an engine, and runs one
//! of three commands: `resolve` converts a single property to a requested
//! type, `expand` substitutes placeholders in free text, and `check` only
//! validates the configuration. `-D name=value` definitions shadow every
//! configured resolver. Logging goes to stderr and is filtered by
//! `PROPLINE_LOG` (default `warn`).

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use propline_config::CONFIG_ENV_VAR;
use propline_config::DEFAULT_CONFIG_NAME;
use propline_config::PropLineConfig;
use propline_core::Arguments;
use propline_core::Engine;
use propline_core::MethodDescriptor;
use propline_core::ProcessorDirective;
use propline_core::PropertyName;
use propline_core::TypeDescriptor;
use propline_resolvers::CommandLineResolver;
use propline_resolvers::ResolverRegistry;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "PROPLINE_LOG";
/// Log filter used when `PROPLINE_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "propline", version, disable_help_subcommand = true)]
struct Cli {
    /// Engine options given before the subcommand.
    #[command(flatten)]
    engine: EngineArgs,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options that shape the engine every command runs against.
#[derive(Args, Debug, Clone, Default)]
struct EngineArgs {
    /// Configuration file (defaults to `PROPLINE_CONFIG`, then `./propline.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Property definition taking precedence over configured resolvers.
    #[arg(
        short = 'D',
        long = "define",
        value_name = "NAME=VALUE",
        action = ArgAction::Append
    )]
    defines: Vec<String>,
}

impl EngineArgs {
    /// Combines options given before the subcommand with those given after.
    ///
    /// A later `--config` replaces an earlier one; definitions accumulate in
    /// command-line order so the last definition of a name wins.
    fn merged(&self, later: &Self) -> Self {
        Self {
            config: later.config.clone().or_else(|| self.config.clone()),
            defines: self.defines.iter().chain(&later.defines).cloned().collect(),
        }
    }
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve, process, and convert one property.
    Resolve(ResolveCommand),
    /// Expand placeholders in a piece of text.
    Expand(ExpandCommand),
    /// Validate the configuration and build the engine.
    Check(CheckCommand),
}

/// Arguments for `resolve`.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Engine options given after the subcommand.
    #[command(flatten)]
    engine: EngineArgs,
    /// Property name.
    name: String,
    /// Target type, e.g. `u16`, `list<i32>`, `optional<duration>`.
    #[arg(long = "type", value_name = "DESCRIPTOR", default_value = "string")]
    type_descriptor: String,
    /// Sequence delimiter override.
    #[arg(long, value_name = "DELIMITER")]
    delimiter: Option<String>,
    /// Drop empty sequence tokens.
    #[arg(long, action = ArgAction::SetTrue)]
    strip_empty: bool,
    /// Date/time format description for temporal types.
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,
    /// Processor to apply, optionally with an argument (`name[:arg]`).
    #[arg(long = "process", value_name = "NAME[:ARG]", action = ArgAction::Append)]
    processors: Vec<String>,
}

/// Arguments for `expand`.
#[derive(Args, Debug)]
struct ExpandCommand {
    /// Engine options given after the subcommand.
    #[command(flatten)]
    engine: EngineArgs,
    /// Text containing placeholders.
    text: String,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Engine options given after the subcommand.
    #[command(flatten)]
    engine: EngineArgs,
}

impl Cli {
    /// Returns the effective engine options for the selected command.
    fn engine_args(&self) -> EngineArgs {
        match &self.command {
            Some(Commands::Resolve(command)) => self.engine.merged(&command.engine),
            Some(Commands::Expand(command)) => self.engine.merged(&command.engine),
            Some(Commands::Check(command)) => self.engine.merged(&command.engine),
            None => self.engine.clone(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }

    /// Renders `context` followed by the error and its source chain.
    fn with_chain(context: &str, error: &(dyn StdError + 'static)) -> Self {
        let mut message = format!("{context}: {error}");
        let mut source = error.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self::new(message)
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let engine_args = cli.engine_args();
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::Resolve(command) => command_resolve(&engine_args, &command),
        Commands::Expand(command) => command_expand(&engine_args, &command),
        Commands::Check(_) => command_check(&engine_args),
    }
}

/// Installs a stderr subscriber filtered by `PROPLINE_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `resolve` command.
fn command_resolve(engine_args: &EngineArgs, command: &ResolveCommand) -> CliResult<ExitCode> {
    let method = resolve_method(command)?;
    let engine = build_engine(engine_args)?;
    let value = engine
        .invoke(&method, &Arguments::none())
        .map_err(|err| CliError::with_chain(&format!("failed to resolve {}", command.name), &err))?;
    write_stdout_line(&value.to_string())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `expand` command.
fn command_expand(engine_args: &EngineArgs, command: &ExpandCommand) -> CliResult<ExitCode> {
    let engine = build_engine(engine_args)?;
    let method = MethodDescriptor::variable_expander("expand");
    let value = engine
        .invoke(&method, &Arguments::single(command.text.clone()))
        .map_err(|err| CliError::with_chain("failed to expand text", &err))?;
    write_stdout_line(&value.to_string())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `check` command.
fn command_check(engine_args: &EngineArgs) -> CliResult<ExitCode> {
    let engine = build_engine(engine_args)?;
    let count = engine.resolver().len();
    write_stdout_line(&format!("configuration ok ({count} resolvers)"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the top-level help text.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Engine Construction
// ============================================================================

/// Loads configuration and builds the engine, with `-D` definitions first.
fn build_engine(engine_args: &EngineArgs) -> CliResult<Engine> {
    let config = load_config(engine_args.config.as_deref())?;
    let mut builder = Engine::builder();
    if !engine_args.defines.is_empty() {
        builder = builder.resolver(CommandLineResolver::from_definitions(&engine_args.defines));
    }
    let registry = ResolverRegistry::with_builtin_resolvers();
    let builder = config
        .apply(builder, &registry)
        .map_err(|err| CliError::with_chain("invalid configuration", &err))?;
    let engine =
        builder.build().map_err(|err| CliError::with_chain("failed to build engine", &err))?;
    debug!(resolvers = engine.resolver().len(), "engine ready");
    Ok(engine)
}

/// Loads the configuration, falling back to defaults when no file is named
/// and `./propline.toml` does not exist.
fn load_config(path: Option<&Path>) -> CliResult<PropLineConfig> {
    let implicit = path.is_none() && std::env::var_os(CONFIG_ENV_VAR).is_none();
    if implicit && !Path::new(DEFAULT_CONFIG_NAME).exists() {
        debug!("no configuration file, using defaults");
        return Ok(PropLineConfig::default());
    }
    PropLineConfig::load(path)
        .map_err(|err| CliError::with_chain("failed to load configuration", &err))
}

/// Builds the property method described by `resolve` arguments.
fn resolve_method(command: &ResolveCommand) -> CliResult<MethodDescriptor> {
    let property = PropertyName::new(command.name.clone())
        .map_err(|err| CliError::with_chain("invalid property name", &err))?;
    let type_descriptor: TypeDescriptor = command
        .type_descriptor
        .parse()
        .map_err(|err| CliError::with_chain("invalid --type", &err))?;
    let mut method = MethodDescriptor::property(command.name.clone(), property, type_descriptor)
        .with_strip_empty_values(command.strip_empty);
    if let Some(delimiter) = &command.delimiter {
        method = method.with_delimiter(delimiter.clone());
    }
    if let Some(format) = &command.format {
        method = method.with_date_time_format(format.clone());
    }
    for raw in &command.processors {
        method = method.with_processor(parse_directive(raw)?);
    }
    Ok(method)
}

/// Parses `name[:arg]` into a processor directive.
fn parse_directive(raw: &str) -> CliResult<ProcessorDirective> {
    let (name, argument) = match raw.split_once(':') {
        Some((name, argument)) => (name, Some(argument)),
        None => (raw, None),
    };
    if name.trim().is_empty() {
        return Err(CliError::new(format!("invalid --process value: {raw}")));
    }
    let directive = ProcessorDirective::new(name.trim());
    Ok(match argument {
        Some(argument) => directive.with_argument(argument),
        None => directive,
    })
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
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
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}
