// crates/dndltr-regress-cli/src/main.rs
// ============================================================================
// Module: dndltr Regression CLI Entry Point
// Description: Command dispatcher for the emulator regression harness.
// Purpose: Run, list, and configure the ROM corpus from the command line.
// Dependencies: clap, dndltr-regress-config, dndltr-regress-core, thiserror.
// ============================================================================

//! ## Overview
//! `dndltr-regress` drives the `dndltr` emulator over every suite in the
//! corpus and compares each rendered frame with its reference bitmap. The
//! process exit status is the run's result code: `0` when everything passed,
//! the emulator's own status when it failed, `-1` (255) on a mismatch, and
//! `-2` (254) on harness faults. All user-facing strings are routed through
//! the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dndltr_regress_cli::console::ConsoleReporter;
use dndltr_regress_cli::logging::init_logging;
use dndltr_regress_cli::t;
use dndltr_regress_config::ConfigOverrides;
use dndltr_regress_config::HarnessConfig;
use dndltr_regress_config::ResolvedPaths;
use dndltr_regress_core::DiscoveryOrder;
use dndltr_regress_core::Driver;
use dndltr_regress_core::PlanError;
use dndltr_regress_core::RunError;
use dndltr_regress_core::discover_cases;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dndltr-regress", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the regression corpus against the emulator.
    Run(RunCommand),
    /// List discovered suites and cases without running the emulator.
    List(ListCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration.
    Validate(ConfigValidateCommand),
}

/// Options shared by every command that locates the corpus.
#[derive(Args, Debug, Default)]
struct CorpusArgs {
    /// Config file path (defaults to dndltr-regress.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Corpus root containing `tests/` and `bin/`.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,
}

/// Options selecting what to visit.
#[derive(Args, Debug, Default)]
struct DiscoveryArgs {
    /// Visit order for suites and cases.
    #[arg(long, value_enum, value_name = "ORDER")]
    order: Option<OrderArg>,
    /// Restrict the run to the named suite (repeatable).
    #[arg(long = "suite", value_name = "NAME", action = ArgAction::Append)]
    suites: Vec<String>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Default)]
struct RunCommand {
    /// Corpus location options.
    #[command(flatten)]
    corpus: CorpusArgs,
    /// Discovery options.
    #[command(flatten)]
    discovery: DiscoveryArgs,
    /// Emulator executable.
    #[arg(long, value_name = "PATH")]
    binary: Option<PathBuf>,
    /// Frames to run before the emulator renders its output.
    #[arg(long, value_name = "N")]
    frames: Option<u32>,
    /// Resolution scale passed as `-x` (1-5).
    #[arg(long, value_name = "N")]
    scale: Option<u8>,
    /// Kill an emulator run after this many seconds.
    #[arg(long = "timeout-secs", value_name = "N")]
    timeout_secs: Option<u64>,
    /// Discard emulator stderr.
    #[arg(long = "quiet-emulator", action = ArgAction::SetTrue)]
    quiet_emulator: bool,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
struct ListCommand {
    /// Corpus location options.
    #[command(flatten)]
    corpus: CorpusArgs,
    /// Discovery options.
    #[command(flatten)]
    discovery: DiscoveryArgs,
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Corpus location options.
    #[command(flatten)]
    corpus: CorpusArgs,
}

/// Discovery order accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum OrderArg {
    /// Sorted by name.
    Sorted,
    /// Raw directory-listing order.
    Listing,
}

impl From<OrderArg> for DiscoveryOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Sorted => Self::Sorted,
            OrderArg::Listing => Self::Listing,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-rendered error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
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
    init_logging().map_err(|error| CliError::new(t!("logging.init_failed", error = error)))?;

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    match cli.command.unwrap_or_else(|| Commands::Run(RunCommand::default())) {
        Commands::Run(command) => command_run(&command),
        Commands::List(command) => command_list(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let overrides = ConfigOverrides {
        root: command.corpus.root.clone(),
        binary: command.binary.clone(),
        frames: command.frames,
        scale: command.scale,
        timeout_secs: command.timeout_secs,
        order: command.discovery.order.map(DiscoveryOrder::from),
        quiet_emulator: command.quiet_emulator,
    };
    let (config, paths) = load_config(&command.corpus, &overrides)?;
    let plan = config.run_plan(&paths, command.discovery.suites.clone());
    let runner = config.runner(&paths);
    debug!(
        tests_dir = %plan.tests_dir.display(),
        binary = %runner.program().display(),
        order = plan.order.as_str(),
        "starting run"
    );

    let mut reporter = ConsoleReporter::new(std::io::stdout(), std::io::stderr());
    let summary = Driver::new(&plan, &runner).run(&mut reporter).map_err(|err| match err {
        RunError::UnknownSuites(names) => {
            CliError::new(t!("run.unknown_suites", suites = names.join(", ")))
        }
        RunError::Report(err) => CliError::new(output_error("stdout", &err)),
    })?;
    debug!(
        code = summary.code.get(),
        suites_passed = summary.suites_passed,
        cases_passed = summary.cases_passed,
        "run finished"
    );
    Ok(ExitCode::from(summary.code.exit_status()))
}

// ============================================================================
// SECTION: List Command
// ============================================================================

/// Executes the `list` command.
fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let overrides = ConfigOverrides {
        root: command.corpus.root.clone(),
        order: command.discovery.order.map(DiscoveryOrder::from),
        ..ConfigOverrides::default()
    };
    let (config, paths) = load_config(&command.corpus, &overrides)?;
    let plan = config.run_plan(&paths, command.discovery.suites.clone());
    let suites = plan.suites().map_err(|err| match err {
        PlanError::UnknownSuites(names) => {
            CliError::new(t!("run.unknown_suites", suites = names.join(", ")))
        }
        PlanError::Discovery(error) => CliError::new(t!("list.failed", error = error)),
    })?;
    if suites.is_empty() {
        write_stdout_line(&t!("list.none", path = plan.tests_dir.display()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    for suite in &suites {
        let cases = discover_cases(suite, plan.order).map_err(|error| {
            CliError::new(t!("list.case_failed", suite = suite.name, error = error))
        })?;
        write_stdout_line(&t!("list.suite", suite = suite.name, count = cases.len()))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        for case in &cases {
            write_stdout_line(&t!("list.case", case = case.name))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let overrides = ConfigOverrides {
        root: command.corpus.root.clone(),
        ..ConfigOverrides::default()
    };
    let _config = load_config(&command.corpus, &overrides)?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Helpers
// ============================================================================

/// Loads the config, applies overrides, and resolves corpus paths.
///
/// The default config file is looked up in the corpus root named on the
/// command line, or the working directory when none is given.
fn load_config(
    corpus: &CorpusArgs,
    overrides: &ConfigOverrides,
) -> CliResult<(HarnessConfig, ResolvedPaths)> {
    let cwd = std::env::current_dir()
        .map_err(|error| CliError::new(t!("main.cwd_failed", error = error)))?;
    let search_dir = search_dir(&cwd, corpus.root.as_deref());
    let mut config = HarnessConfig::load(corpus.config.as_deref(), &search_dir)
        .map_err(|error| CliError::new(t!("config.load_failed", error = error)))?;
    config
        .apply(overrides)
        .map_err(|error| CliError::new(t!("config.load_failed", error = error)))?;
    let paths = config.resolve_paths(&cwd);
    Ok((config, paths))
}

/// Returns the directory searched for the default config file.
fn search_dir(cwd: &Path, root: Option<&Path>) -> PathBuf {
    root.map_or_else(|| cwd.to_path_buf(), |root| cwd.join(root))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
