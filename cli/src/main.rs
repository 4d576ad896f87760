//! CLI entrypoint for benchwrap
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;

use anyhow::{Result, anyhow, bail};
use benchwrap_application::{
    NoResultJournal, ParseResultsInput, ParseResultsUseCase, ResultJournal, RunBenchmarkInput,
    RunBenchmarkUseCase, RunProgressNotifier,
};
use benchwrap_domain::{AdapterError, AdapterRegistry, ErrorCategory, builtin_registry};
use benchwrap_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, FsResultReader, JsonlResultJournal,
    LocalProcessRunner, Severity,
};
use benchwrap_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ParseArgs, ProgressReporter, RunArgs,
    SimpleProgress,
};
use clap::{CommandFactory, Parser};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    let _logging = logging::init(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting benchwrap");

    let mut fatal = false;
    for issue in config.validate() {
        match issue.severity {
            Severity::Warning => warn!(field = %issue.field, "{}", issue.message),
            Severity::Error => {
                eprintln!("config error: {}: {}", issue.field, issue.message);
                fatal = true;
            }
        }
    }
    if fatal {
        bail!("invalid configuration");
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Text) | None => OutputFormat::Text,
    });

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::from(2));
    };

    // === Dependency Injection ===
    let registry = Arc::new(builtin_registry());
    let journal = open_journal(&config);

    let outcome = match command {
        Command::List => {
            print_listing(&registry, format);
            Ok(())
        }
        Command::Describe { adapter } => registry.lookup(&adapter).map(|adapter| {
            let descriptor = adapter.descriptor();
            match format {
                OutputFormat::Text => print!("{}", ConsoleFormatter::format_descriptor(descriptor)),
                OutputFormat::Json => {
                    println!("{}", ConsoleFormatter::format_descriptor_json(descriptor))
                }
            }
        }),
        Command::Run(args) => run_benchmark(args, registry, journal, &config, format, cli.quiet),
        Command::Parse(args) => parse_results(args, registry, journal, format),
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            match format {
                OutputFormat::Text => eprintln!("{}", ConsoleFormatter::format_error(&err)),
                OutputFormat::Json => println!("{}", ConsoleFormatter::format_error_json(&err)),
            }
            Ok(exit_code_for(&err))
        }
    }
}

fn open_journal(config: &FileConfig) -> Arc<dyn ResultJournal> {
    match &config.journal.path {
        Some(path) => match JsonlResultJournal::open(path) {
            Ok(journal) => {
                info!(path = %journal.path().display(), "Result journal enabled");
                Arc::new(journal)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot open result journal, continuing without it");
                Arc::new(NoResultJournal)
            }
        },
        None => Arc::new(NoResultJournal),
    }
}

fn print_listing(registry: &AdapterRegistry, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", ConsoleFormatter::format_adapter_list(registry)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_adapter_list_json(registry)),
    }
}

fn run_benchmark(
    args: RunArgs,
    registry: Arc<AdapterRegistry>,
    journal: Arc<dyn ResultJournal>,
    config: &FileConfig,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), AdapterError> {
    let runner = Arc::new(LocalProcessRunner::new(config.to_runner_config()));
    let use_case = RunBenchmarkUseCase::new(registry, runner).with_journal(journal);
    let input = RunBenchmarkInput::from_pairs(args.adapter, args.params);

    if args.dry_run {
        let planned = use_case.plan(&input)?;
        match format {
            OutputFormat::Text => print!("{}", ConsoleFormatter::format_plan(&planned)),
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_plan_json(&planned)),
        }
        return Ok(());
    }

    let envelope = if quiet || format == OutputFormat::Json {
        use_case.execute(input)?
    } else {
        let progress: Box<dyn RunProgressNotifier> = if std::io::stderr().is_terminal() {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        };
        use_case.execute_with_progress(input, progress.as_ref())?
    };

    match format {
        OutputFormat::Text => print!("{}", ConsoleFormatter::format(&envelope)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&envelope)),
    }
    Ok(())
}

fn parse_results(
    args: ParseArgs,
    registry: Arc<AdapterRegistry>,
    journal: Arc<dyn ResultJournal>,
    format: OutputFormat,
) -> Result<(), AdapterError> {
    let use_case =
        ParseResultsUseCase::new(registry, Arc::new(FsResultReader::new())).with_journal(journal);
    let envelope = use_case.execute(ParseResultsInput::new(args.adapter, args.source))?;

    match format {
        OutputFormat::Text => print!("{}", ConsoleFormatter::format(&envelope)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&envelope)),
    }
    Ok(())
}

/// 0 ok, 2 bad request, 3 program not found, 4 tool failed, 5 unparseable output
fn exit_code_for(err: &AdapterError) -> ExitCode {
    let code = match err.category() {
        ErrorCategory::Validation | ErrorCategory::UnknownAdapter => 2,
        ErrorCategory::Resolution => 3,
        ErrorCategory::Execution => 4,
        ErrorCategory::Parse => 5,
    };
    ExitCode::from(code)
}
