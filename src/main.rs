//! memsim entry point.
//!
//! ## CLI Subcommands
//!
//! - `memsim` or `memsim run` - Interactive allocator/cache session (default)
//! - `memsim config show|defaults|validate` - Inspect configuration
//! - `memsim help` / `memsim version`

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use memsim::cli::{self, config_cmd, parse_run_options, RunOptions, Session};
use memsim::config;
use memsim::telemetry::init_logging;
use memsim::Simulator;

/// Exit code for configuration errors.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("run");

    match command {
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("memsim {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        "run" => run_with_args(args.get(2..).unwrap_or_default()),
        flag if flag.starts_with('-') => run_with_args(&args[1..]),
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            let options = match parse_run_options(args.get(3..).unwrap_or_default()) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::from(EXIT_CONFIG);
                }
            };
            let path = options.config_path.as_deref();
            match subcommand {
                "show" => ExitCode::from(config_cmd::run_show(path) as u8),
                "defaults" => {
                    config_cmd::run_defaults();
                    ExitCode::SUCCESS
                }
                "validate" => ExitCode::from(config_cmd::run_validate(path) as u8),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn run_with_args(args: &[String]) -> ExitCode {
    match parse_run_options(args) {
        Ok(options) => run_session(options),
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn run_session(options: RunOptions) -> ExitCode {
    let config = match config::load(options.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    if let Err(e) = init_logging(&config.log) {
        eprintln!("Logging error: {}", e);
        return ExitCode::from(EXIT_CONFIG);
    }

    let sim = match Simulator::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            tracing::error!(error = %e, "simulator configuration rejected");
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    tracing::info!(strategy = %config.strategy, l1 = ?config.l1, l2 = ?config.l2, "session starting");

    let stdin = io::stdin();
    let prompt = options.prompt.unwrap_or_else(|| stdin.is_terminal());
    if prompt {
        println!("Memory Management + Cache Simulator (type 'help' for commands)");
    }

    let mut session = Session::new(sim, io::stdout().lock())
        .with_format(options.format)
        .with_prompt(prompt);
    match session.run(stdin.lock()) {
        Ok(summary) => {
            tracing::info!(commands = summary.commands, errors = summary.errors, "session ended");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("I/O error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "memsim - block allocator and cache hierarchy simulator v{}

USAGE:
    memsim [COMMAND] [OPTIONS]

COMMANDS:
    run          Interactive session (default when no command given)
    config       Inspect configuration (show, defaults, validate)
    version      Show version information
    help         Show this help message

OPTIONS:
    -c, --config FILE  Load configuration from a TOML file
    --json             Print dump/stats/cache stats as JSON
    --prompt           Always print the '> ' prompt
    --no-prompt        Never print the prompt

SESSION COMMANDS:
{}

ENVIRONMENT:
    MEMSIM_MEMORY_SIZE, MEMSIM_STRATEGY, MEMSIM_L1_SIZE, MEMSIM_L1_BLOCK,
    MEMSIM_L1_ASSOC, MEMSIM_L2_SIZE, MEMSIM_L2_BLOCK, MEMSIM_L2_ASSOC,
    MEMSIM_LOG, MEMSIM_LOG_FORMAT, MEMSIM_LOG_FILE

EXIT CODES:
    0  Success
    1  Failure
    2  Configuration error
",
        version,
        cli::render::HELP
    );
}
