// Copyright 2026 memsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text adapter over the simulator.
//!
//! ## Usage
//!
//! ```bash
//! memsim                          # interactive session (default)
//! memsim run --config sim.toml    # session with a config file
//! memsim run --json < script.txt  # JSON output for dump/stats
//! memsim config show              # effective configuration
//! ```

pub mod command;
pub mod config_cmd;
pub mod render;
mod session;

use std::path::PathBuf;

pub use command::{Command, ParseError};
pub use render::OutputFormat;
pub use session::{Session, SessionSummary};

/// Options accepted by `memsim run` and `memsim config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub format: OutputFormat,
    /// `None` means decide from whether stdin is a terminal.
    pub prompt: Option<bool>,
}

/// Parse flags following the subcommand.
pub fn parse_run_options(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().ok_or("--config requires a file path")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "--json" => options.format = OutputFormat::Json,
            "--prompt" => options.prompt = Some(true),
            "--no-prompt" => options.prompt = Some(false),
            other => return Err(format!("unknown option '{}'", other)),
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse_run_options(&[]).unwrap(), RunOptions::default());
    }

    #[test]
    fn test_all_flags() {
        let options = parse_run_options(&args(&["--config", "sim.toml", "--json", "--no-prompt"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("sim.toml")));
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(options.prompt, Some(false));
    }

    #[test]
    fn test_errors() {
        assert!(parse_run_options(&args(&["--config"])).is_err());
        assert!(parse_run_options(&args(&["--verbose"])).is_err());
    }
}
