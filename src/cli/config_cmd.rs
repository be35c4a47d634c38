// Copyright 2026 memsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Config CLI subcommands: show, defaults, validate.
//!
//! These commands read configuration without starting a session.

use std::path::Path;

use crate::config::{self, SimConfig};

/// Print effective config as key-value pairs to stdout.
pub fn run_show(path: Option<&Path>) -> i32 {
    match config::load(path) {
        Ok(cfg) => {
            print!("{}", format_config(&cfg));
            0
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            2
        }
    }
}

/// Print default config values (no file or env overrides) to stdout.
pub fn run_defaults() {
    print!("{}", format_config(&SimConfig::default()));
}

/// Validate configuration.
///
/// Returns 0 if valid, 2 if the config cannot be loaded or is invalid.
pub fn run_validate(path: Option<&Path>) -> i32 {
    let cfg = match config::load(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return 2;
        }
    };
    let problems = cfg.validate();
    for problem in &problems {
        eprintln!("WARNING: {}", problem);
    }
    if problems.is_empty() {
        println!("Configuration is valid.");
        0
    } else {
        2
    }
}

pub fn format_config(cfg: &SimConfig) -> String {
    cfg.to_env_pairs()
        .into_iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{clear_env_vars, ENV_LOCK};

    #[test]
    fn test_validate_passes_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        assert_eq!(run_validate(None), 0, "default config should pass validation");
    }

    #[test]
    fn test_validate_fails_on_bad_geometry() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        std::env::set_var("MEMSIM_L1_SIZE", "100");
        assert_eq!(run_validate(None), 2);
        clear_env_vars();
    }

    #[test]
    fn test_validate_fails_on_missing_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env_vars();
        assert_eq!(run_validate(Some(Path::new("/nonexistent/memsim.toml"))), 2);
    }

    #[test]
    fn test_format_config_includes_all_fields() {
        let text = format_config(&SimConfig::default());
        assert!(text.contains("MEMSIM_STRATEGY=first_fit\n"));
        assert!(text.contains("MEMSIM_L1_SIZE=256\n"));
        assert!(text.contains("MEMSIM_L2_ASSOC=4\n"));
        assert!(text.contains("MEMSIM_MEMORY_SIZE=\n"));
        assert_eq!(text.lines().count(), SimConfig::default().to_env_pairs().len());
    }
}
