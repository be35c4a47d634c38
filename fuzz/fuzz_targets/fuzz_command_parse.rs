//! Fuzz target for session command parsing.
//!
//! Arbitrary input lines should only ever produce a command or a parse error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use memsim::cli::Command;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = Command::parse(line);
    }
});
