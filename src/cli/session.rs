// Copyright 2026 memsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented command session over a [`Simulator`].

use std::io::{self, BufRead, Write};

use super::command::{Command, ParseError};
use super::render::{self, OutputFormat};
use crate::allocator::FreeOutcome;
use crate::telemetry::{CommandSpan, SpanExt};
use crate::{SimError, Simulator};

/// Counts reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Continue,
    Exit,
}

enum LineOutcome {
    Blank,
    Ran(Control),
    /// Error already reported to the output.
    Failed,
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Sim(#[from] SimError),
}

pub struct Session<W: Write> {
    sim: Simulator,
    out: W,
    format: OutputFormat,
    prompt: bool,
}

impl<W: Write> Session<W> {
    pub fn new(sim: Simulator, out: W) -> Self {
        Self { sim, out, format: OutputFormat::Text, prompt: false }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Print `> ` before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Process lines until `exit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut lines = input.lines().enumerate();
        loop {
            if self.prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some((idx, line)) = lines.next() else { break };
            let line = line?;
            match self.execute_line(idx + 1, &line)? {
                LineOutcome::Blank => {}
                LineOutcome::Ran(control) => {
                    summary.commands += 1;
                    if control == Control::Exit {
                        break;
                    }
                }
                LineOutcome::Failed => {
                    summary.commands += 1;
                    summary.errors += 1;
                }
            }
        }
        self.out.flush()?;
        tracing::debug!(commands = summary.commands, errors = summary.errors, "session finished");
        Ok(summary)
    }

    fn execute_line(&mut self, line_no: usize, line: &str) -> io::Result<LineOutcome> {
        let command = match Command::parse(line) {
            Ok(None) => return Ok(LineOutcome::Blank),
            Ok(Some(command)) => Ok(command),
            Err(e) => Err(CommandError::from(e)),
        };
        let span = CommandSpan::new(
            line_no,
            command.as_ref().map(Command::name).unwrap_or("invalid"),
        );
        let _enter = span.enter();

        let result = match command {
            Ok(command) => self.execute(command)?,
            Err(e) => Err(e),
        };
        span.record_result(&result);
        match result {
            Ok(control) => Ok(LineOutcome::Ran(control)),
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                Ok(LineOutcome::Failed)
            }
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<Result<Control, CommandError>> {
        let json = self.format == OutputFormat::Json;
        match command {
            Command::InitMemory(size) => {
                if let Err(e) = self.sim.init_memory(size) {
                    return Ok(Err(e.into()));
                }
                writeln!(self.out, "Initialized memory with size {} bytes", size)?;
            }
            Command::SetStrategy(strategy) => {
                self.sim.set_strategy(strategy);
                writeln!(self.out, "Allocator set to {}", strategy)?;
            }
            Command::Malloc(size) => match self.sim.allocate(size) {
                Ok(a) => writeln!(self.out, "Allocated block id={} at address=0x{:04x}", a.id, a.address)?,
                Err(SimError::AllocationFailed { .. }) => writeln!(self.out, "Allocation failed")?,
                Err(e) => return Ok(Err(e.into())),
            },
            Command::Free(id) => match self.sim.free(id) {
                FreeOutcome::Freed => writeln!(self.out, "Block {} freed and merged", id)?,
                FreeOutcome::NotFound => writeln!(self.out, "Block {} not found", id)?,
            },
            Command::Dump => {
                let text = if json {
                    render::to_json(&self.sim.dump().collect::<Vec<_>>())
                } else {
                    render::dump_text(self.sim.dump())
                };
                writeln!(self.out, "{}", text)?;
            }
            Command::Stats => {
                let stats = self.sim.stats();
                let text = if json { render::to_json(&stats) } else { render::stats_text(&stats) };
                writeln!(self.out, "{}", text)?;
            }
            Command::Access(address) => {
                let outcome = self.sim.access_memory(address);
                writeln!(self.out, "{}", render::access_text(outcome))?;
            }
            Command::InitCache { level, geometry } => {
                if let Err(e) = self.sim.init_cache(
                    level,
                    geometry.size,
                    geometry.block_size,
                    geometry.associativity,
                ) {
                    return Ok(Err(e.into()));
                }
                let sets = self.sim.caches().level(level).num_sets();
                writeln!(self.out, "{} cache initialized with {} sets", level, sets)?;
            }
            Command::CacheStats => {
                let stats = self.sim.cache_stats();
                let text = if json { render::to_json(&stats) } else { render::cache_stats_text(&stats) };
                writeln!(self.out, "{}", text)?;
            }
            Command::Help => writeln!(self.out, "{}", render::HELP)?,
            Command::Exit => return Ok(Ok(Control::Exit)),
        }
        Ok(Ok(Control::Continue))
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn into_parts(self) -> (Simulator, W) {
        (self.sim, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn run(script: &str) -> (String, SessionSummary) {
        let sim = Simulator::new(&SimConfig::default()).unwrap();
        let mut session = Session::new(sim, Vec::new());
        let summary = session.run(script.as_bytes()).unwrap();
        let (_, out) = session.into_parts();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_allocate_and_dump() {
        let (out, summary) = run("init size 1024\nmalloc 100\nmalloc 200\ndump memory\n");
        assert_eq!(
            out,
            "Initialized memory with size 1024 bytes\n\
             Allocated block id=1 at address=0x0000\n\
             Allocated block id=2 at address=0x0064\n\
             [0x0000 - 0x0063] USED (id=1)\n\
             [0x0064 - 0x012b] USED (id=2)\n\
             [0x012c - 0x03ff] FREE\n"
        );
        assert_eq!(summary, SessionSummary { commands: 4, errors: 0 });
    }

    #[test]
    fn test_exit_stops_processing() {
        let (out, summary) = run("init size 64\nexit\nmalloc 8\n");
        assert!(!out.contains("Allocated"));
        assert_eq!(summary.commands, 2);
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let (out, summary) = run("bogus\ninit size 0\nmalloc 8\nfree 3\n");
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("Error: unknown command"));
        assert!(lines[1].starts_with("Error: Invalid configuration"));
        assert_eq!(lines[2], "Allocation failed");
        assert_eq!(lines[3], "Block 3 not found");
        assert_eq!(summary, SessionSummary { commands: 4, errors: 2 });
    }

    #[test]
    fn test_access_cascade_output() {
        let (out, _) = run("access 0\naccess 0\n");
        assert_eq!(out, "L1 MISS\nL2 MISS -> Main Memory\nL1 HIT\n");
    }

    #[test]
    fn test_json_stats() {
        let sim = Simulator::new(&SimConfig::default()).unwrap();
        let mut session = Session::new(sim, Vec::new()).with_format(OutputFormat::Json);
        session.run("init size 100\nmalloc 10\nstats\n".as_bytes()).unwrap();
        let (_, out) = session.into_parts();
        let out = String::from_utf8(out).unwrap();
        let json_start = out.find('{').unwrap();
        let stats: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
        assert_eq!(stats["used"], 10);
        assert_eq!(stats["internal_frag_bytes"], 90);
    }

    #[test]
    fn test_prompt_written_per_line() {
        let sim = Simulator::new(&SimConfig::default()).unwrap();
        let mut session = Session::new(sim, Vec::new()).with_prompt(true);
        session.run("help\n".as_bytes()).unwrap();
        let (_, out) = session.into_parts();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("> Commands:"));
        assert!(out.ends_with("> "));
    }
}
