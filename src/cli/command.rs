// Copyright 2026 memsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsing of session command lines.

use std::str::FromStr;

use thiserror::Error;

use crate::allocator::{BlockId, Strategy};
use crate::cache::{CacheGeometry, CacheLevel};

/// One parsed session command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    InitMemory(usize),
    SetStrategy(Strategy),
    Malloc(usize),
    Free(BlockId),
    Dump,
    Stats,
    Access(u64),
    InitCache { level: CacheLevel, geometry: CacheGeometry },
    CacheStats,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("{command}: expected {expected}")]
    MissingArgument { command: &'static str, expected: &'static str },
    #[error("{command}: '{value}' is not a valid number")]
    InvalidNumber { command: &'static str, value: String },
    #[error("{command}: {message}")]
    InvalidValue { command: &'static str, message: String },
    #[error("{command}: unexpected argument '{token}'")]
    Unexpected { command: &'static str, token: String },
}

/// Decimal, or hexadecimal with a `0x` prefix.
fn parse_number<T>(command: &'static str, token: &str) -> Result<T, ParseError>
where
    T: FromStr + TryFrom<u64>,
{
    let invalid = || ParseError::InvalidNumber { command, value: token.to_string() };
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        let value = u64::from_str_radix(hex, 16).map_err(|_| invalid())?;
        return T::try_from(value).map_err(|_| invalid());
    }
    token.parse::<T>().map_err(|_| invalid())
}

struct Args<'a> {
    command: &'static str,
    tokens: std::slice::Iter<'a, &'a str>,
}

impl<'a> Args<'a> {
    fn next(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.tokens
            .next()
            .copied()
            .ok_or(ParseError::MissingArgument { command: self.command, expected })
    }

    fn number<T: FromStr + TryFrom<u64>>(&mut self, expected: &'static str) -> Result<T, ParseError> {
        let token = self.next(expected)?;
        parse_number(self.command, token)
    }

    /// Skip `keyword` if it is the next token.
    fn keyword(&mut self, keyword: &str) {
        if self.tokens.as_slice().first() == Some(&keyword) {
            self.tokens.next();
        }
    }

    fn finish(mut self, command: Command) -> Result<Command, ParseError> {
        match self.tokens.next() {
            Some(token) => Err(ParseError::Unexpected {
                command: self.command,
                token: token.to_string(),
            }),
            None => Ok(command),
        }
    }
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.split('#').next().unwrap_or_default();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, rest)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "init" => {
                let mut args = Args { command: "init", tokens: rest.iter() };
                args.keyword("size");
                let size = args.number("size N")?;
                args.finish(Command::InitMemory(size))?
            }
            "set" => {
                let mut args = Args { command: "set", tokens: rest.iter() };
                args.keyword("type");
                let value = args.next("type first_fit|best_fit|worst_fit")?;
                let strategy = value.parse::<Strategy>().map_err(|e| ParseError::InvalidValue {
                    command: "set",
                    message: e.to_string(),
                })?;
                args.finish(Command::SetStrategy(strategy))?
            }
            "malloc" => {
                let mut args = Args { command: "malloc", tokens: rest.iter() };
                let size = args.number("a size")?;
                args.finish(Command::Malloc(size))?
            }
            "free" => {
                let mut args = Args { command: "free", tokens: rest.iter() };
                let id = args.number("a block id")?;
                args.finish(Command::Free(BlockId(id)))?
            }
            "dump" => {
                let mut args = Args { command: "dump", tokens: rest.iter() };
                args.keyword("memory");
                args.finish(Command::Dump)?
            }
            "stats" => Args { command: "stats", tokens: rest.iter() }.finish(Command::Stats)?,
            "access" => {
                let mut args = Args { command: "access", tokens: rest.iter() };
                let address = args.number("an address")?;
                args.finish(Command::Access(address))?
            }
            "cache" => {
                let mut args = Args { command: "cache", tokens: rest.iter() };
                let target = args.next("l1|l2 SIZE BLOCK ASSOC, or stats")?;
                if target.eq_ignore_ascii_case("stats") {
                    args.finish(Command::CacheStats)?
                } else {
                    let level = target.parse::<CacheLevel>().map_err(|e| ParseError::InvalidValue {
                        command: "cache",
                        message: e.to_string(),
                    })?;
                    let size = args.number("SIZE BLOCK ASSOC")?;
                    let block_size = args.number("BLOCK ASSOC")?;
                    let associativity = args.number("ASSOC")?;
                    args.finish(Command::InitCache {
                        level,
                        geometry: CacheGeometry::new(size, block_size, associativity),
                    })?
                }
            }
            "help" | "?" => Command::Help,
            "exit" | "quit" => Command::Exit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// Short name used for spans and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitMemory(_) => "init",
            Self::SetStrategy(_) => "set",
            Self::Malloc(_) => "malloc",
            Self::Free(_) => "free",
            Self::Dump => "dump",
            Self::Stats => "stats",
            Self::Access(_) => "access",
            Self::InitCache { .. } => "cache",
            Self::CacheStats => "cache stats",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}
