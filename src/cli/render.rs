// Copyright 2026 memsim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Text and JSON rendering of simulator results.

use crate::allocator::{AllocatorStats, BlockDescriptor};
use crate::cache::{AccessOutcome, CacheStats, HierarchyStats};

/// How structured results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// `[0x0000 - 0x0063] USED (id=1)`, with an inclusive last address.
pub fn block_line(block: &BlockDescriptor) -> String {
    let range = format!("[0x{:04x} - 0x{:04x}]", block.start, block.last());
    match block.id {
        Some(id) if block.used => format!("{} USED (id={})", range, id),
        _ => format!("{} FREE", range),
    }
}

pub fn dump_text(blocks: impl Iterator<Item = BlockDescriptor>) -> String {
    let lines: Vec<String> = blocks.map(|b| block_line(&b)).collect();
    if lines.is_empty() {
        return "Memory not initialized".to_string();
    }
    lines.join("\n")
}

pub fn stats_text(stats: &AllocatorStats) -> String {
    format!(
        "Total memory: {}\n\
         Used memory: {}\n\
         Memory utilization: {:.2}%\n\
         Internal fragmentation: {} bytes\n\
         External fragmentation: {:.2}%\n\
         Allocation success rate: {}",
        stats.total_memory,
        stats.used,
        stats.utilization_pct,
        stats.internal_frag_bytes,
        stats.external_frag_pct,
        stats.success_rate,
    )
}

pub fn access_text(outcome: AccessOutcome) -> &'static str {
    match outcome {
        AccessOutcome::L1Hit => "L1 HIT",
        AccessOutcome::L1MissL2Hit => "L1 MISS\nL2 HIT",
        AccessOutcome::MissToMain => "L1 MISS\nL2 MISS -> Main Memory",
    }
}

fn cache_line(name: &str, stats: &CacheStats) -> String {
    format!(
        "{}: hits={} misses={} hit rate={}",
        name, stats.hits, stats.misses, stats.hit_rate
    )
}

pub fn cache_stats_text(stats: &HierarchyStats) -> String {
    format!("{}\n{}", cache_line("L1", &stats.l1), cache_line("L2", &stats.l2))
}

pub fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

pub const HELP: &str = "\
Commands:
  init size N                     initialize N bytes of memory
  set type first_fit|best_fit|worst_fit
  malloc N                        allocate N bytes
  free ID                         free a block
  dump                            list blocks
  stats                           allocator statistics
  access ADDR                     access an address through L1/L2
  cache l1|l2 SIZE BLOCK ASSOC    re-initialize one cache level
  cache stats                     cache hit/miss counters
  help                            this text
  exit                            leave";
