//! Utilization and fragmentation figures derived from allocator state.

use serde::Serialize;

use super::block_allocator::BlockAllocator;
use crate::Rate;

/// Snapshot of allocator statistics.
///
/// Percentages are of `total_memory` and are 0 for an uninitialized
/// allocator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocatorStats {
    pub total_memory: usize,
    pub used: usize,
    pub free_total: usize,
    pub largest_free: usize,
    pub utilization_pct: f64,
    /// Cumulative bytes over all allocations since init.
    pub internal_frag_bytes: u64,
    pub external_frag_pct: f64,
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub success_rate: Rate,
}

impl AllocatorStats {
    pub fn collect(allocator: &BlockAllocator) -> Self {
        let mut used = 0;
        let mut free_total = 0;
        let mut largest_free = 0;
        for block in allocator.blocks() {
            if block.free {
                free_total += block.size;
                largest_free = largest_free.max(block.size);
            } else {
                used += block.size;
            }
        }

        let total = allocator.total_memory();
        let counters = allocator.counters();
        Self {
            total_memory: total,
            used,
            free_total,
            largest_free,
            utilization_pct: percent_of(used, total),
            internal_frag_bytes: counters.internal_fragmentation,
            external_frag_pct: percent_of(free_total - largest_free, total),
            requests: counters.requests,
            successes: counters.successes,
            failures: counters.failures,
            success_rate: Rate::from_counts(counters.successes, counters.requests),
        }
    }
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
