//! Flat address-space allocator with splitting and coalescing.

use serde::Serialize;

use super::block::{BlockId, Blocks, MemoryBlock};
use super::stats::AllocatorStats;
use super::strategy::Strategy;
use crate::SimError;

/// Result of a successful allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    pub id: BlockId,
    pub address: usize,
}

/// Result of a free request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeOutcome {
    /// Block released and merged with any free neighbours.
    Freed,
    /// No used block carries this id. State is unchanged.
    NotFound,
}

/// Request counters since the last `init`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocCounters {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    /// Sum of split remainders over every successful allocation. Never
    /// reduced by a free, saturates at `u64::MAX`.
    pub internal_fragmentation: u64,
}

/// Allocator over `[0, total_memory)`.
///
/// Blocks are kept in ascending address order and always partition the
/// whole space. After every `free` no two neighbouring blocks are both free.
#[derive(Debug, Clone)]
pub struct BlockAllocator {
    blocks: Vec<MemoryBlock>,
    total_memory: usize,
    next_id: u64,
    strategy: Strategy,
    counters: AllocCounters,
}

impl Default for BlockAllocator {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

impl BlockAllocator {
    /// Create an allocator with no memory. Call [`init`](Self::init) first.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            blocks: Vec::new(),
            total_memory: 0,
            next_id: 1,
            strategy,
            counters: AllocCounters::default(),
        }
    }

    /// Create and initialize in one step.
    pub fn with_size(total_size: usize, strategy: Strategy) -> Result<Self, SimError> {
        let mut allocator = Self::new(strategy);
        allocator.init(total_size)?;
        Ok(allocator)
    }

    /// Reset to a single free block spanning `[0, total_size)`.
    ///
    /// Clears every counter and restarts ids at 1. The placement strategy is
    /// kept.
    pub fn init(&mut self, total_size: usize) -> Result<(), SimError> {
        if total_size == 0 {
            tracing::warn!("rejected memory init with size 0");
            return Err(SimError::InvalidConfig("memory size must be positive".into()));
        }
        self.blocks = vec![MemoryBlock::free(0, total_size)];
        self.total_memory = total_size;
        self.next_id = 1;
        self.counters = AllocCounters::default();
        tracing::info!(total_size, "memory initialized");
        Ok(())
    }

    /// Carve `size` bytes out of a free block chosen by the active strategy.
    ///
    /// A zero-byte request succeeds on any free block and yields an empty
    /// used block at its start.
    pub fn allocate(&mut self, size: usize) -> Result<Allocation, SimError> {
        self.counters.requests += 1;

        let Some(idx) = self.strategy.placement().select(&self.blocks, size) else {
            self.counters.failures += 1;
            tracing::warn!(size, strategy = %self.strategy, "allocation failed");
            return Err(SimError::AllocationFailed { requested: size });
        };

        let chosen = &self.blocks[idx];
        let (start, remainder) = (chosen.start, chosen.size - size);
        let id = BlockId(self.next_id);
        self.next_id += 1;

        self.blocks[idx] = MemoryBlock::used(start, size, id);
        if remainder > 0 {
            self.blocks.insert(idx + 1, MemoryBlock::free(start + size, remainder));
        }

        self.counters.internal_fragmentation =
            self.counters.internal_fragmentation.saturating_add(remainder as u64);
        self.counters.successes += 1;
        tracing::debug!(id = id.0, address = start, size, remainder, "allocated");
        Ok(Allocation { id, address: start })
    }

    /// Release the block owned by `id`, then merge adjacent free blocks.
    pub fn free(&mut self, id: BlockId) -> FreeOutcome {
        let Some(block) = self.blocks.iter_mut().find(|b| b.is_used_by(id)) else {
            tracing::debug!(id = id.0, "free of unknown id ignored");
            return FreeOutcome::NotFound;
        };
        block.free = true;
        block.id = None;

        let before = self.blocks.len();
        self.coalesce();
        tracing::debug!(id = id.0, merged = before - self.blocks.len(), "freed");
        FreeOutcome::Freed
    }

    // Single left-to-right sweep. After a merge the same index is checked
    // again so runs of any length collapse.
    fn coalesce(&mut self) {
        let mut i = 0;
        while i + 1 < self.blocks.len() {
            if self.blocks[i].free && self.blocks[i + 1].free {
                let absorbed = self.blocks.remove(i + 1);
                self.blocks[i].size += absorbed.size;
            } else {
                i += 1;
            }
        }
    }

    /// Blocks in ascending address order.
    pub fn dump(&self) -> Blocks<'_> {
        Blocks::new(&self.blocks)
    }

    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats::collect(self)
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        tracing::debug!(%strategy, "placement strategy changed");
        self.strategy = strategy;
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn total_memory(&self) -> usize {
        self.total_memory
    }

    pub fn counters(&self) -> AllocCounters {
        self.counters
    }

    pub fn is_initialized(&self) -> bool {
        self.total_memory > 0
    }

    /// Verify the partition and coalescing invariants.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut expected_start = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.start != expected_start {
                return Err(format!(
                    "block {} starts at {} but previous block ends at {}",
                    i, block.start, expected_start
                ));
            }
            if block.free == block.id.is_some() {
                return Err(format!("block {} at {} has inconsistent id", i, block.start));
            }
            expected_start = block.end();
        }
        if expected_start != self.total_memory {
            return Err(format!(
                "blocks cover {} bytes of {}",
                expected_start, self.total_memory
            ));
        }
        if let Some(pair) = self.blocks.windows(2).find(|w| w[0].free && w[1].free) {
            return Err(format!("adjacent free blocks at {} and {}", pair[0].start, pair[1].start));
        }
        Ok(())
    }
}
