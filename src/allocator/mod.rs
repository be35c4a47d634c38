//! Dynamic memory allocator over a single flat address space.
//!
//! Placement is pluggable (first, best or worst fit), blocks are split on
//! allocation and coalesced on free.

mod block;
mod block_allocator;
mod stats;
mod strategy;

pub use block::{BlockDescriptor, BlockId, Blocks, MemoryBlock};
pub use block_allocator::{AllocCounters, Allocation, BlockAllocator, FreeOutcome};
pub use stats::AllocatorStats;
pub use strategy::{BestFit, FirstFit, PlacementStrategy, Strategy, WorstFit};
