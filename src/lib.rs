//! memsim
//!
//! Teaching simulator for two memory-subsystem abstractions:
//!
//! - **Allocator**: a flat address space split into blocks, with first, best
//!   and worst fit placement, splitting on allocation and coalescing on free.
//! - **Cache hierarchy**: two independently sized set-associative caches
//!   (L1, L2) with FIFO replacement and no inclusion between levels.
//!
//! The two engines share nothing but the [`Simulator`] that owns them. Every
//! operation returns a structured result; rendering to text is done by
//! [`cli`].

pub mod allocator;
pub mod cache;
pub mod cli;
pub mod config;
pub mod telemetry;

mod error;
mod rate;

pub use error::SimError;
pub use rate::Rate;

use allocator::{Allocation, AllocatorStats, BlockAllocator, BlockId, Blocks, FreeOutcome, Strategy};
use cache::{AccessOutcome, CacheGeometry, CacheHierarchy, CacheLevel, HierarchyStats};
use config::SimConfig;

/// Owns one allocator and one cache hierarchy.
#[derive(Debug, Clone)]
pub struct Simulator {
    allocator: BlockAllocator,
    caches: CacheHierarchy,
}

impl Simulator {
    /// Build from configuration. Memory is initialized only if
    /// `config.memory_size` is set.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let caches = CacheHierarchy::new(config.l1, config.l2)?;
        let allocator = match config.memory_size {
            Some(size) => BlockAllocator::with_size(size, config.strategy)?,
            None => BlockAllocator::new(config.strategy),
        };
        Ok(Self { allocator, caches })
    }

    pub fn init_memory(&mut self, size: usize) -> Result<(), SimError> {
        self.allocator.init(size)
    }

    pub fn allocate(&mut self, size: usize) -> Result<Allocation, SimError> {
        self.allocator.allocate(size)
    }

    pub fn free(&mut self, id: BlockId) -> FreeOutcome {
        self.allocator.free(id)
    }

    pub fn dump(&self) -> Blocks<'_> {
        self.allocator.dump()
    }

    pub fn stats(&self) -> AllocatorStats {
        self.allocator.stats()
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.allocator.set_strategy(strategy);
    }

    pub fn init_cache(
        &mut self,
        level: CacheLevel,
        size: usize,
        block_size: usize,
        associativity: usize,
    ) -> Result<(), SimError> {
        self.caches
            .init_level(level, CacheGeometry::new(size, block_size, associativity))
    }

    pub fn access_memory(&mut self, address: u64) -> AccessOutcome {
        self.caches.access_memory(address)
    }

    pub fn cache_stats(&self) -> HierarchyStats {
        self.caches.stats()
    }

    pub fn allocator(&self) -> &BlockAllocator {
        &self.allocator
    }

    pub fn caches(&self) -> &CacheHierarchy {
        &self.caches
    }
}
