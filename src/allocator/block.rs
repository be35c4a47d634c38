//! Blocks of the simulated address space.

use std::fmt;

use serde::Serialize;

/// Identifier handed out for each successful allocation. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contiguous run of bytes, either free or owned by one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    pub start: usize,
    pub size: usize,
    pub free: bool,
    pub id: Option<BlockId>,
}

impl MemoryBlock {
    pub fn free(start: usize, size: usize) -> Self {
        Self { start, size, free: true, id: None }
    }

    pub fn used(start: usize, size: usize, id: BlockId) -> Self {
        Self { start, size, free: false, id: Some(id) }
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    pub fn is_used_by(&self, id: BlockId) -> bool {
        !self.free && self.id == Some(id)
    }
}

/// Read-only view of a block as reported by a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockDescriptor {
    /// First byte of the block.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
    pub used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
}

impl BlockDescriptor {
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Last byte covered by the block.
    pub fn last(&self) -> usize {
        self.end.saturating_sub(1)
    }
}

impl From<&MemoryBlock> for BlockDescriptor {
    fn from(block: &MemoryBlock) -> Self {
        Self {
            start: block.start,
            end: block.end(),
            used: !block.free,
            id: block.id,
        }
    }
}

/// Lazy iterator over the block list in ascending address order.
///
/// Cloning restarts from the clone point; calling `dump()` again restarts
/// from address zero.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    inner: std::slice::Iter<'a, MemoryBlock>,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(blocks: &'a [MemoryBlock]) -> Self {
        Self { inner: blocks.iter() }
    }
}

impl Iterator for Blocks<'_> {
    type Item = BlockDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(BlockDescriptor::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Blocks<'_> {}
