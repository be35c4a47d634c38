//! Fuzz target for allocate/free sequences.
//!
//! Any sequence of operations must leave the block list a contiguous
//! partition of memory with no adjacent free blocks.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memsim::allocator::{BlockAllocator, BlockId, Strategy};

#[derive(Debug, Arbitrary)]
enum Op {
    Alloc(u16),
    Free(u8),
    SetStrategy(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    memory: u16,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let Ok(mut allocator) = BlockAllocator::with_size(input.memory as usize, Strategy::FirstFit)
    else {
        return;
    };

    for op in input.ops {
        match op {
            Op::Alloc(size) => {
                let _ = allocator.allocate(size as usize);
            }
            Op::Free(id) => {
                allocator.free(BlockId(id as u64));
            }
            Op::SetStrategy(n) => {
                allocator.set_strategy(Strategy::ALL[n as usize % Strategy::ALL.len()]);
            }
        }
        if let Err(e) = allocator.check_invariants() {
            panic!("invariant violated: {}", e);
        }
    }
});
