//! Fuzz target for cache hierarchy accesses with arbitrary geometries.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memsim::cache::{CacheGeometry, CacheHierarchy};

#[derive(Debug, Arbitrary)]
struct Input {
    l1: (u16, u8, u8),
    l2: (u16, u8, u8),
    addresses: Vec<u64>,
}

fn geometry((size, block, assoc): (u16, u8, u8)) -> CacheGeometry {
    CacheGeometry::new(size as usize, block as usize, assoc as usize)
}

fuzz_target!(|input: Input| {
    // Invalid geometries must be rejected, never panic.
    let Ok(mut caches) = CacheHierarchy::new(geometry(input.l1), geometry(input.l2)) else {
        return;
    };

    let count = input.addresses.len() as u64;
    for address in input.addresses {
        caches.access_memory(address);
    }

    let stats = caches.stats();
    assert_eq!(stats.l1.accesses, count);
    assert_eq!(stats.l2.accesses, stats.l1.misses);
});
