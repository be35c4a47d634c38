//! Set-associative cache with FIFO replacement.

use serde::{Deserialize, Serialize};

use super::set::CacheSet;
use crate::{Rate, SimError};

/// Size parameters of one cache level, all in bytes except associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheGeometry {
    pub size: usize,
    pub block_size: usize,
    pub associativity: usize,
}

impl CacheGeometry {
    pub fn new(size: usize, block_size: usize, associativity: usize) -> Self {
        Self { size, block_size, associativity }
    }

    /// `size / (block_size * associativity)`, which must divide exactly and
    /// be positive.
    pub fn num_sets(&self) -> Result<usize, SimError> {
        if self.block_size == 0 {
            return Err(SimError::InvalidConfig("cache block size must be positive".into()));
        }
        if self.associativity == 0 {
            return Err(SimError::InvalidConfig("cache associativity must be positive".into()));
        }
        let set_bytes = self.block_size.checked_mul(self.associativity).ok_or_else(|| {
            SimError::InvalidConfig("block size * associativity overflows".into())
        })?;
        if self.size % set_bytes != 0 {
            return Err(SimError::InvalidConfig(format!(
                "cache size {} is not a multiple of block size * associativity ({})",
                self.size, set_bytes
            )));
        }
        let num_sets = self.size / set_bytes;
        if num_sets == 0 {
            return Err(SimError::InvalidConfig(format!(
                "cache size {} yields no sets",
                self.size
            )));
        }
        Ok(num_sets)
    }
}

/// An address split into block address, set index and tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressParts {
    pub block_addr: u64,
    pub set_index: usize,
    pub tag: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Hit,
    Miss,
}

impl Probe {
    pub fn is_hit(self) -> bool {
        self == Probe::Hit
    }
}

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub accesses: u64,
    pub hit_rate: Rate,
}

#[derive(Debug, Clone)]
pub struct SetAssociativeCache {
    geometry: CacheGeometry,
    num_sets: usize,
    sets: Vec<CacheSet>,
    hits: u64,
    misses: u64,
}

impl SetAssociativeCache {
    /// Build a cache with every line invalid.
    pub fn new(geometry: CacheGeometry) -> Result<Self, SimError> {
        let num_sets = geometry.num_sets()?;
        let sets = (0..num_sets)
            .map(|_| CacheSet::new(geometry.associativity))
            .collect();
        Ok(Self { geometry, num_sets, sets, hits: 0, misses: 0 })
    }

    pub fn decompose(&self, address: u64) -> AddressParts {
        let block_addr = address / self.geometry.block_size as u64;
        let num_sets = self.num_sets as u64;
        AddressParts {
            block_addr,
            // remainder is below num_sets, which fits in usize
            set_index: (block_addr % num_sets) as usize,
            tag: block_addr / num_sets,
        }
    }

    /// Look up `address`, installing it on a miss.
    ///
    /// Hits leave the install order untouched.
    pub fn access(&mut self, address: u64) -> Probe {
        let parts = self.decompose(address);
        let set = &mut self.sets[parts.set_index];
        if set.contains(parts.tag) {
            self.hits += 1;
            return Probe::Hit;
        }

        self.misses += 1;
        let install = set.install(parts.tag);
        tracing::trace!(
            address,
            set = parts.set_index,
            tag = parts.tag,
            slot = install.slot,
            evicted = ?install.evicted,
            "cache miss"
        );
        Probe::Miss
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            accesses: self.hits + self.misses,
            hit_rate: Rate::from_counts(self.hits, self.hits + self.misses),
        }
    }

    pub fn geometry(&self) -> CacheGeometry {
        self.geometry
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    pub fn set(&self, index: usize) -> Option<&CacheSet> {
        self.sets.get(index)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(size: usize, block: usize, assoc: usize) -> SetAssociativeCache {
        SetAssociativeCache::new(CacheGeometry::new(size, block, assoc)).unwrap()
    }

    #[test]
    fn test_num_sets() {
        assert_eq!(CacheGeometry::new(256, 16, 2).num_sets().unwrap(), 8);
        assert_eq!(CacheGeometry::new(64, 16, 4).num_sets().unwrap(), 1);
    }

    #[test]
    fn test_invalid_geometry() {
        for geometry in [
            CacheGeometry::new(256, 0, 2),
            CacheGeometry::new(256, 16, 0),
            CacheGeometry::new(250, 16, 2),
            CacheGeometry::new(0, 16, 2),
            CacheGeometry::new(16, 16, 2),
            CacheGeometry::new(256, usize::MAX, 2),
        ] {
            assert!(
                matches!(SetAssociativeCache::new(geometry), Err(SimError::InvalidConfig(_))),
                "{:?} should be rejected",
                geometry
            );
        }
    }

    #[test]
    fn test_decompose() {
        let c = cache(256, 16, 2);
        let parts = c.decompose(16 * 8 + 20);
        assert_eq!(parts.block_addr, 9);
        assert_eq!(parts.set_index, 1);
        assert_eq!(parts.tag, 1);
    }

    #[test]
    fn test_same_block_hits() {
        let mut c = cache(256, 16, 2);
        assert_eq!(c.access(0), Probe::Miss);
        assert_eq!(c.access(15), Probe::Hit);
        assert_eq!(c.access(16), Probe::Miss);
        assert_eq!((c.hits(), c.misses()), (1, 2));
    }

    #[test]
    fn test_fifo_evicts_oldest_even_if_recently_hit() {
        let mut c = cache(256, 16, 2);
        let stride = 16 * 8;
        c.access(0);
        c.access(stride);
        // LRU would now protect address 0
        assert!(c.access(0).is_hit());
        assert_eq!(c.access(2 * stride), Probe::Miss);
        assert_eq!(c.access(0), Probe::Miss);
    }

    #[test]
    fn test_stats() {
        let mut c = cache(64, 16, 1);
        assert!(c.stats().hit_rate.is_no_data());
        c.access(0);
        c.access(0);
        let s = c.stats();
        assert_eq!(s.accesses, 2);
        assert_eq!(s.hit_rate, Rate::Percent(50.0));
    }
}
