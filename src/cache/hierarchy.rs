//! Two-level cache lookup cascade.
//!
//! Each level installs on its own miss. An L2 hit is not copied into L1, and
//! a miss in both levels installs into both.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::set_associative::{CacheGeometry, CacheStats, SetAssociativeCache};
use crate::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CacheLevel {
    L1,
    L2,
}

impl fmt::Display for CacheLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L1 => f.write_str("L1"),
            Self::L2 => f.write_str("L2"),
        }
    }
}

impl FromStr for CacheLevel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l1" => Ok(Self::L1),
            "l2" => Ok(Self::L2),
            other => Err(SimError::InvalidConfig(format!("unknown cache level '{}'", other))),
        }
    }
}

/// Where an access was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessOutcome {
    L1Hit,
    L1MissL2Hit,
    MissToMain,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HierarchyStats {
    pub l1: CacheStats,
    pub l2: CacheStats,
}

#[derive(Debug, Clone)]
pub struct CacheHierarchy {
    l1: SetAssociativeCache,
    l2: SetAssociativeCache,
}

impl CacheHierarchy {
    pub fn new(l1: CacheGeometry, l2: CacheGeometry) -> Result<Self, SimError> {
        Ok(Self {
            l1: SetAssociativeCache::new(l1)?,
            l2: SetAssociativeCache::new(l2)?,
        })
    }

    /// Replace one level with a fresh cache. On error the old cache stays.
    pub fn init_level(&mut self, level: CacheLevel, geometry: CacheGeometry) -> Result<(), SimError> {
        let cache = SetAssociativeCache::new(geometry).map_err(|e| {
            tracing::warn!(%level, ?geometry, error = %e, "cache init rejected");
            e
        })?;
        tracing::info!(%level, num_sets = cache.num_sets(), ?geometry, "cache initialized");
        *self.level_mut(level) = cache;
        Ok(())
    }

    pub fn access_memory(&mut self, address: u64) -> AccessOutcome {
        let outcome = if self.l1.access(address).is_hit() {
            AccessOutcome::L1Hit
        } else if self.l2.access(address).is_hit() {
            AccessOutcome::L1MissL2Hit
        } else {
            AccessOutcome::MissToMain
        };
        tracing::debug!(address, ?outcome, "memory access");
        outcome
    }

    pub fn level(&self, level: CacheLevel) -> &SetAssociativeCache {
        match level {
            CacheLevel::L1 => &self.l1,
            CacheLevel::L2 => &self.l2,
        }
    }

    fn level_mut(&mut self, level: CacheLevel) -> &mut SetAssociativeCache {
        match level {
            CacheLevel::L1 => &mut self.l1,
            CacheLevel::L2 => &mut self.l2,
        }
    }

    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats {
            l1: self.l1.stats(),
            l2: self.l2.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hierarchy() -> CacheHierarchy {
        // L1: 1 set x 1 way, L2: 1 set x 4 ways, both 16-byte blocks
        CacheHierarchy::new(CacheGeometry::new(16, 16, 1), CacheGeometry::new(64, 16, 4)).unwrap()
    }

    #[test]
    fn test_cascade() {
        let mut h = hierarchy();
        assert_eq!(h.access_memory(0), AccessOutcome::MissToMain);
        assert_eq!(h.access_memory(0), AccessOutcome::L1Hit);
        assert_eq!(h.access_memory(16), AccessOutcome::MissToMain);
        // 0 was evicted from L1 but lives in L2
        assert_eq!(h.access_memory(0), AccessOutcome::L1MissL2Hit);
    }

    #[test]
    fn test_l2_hit_does_not_backfill_l1() {
        let mut h = hierarchy();
        h.access_memory(0);
        h.access_memory(16);
        assert_eq!(h.access_memory(0), AccessOutcome::L1MissL2Hit);
        // L1 installed 0 on its own miss, so this is an L1 hit now
        assert_eq!(h.access_memory(0), AccessOutcome::L1Hit);
        let stats = h.stats();
        assert_eq!((stats.l1.hits, stats.l1.misses), (1, 3));
        assert_eq!((stats.l2.hits, stats.l2.misses), (1, 2));
    }

    #[test]
    fn test_l1_hit_skips_l2() {
        let mut h = hierarchy();
        h.access_memory(0);
        h.access_memory(0);
        assert_eq!(h.stats().l2.accesses, 1);
    }

    #[test]
    fn test_init_level_keeps_old_cache_on_error() {
        let mut h = hierarchy();
        h.access_memory(0);
        let err = h.init_level(CacheLevel::L1, CacheGeometry::new(100, 16, 1));
        assert!(err.is_err());
        assert_eq!(h.level(CacheLevel::L1).misses(), 1);

        h.init_level(CacheLevel::L1, CacheGeometry::new(256, 16, 2)).unwrap();
        assert_eq!(h.level(CacheLevel::L1).num_sets(), 8);
        assert_eq!(h.level(CacheLevel::L1).misses(), 0);
        assert_eq!(h.level(CacheLevel::L2).misses(), 1);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("L1".parse::<CacheLevel>().unwrap(), CacheLevel::L1);
        assert_eq!("l2".parse::<CacheLevel>().unwrap(), CacheLevel::L2);
        assert!("l3".parse::<CacheLevel>().is_err());
    }
}
